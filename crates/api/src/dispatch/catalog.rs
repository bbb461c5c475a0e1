//! Products and categories.

use gateway_core::input::{field_updates, CategoryInput, ProductInput};
use gateway_core::limits::MAX_IMPORT_ROWS;
use gateway_core::{find_by_key, is_visible, max_id, Error, Record, Result, Table};
use serde_json::{json, Value};
use tracing::info;

use super::records_json;
use crate::params::Params;
use crate::response::Envelope;
use crate::state::AppState;

/// The admin payload: a nested object under `key` if sent, otherwise the
/// top-level parameters without routing fields.
fn payload(params: &Params, key: &str) -> Value {
    if let Some(nested) = params.value(key).filter(|v| v.is_object()) {
        return nested.clone();
    }
    let mut object = params.as_object();
    if let Some(map) = object.as_object_mut() {
        map.remove("action");
    }
    object
}

pub(super) async fn get_products(state: &AppState) -> Result<Envelope> {
    let products = state.tables.snapshot(Table::Products).await?;
    let visible: Vec<Record> = products
        .records
        .iter()
        .filter(|p| is_visible(p))
        .cloned()
        .collect();
    Ok(Envelope::ok(records_json(&visible)?))
}

pub(super) async fn get_categories(state: &AppState) -> Result<Envelope> {
    let categories = state.tables.snapshot(Table::Categories).await?;
    Ok(Envelope::ok(records_json(&categories.records)?))
}

pub(super) async fn get_product(state: &AppState, params: &Params) -> Result<Envelope> {
    let id = params.require_of(&["id", "productId"])?;
    let products = state.tables.snapshot(Table::Products).await?;

    let product = find_by_key(&products.records, "ID", &id)
        .filter(|p| is_visible(p))
        .ok_or_else(|| Error::not_found("Product not found"))?;
    Ok(Envelope::data(product)?)
}

pub(super) async fn add_product(state: &AppState, params: &Params) -> Result<Envelope> {
    let input = ProductInput::parse(&payload(params, "product"))?;

    let product = state
        .tables
        .append_record_with_id(Table::Products, move |id| input.into_record(id))
        .await?;

    info!(id = %product.key("ID"), name = %product.text("Name"), "Product added");
    Ok(Envelope::data(&product)?.with_message("Product added"))
}

pub(super) async fn add_category(state: &AppState, params: &Params) -> Result<Envelope> {
    let input = CategoryInput::parse(&payload(params, "category"))?;

    let category = state
        .tables
        .append_record_with_id(Table::Categories, move |id| input.into_record(id))
        .await?;

    info!(id = %category.key("ID"), "Category added");
    Ok(Envelope::data(&category)?.with_message("Category added"))
}

pub(super) async fn update_product(state: &AppState, params: &Params) -> Result<Envelope> {
    let id = params.require_of(&["id", "productId"])?;
    let fields = match params.value("fields") {
        Some(fields) => fields.clone(),
        None => {
            let mut fields = payload(params, "product");
            if let Some(map) = fields.as_object_mut() {
                map.remove("productId");
            }
            fields
        }
    };
    let updates = field_updates(&fields)?;

    let product = state
        .tables
        .update_fields(Table::Products, "ID", &id, updates)
        .await?;
    Ok(Envelope::data(&product)?.with_message("Product updated"))
}

pub(super) fn delete_product() -> Result<Envelope> {
    Err(Error::not_supported("Deleting products"))
}

pub(super) async fn import_products(state: &AppState, params: &Params) -> Result<Envelope> {
    let items = params
        .value("products")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::validation("products must be an array"))?;
    if items.is_empty() {
        return Err(Error::validation("products must not be empty"));
    }
    if items.len() > MAX_IMPORT_ROWS {
        return Err(Error::validation(format!(
            "Cannot import {} products at once (limit {})",
            items.len(),
            MAX_IMPORT_ROWS
        )));
    }

    let inputs = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            ProductInput::parse(item).map_err(|e| Error::validation(format!("Product {}: {}", i + 1, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    let replace = params.flag("replace");
    let count = inputs.len();

    if replace {
        let records: Vec<Record> = inputs
            .into_iter()
            .zip(1..)
            .map(|(input, id)| input.into_record(id))
            .collect();
        state.tables.replace_records(Table::Products, records).await?;
    } else {
        state
            .tables
            .append_with(Table::Products, move |layout| {
                let first = max_id(&layout.records) + 1;
                Ok(inputs
                    .into_iter()
                    .zip(first..)
                    .map(|(input, id)| input.into_record(id))
                    .collect())
            })
            .await?;
    }

    info!(count, replace, "Imported products");
    Ok(Envelope::ok(json!({ "imported": count, "replaced": replace }))
        .with_message(format!("Imported {} products", count)))
}

//! Commission rollups and referral attribution.

use gateway_core::aggregate::{admin_stats, summarize_user_commissions, UserLookup};
use gateway_core::input::normalize_whatsapp;
use gateway_core::{Error, Record, Result, Table};

use crate::params::Params;
use crate::response::Envelope;
use crate::state::AppState;

pub(super) async fn get_user_commissions(state: &AppState, params: &Params) -> Result<Envelope> {
    let lookup = match params.text_of(&["userId", "id"]) {
        Some(id) => UserLookup::Id(id),
        None => match params.text_of(&["whatsapp", "phone"]) {
            Some(phone) => UserLookup::Phone(phone),
            None => return Err(Error::validation("userId or whatsapp is required")),
        },
    };
    summarize(state, lookup).await
}

/// Phone-keyed variant kept for older storefront builds.
pub(super) async fn get_commissions_by_phone(state: &AppState, params: &Params) -> Result<Envelope> {
    let phone = params.require_of(&["phone", "whatsapp"])?;
    summarize(state, UserLookup::Phone(phone)).await
}

async fn summarize(state: &AppState, lookup: UserLookup) -> Result<Envelope> {
    let (users, orders, commissions) = tokio::try_join!(
        state.tables.snapshot(Table::Users),
        state.tables.snapshot(Table::Orders),
        state.tables.snapshot(Table::Commissions),
    )?;

    // A phone with no Users row can still have shared orders.
    let user = match (lookup.resolve(&users.records), &lookup) {
        (Some(user), _) => user.clone(),
        (None, UserLookup::Phone(phone)) => Record::new().with("Phone", phone.as_str()),
        (None, UserLookup::Id(_)) => return Err(Error::not_found("User not found")),
    };

    let summary = summarize_user_commissions(
        &user,
        &orders.records,
        &commissions.records,
        &state.commission,
    );
    Envelope::data(&summary)
}

pub(super) async fn get_admin_stats(state: &AppState) -> Result<Envelope> {
    let (users, orders, commissions, products) = tokio::try_join!(
        state.tables.snapshot(Table::Users),
        state.tables.snapshot(Table::Orders),
        state.tables.snapshot(Table::Commissions),
        state.tables.snapshot(Table::Products),
    )?;

    let stats = admin_stats(
        &users.records,
        &orders.records,
        &commissions.records,
        &products.records,
    );
    Envelope::data(&stats)
}

/// Attributes an order to the user who shared the product.
pub(super) async fn record_sharer_whatsapp(state: &AppState, params: &Params) -> Result<Envelope> {
    let order_id = params.require("orderId")?;
    let sharer = normalize_whatsapp(&params.require_of(&["sharerWhatsApp", "whatsapp"])?)?;

    let order = state
        .tables
        .update_fields(
            Table::Orders,
            "ID",
            &order_id,
            Record::new().with("SharerWhatsApp", sharer),
        )
        .await?;
    Ok(Envelope::data(&order)?.with_message("Sharer WhatsApp recorded"))
}

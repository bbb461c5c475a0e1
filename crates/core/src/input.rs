//! Validated admin payloads and request field normalization.

use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use validator::Validate;

use crate::error::{Error, Result};
use crate::limits::WHATSAPP_PATTERN;
use crate::record::{parse_number, Record, Value};

/// Compiled WhatsApp number regex (lazy initialization).
static WHATSAPP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WHATSAPP_PATTERN).expect("invalid WhatsApp pattern"));

/// Strips spaces, dashes, and parentheses and checks the result looks like
/// a phone number.
pub fn normalize_whatsapp(raw: &str) -> Result<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    if cleaned.is_empty() {
        return Err(Error::missing_param("whatsapp"));
    }
    if !WHATSAPP_REGEX.is_match(&cleaned) {
        return Err(Error::validation(format!("Invalid WhatsApp number: {}", raw)));
    }
    Ok(cleaned)
}

/// Accepts `12`, `12.5`, or `"12.5"`.
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    match raw {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => parse_number(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("not a number: {}", s))),
        Some(other) => Err(serde::de::Error::custom(format!("not a number: {}", other))),
    }
}

/// Accepts `true`, `"TRUE"`, `"true"`, `1`.
fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Bool(b)) => Some(b),
        Some(serde_json::Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Some(serde_json::Value::Number(n)) => Some(n.as_f64().unwrap_or(0.0) != 0.0),
        _ => None,
    })
}

/// Admin product payload. Unknown keys are kept and written to matching
/// sheet columns.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductInput {
    #[serde(rename = "ID", alias = "id", default, deserialize_with = "lenient_number")]
    pub id: Option<f64>,
    #[serde(rename = "CategoryID", alias = "categoryId", default)]
    pub category_id: Option<serde_json::Value>,
    #[serde(rename = "Name", alias = "name", default)]
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(rename = "Description", alias = "description", default)]
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[serde(rename = "OriginalPrice", alias = "originalPrice", default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0))]
    pub original_price: Option<f64>,
    #[serde(rename = "MemberPrice", alias = "memberPrice", default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0))]
    pub member_price: Option<f64>,
    #[serde(rename = "Commission", alias = "commission", default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0))]
    pub commission: Option<f64>,
    #[serde(rename = "StockCount", alias = "stockCount", default, deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0))]
    pub stock_count: Option<f64>,
    #[serde(rename = "IsVisible", alias = "isVisible", default, deserialize_with = "lenient_flag")]
    pub is_visible: Option<bool>,
    #[serde(rename = "IsHotSale", alias = "isHotSale", default, deserialize_with = "lenient_flag")]
    pub is_hot_sale: Option<bool>,
    #[serde(rename = "IsMemberExclusive", alias = "isMemberExclusive", default, deserialize_with = "lenient_flag")]
    pub is_member_exclusive: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProductInput {
    /// Parses and validates a JSON payload.
    pub fn parse(payload: &serde_json::Value) -> Result<Self> {
        let input: Self = serde_json::from_value(payload.clone())
            .map_err(|e| Error::validation(format!("Invalid product: {}", e)))?;
        input
            .validate()
            .map_err(|e| Error::validation(format!("Invalid product: {}", e)))?;
        Ok(input)
    }

    /// Builds the sheet record. New products are visible unless told
    /// otherwise and start with no purchases.
    pub fn into_record(self, id: i64) -> Record {
        let mut record = Record::new()
            .with("ID", id)
            .with("Name", self.name.trim())
            .with("OriginalPrice", self.original_price.unwrap_or(0.0))
            .with("MemberPrice", self.member_price.or(self.original_price).unwrap_or(0.0))
            .with("Commission", self.commission.unwrap_or(0.0))
            .with("StockCount", self.stock_count.unwrap_or(0.0))
            .with("PurchasedCount", 0.0)
            .with("IsVisible", self.is_visible.unwrap_or(true))
            .with("IsHotSale", self.is_hot_sale.unwrap_or(false))
            .with("IsMemberExclusive", self.is_member_exclusive.unwrap_or(false));

        if let Some(category) = self.category_id {
            record.insert("CategoryID", Value::from_json(&category));
        }
        if let Some(description) = self.description {
            record.insert("Description", description);
        }
        for (column, value) in &self.extra {
            if !record.contains(column) {
                record.insert(column.clone(), Value::from_json(value));
            }
        }
        record
    }
}

/// Admin category payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryInput {
    #[serde(rename = "Name", alias = "name", default)]
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CategoryInput {
    pub fn parse(payload: &serde_json::Value) -> Result<Self> {
        let input: Self = serde_json::from_value(payload.clone())
            .map_err(|e| Error::validation(format!("Invalid category: {}", e)))?;
        input
            .validate()
            .map_err(|e| Error::validation(format!("Invalid category: {}", e)))?;
        Ok(input)
    }

    pub fn into_record(self, id: i64) -> Record {
        let mut record = Record::new().with("ID", id).with("Name", self.name.trim());
        for (column, value) in &self.extra {
            if column != "ID" && column != "id" && !record.contains(column) {
                record.insert(column.clone(), Value::from_json(value));
            }
        }
        record
    }
}

/// Converts a JSON object of column updates into a record, refusing to
/// touch the `ID` column.
pub fn field_updates(fields: &serde_json::Value) -> Result<Record> {
    let object = fields
        .as_object()
        .ok_or_else(|| Error::validation("fields must be an object"))?;

    let mut record = Record::new();
    for (column, value) in object {
        if column == "ID" || column == "id" {
            continue;
        }
        record.insert(column.clone(), Value::from_json(value));
    }
    if record.is_empty() {
        return Err(Error::validation("No fields to update"));
    }
    Ok(record)
}

//! Typed cell values, records, and the column coercion table.
//!
//! A record is keyed by column name. Typing is a naming convention applied
//! uniformly across tables: `ID` is numeric whether it sits in `Products` or
//! `Users`, and any column missing from the table decodes as text.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Columns parsed as numbers.
pub const NUMERIC_FIELDS: [&str; 11] = [
    "ID",
    "OriginalPrice",
    "MemberPrice",
    "Commission",
    "StockCount",
    "PurchasedCount",
    "Amount",
    "TotalCommission",
    "PendingCommission",
    "PaidCommission",
    "ReferralCount",
];

/// Columns mapping the literals `TRUE` / `FALSE` to booleans.
pub const FLAG_FIELDS: [&str; 4] = ["IsMemberExclusive", "IsHotSale", "IsVisible", "HasCommission"];

/// A typed cell value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view; text is parsed leniently and falls back to 0.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::String(s) => parse_number(s).unwrap_or(0.0),
            Self::Bool(_) => 0.0,
        }
    }

    /// Renders the value the way it is written back into a cell.
    pub fn to_cell(&self) -> String {
        match self {
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.clone(),
        }
    }

    /// Normalized form used to compare identifiers across tables.
    ///
    /// `1`, `1.0` and `" 1 "` all compare equal.
    pub fn key(&self) -> String {
        match self {
            Self::Number(n) => format_number(*n),
            Self::String(s) => {
                let trimmed = s.trim();
                match parse_number(trimmed) {
                    Some(n) => format_number(n),
                    None => trimmed.to_string(),
                }
            }
            Self::Bool(b) => b.to_string(),
        }
    }

    /// Converts a JSON value from a request payload.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Null => Self::String(String::new()),
            other => Self::String(other.to_string()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) if is_integral(*n) => serializer.serialize_i64(*n as i64),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cell())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15
}

fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parses a cell as a number, ignoring surrounding whitespace and thousands separators.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Digits-only form of a phone number, used as the join key between
/// `Users.Phone` and `Orders.SharerWhatsApp`.
pub fn phone_key(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A decoded row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.0.remove(column)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// Cell text for a column; missing columns read as empty.
    pub fn text(&self, column: &str) -> String {
        self.0.get(column).map(Value::to_cell).unwrap_or_default()
    }

    /// Numeric value for a column; missing or non-numeric reads as 0.
    pub fn number(&self, column: &str) -> f64 {
        self.0.get(column).map(Value::as_f64).unwrap_or(0.0)
    }

    /// Boolean flag, if the column decoded to one.
    pub fn flag(&self, column: &str) -> Option<bool> {
        self.0.get(column).and_then(Value::as_bool)
    }

    /// Normalized identifier for a column; see [`Value::key`].
    pub fn key(&self, column: &str) -> String {
        self.0.get(column).map(Value::key).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies every column of `other` over this record.
    pub fn merge(&mut self, other: &Record) {
        for (k, v) in other.iter() {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Returns a copy without the given columns.
    pub fn without(&self, columns: &[&str]) -> Record {
        let mut copy = self.clone();
        for column in columns {
            copy.0.remove(*column);
        }
        copy
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How a column is coerced during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Parsed as a number; unparseable content becomes 0.
    Number,
    /// `TRUE` / `FALSE` become booleans; anything else stays text.
    Flag,
    /// Passed through unchanged.
    Text,
}

/// Maps column names to coercions.
#[derive(Debug, Clone)]
pub struct CoercionTable {
    fields: HashMap<String, FieldKind>,
}

impl CoercionTable {
    /// A table with no typed columns.
    pub fn empty() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// The shop's column conventions.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for name in NUMERIC_FIELDS {
            table.fields.insert(name.to_string(), FieldKind::Number);
        }
        for name in FLAG_FIELDS {
            table.fields.insert(name.to_string(), FieldKind::Flag);
        }
        table
    }

    /// Adds or overrides a column coercion.
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    pub fn kind_of(&self, column: &str) -> FieldKind {
        self.fields.get(column).copied().unwrap_or(FieldKind::Text)
    }

    /// Coerces one raw cell. Never fails: bad numbers degrade to 0.
    pub fn coerce(&self, column: &str, raw: &str) -> Value {
        match self.kind_of(column) {
            FieldKind::Number => Value::Number(parse_number(raw).unwrap_or(0.0)),
            FieldKind::Flag => match raw {
                "TRUE" => Value::Bool(true),
                "FALSE" => Value::Bool(false),
                other => Value::String(other.to_string()),
            },
            FieldKind::Text => Value::String(raw.to_string()),
        }
    }
}

impl Default for CoercionTable {
    fn default() -> Self {
        Self::standard()
    }
}

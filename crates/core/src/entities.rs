//! Typed views over shop records.
//!
//! Records stay maps so pass-through columns survive; these helpers give the
//! joins and filters a typed vocabulary without a fixed schema.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::record::{phone_key, Record, Value};

/// Columns never returned to clients from the `Users` table.
pub const PRIVATE_USER_FIELDS: [&str; 2] = ["Password", "Token"];

/// Kind of product interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatType {
    View,
    Click,
    Share,
    Like,
    Purchase,
}

impl StatType {
    pub const ALL: [StatType; 5] = [
        StatType::View,
        StatType::Click,
        StatType::Share,
        StatType::Like,
        StatType::Purchase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Click => "click",
            Self::Share => "share",
            Self::Like => "like",
            Self::Purchase => "purchase",
        }
    }
}

impl FromStr for StatType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(Self::View),
            "click" => Ok(Self::Click),
            "share" => Ok(Self::Share),
            "like" => Ok(Self::Like),
            "purchase" => Ok(Self::Purchase),
            _ => Err(()),
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn of(user: &Record) -> Option<Role> {
        match user.text("Role").trim().to_ascii_lowercase().as_str() {
            "guest" => Some(Self::Guest),
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Commission status as written by whoever maintains the sheet.
///
/// Statuses are free text; anything unrecognized is kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommissionStatus {
    Pending,
    Verified,
    Paid,
    Other(String),
}

impl CommissionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "verified" => Self::Verified,
            "paid" => Self::Paid,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Paid => "paid",
            Self::Other(s) => s,
        }
    }
}

/// Products are visible unless `IsVisible` decoded to `false`.
pub fn is_visible(product: &Record) -> bool {
    !matches!(product.get("IsVisible"), Some(Value::Bool(false)))
}

/// Finds a record whose `column` matches `key` after id normalization.
pub fn find_by_key<'a>(records: &'a [Record], column: &str, key: &str) -> Option<&'a Record> {
    let wanted = Value::text(key).key();
    if wanted.is_empty() {
        return None;
    }
    records.iter().find(|r| r.key(column) == wanted)
}

/// Finds a user by phone, ignoring formatting differences.
pub fn find_user_by_phone<'a>(users: &'a [Record], phone: &str) -> Option<&'a Record> {
    let wanted = phone_key(phone);
    if wanted.is_empty() {
        return None;
    }
    users.iter().find(|u| phone_key(&u.text("Phone")) == wanted)
}

/// The user record as returned to clients.
pub fn public_user(user: &Record) -> Record {
    user.without(&PRIVATE_USER_FIELDS)
}

/// Highest numeric `ID` in a table, or 0 when empty.
pub fn max_id(records: &[Record]) -> i64 {
    records
        .iter()
        .map(|r| r.number("ID"))
        .fold(0.0_f64, f64::max) as i64
}

/// Parses event timestamps as written by this service or by hand.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC), and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

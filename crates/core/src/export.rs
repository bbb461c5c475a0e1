//! CSV export of decoded tables.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::record::Record;
use crate::tables::Table;

/// Tables that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Users,
    Products,
    Commissions,
}

impl ExportKind {
    pub fn table(&self) -> Table {
        match self {
            Self::Users => Table::Users,
            Self::Products => Table::Products,
            Self::Commissions => Table::Commissions,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Products => "products",
            Self::Commissions => "commissions",
        }
    }

    /// Columns withheld from the export.
    pub fn excluded_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Users => &["Password", "Token"],
            Self::Products | Self::Commissions => &[],
        }
    }
}

impl FromStr for ExportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "users" => Ok(Self::Users),
            "products" => Ok(Self::Products),
            "commissions" => Ok(Self::Commissions),
            other => Err(Error::validation(format!(
                "Invalid export type: {} (expected users, products, or commissions)",
                other
            ))),
        }
    }
}

/// Writes the header and records as CSV, in header order.
///
/// Fields containing a comma, quote, or line break are quoted, with inner
/// quotes doubled.
pub fn export_csv(header: &[String], records: &[Record], excluded: &[&str]) -> Result<String> {
    let columns: Vec<&String> = header
        .iter()
        .filter(|c| !c.is_empty() && !excluded.contains(&c.as_str()))
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.as_str()))?;
    for record in records {
        writer.write_record(columns.iter().map(|c| record.text(c)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::internal(format!("csv flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::internal(format!("csv output not utf-8: {}", e)))
}

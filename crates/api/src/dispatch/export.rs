//! CSV export.

use gateway_core::export::{export_csv, ExportKind};
use gateway_core::Result;
use serde_json::json;

use crate::params::Params;
use crate::response::Envelope;
use crate::state::AppState;

/// Serializes a table as CSV inside the envelope; the storefront turns the
/// content into a download.
pub(super) async fn export_data(state: &AppState, params: &Params) -> Result<Envelope> {
    let kind: ExportKind = params.require("type")?.parse()?;

    let snapshot = state.tables.snapshot(kind.table()).await?;
    let content = export_csv(&snapshot.header, &snapshot.records, kind.excluded_columns())?;

    let filename = format!(
        "{}_{}.csv",
        kind.as_str(),
        chrono::Utc::now().format("%Y%m%d")
    );
    Ok(Envelope::ok(json!({
        "type": kind.as_str(),
        "filename": filename,
        "contentType": "text/csv",
        "rows": snapshot.records.len(),
        "content": content,
    })))
}

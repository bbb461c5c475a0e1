//! Fraud signals: the Logs table and device/number cross-checks.

use gateway_core::aggregate::detect_device_anomalies;
use gateway_core::{Record, Result, Table};
use serde_json::json;
use tracing::info;

use super::{now_cell, records_json};
use crate::params::Params;
use crate::response::Envelope;
use crate::state::AppState;

/// Logged anomalies plus devices currently seen with several numbers.
pub(super) async fn detect_anomalies(state: &AppState) -> Result<Envelope> {
    let (logs, stats) = tokio::try_join!(
        state.tables.snapshot(Table::Logs),
        state.tables.snapshot(Table::ProductStats),
    )?;

    let devices = detect_device_anomalies(&stats.records);
    Ok(Envelope::ok(json!({
        "logs": records_json(&logs.records)?,
        "deviceAnomalies": serde_json::to_value(&devices)?,
    })))
}

pub(super) async fn record_anomaly(state: &AppState, params: &Params) -> Result<Envelope> {
    let anomaly_type = params.require("anomalyType")?;

    let entry = Record::new()
        .with("LogID", format!("log_{}", chrono::Utc::now().timestamp_millis()))
        .with("DeviceID", params.text("deviceId").unwrap_or_default())
        .with("UseID", params.text_of(&["useId", "userId"]).unwrap_or_default())
        .with("AnomalyType", anomaly_type.as_str())
        .with("Details", params.cell_text("details"))
        .with("DetectedTime", now_cell())
        .with("Status", "pending");

    let entry = state.tables.append_record(Table::Logs, entry).await?;

    info!(anomaly_type = %anomaly_type, log_id = %entry.text("LogID"), "Anomaly recorded");
    Ok(Envelope::data(&entry)?.with_message("Anomaly recorded"))
}

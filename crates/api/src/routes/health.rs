//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use telemetry::{health, metrics};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - registry report, active store, and metrics snapshot.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        report: health().report(),
        store: state.tables.store_name().to_string(),
        metrics: metrics().snapshot(),
    })
}

/// GET /health/ready - 503 only when the sheet is down and no fixtures back it.
pub async fn ready_handler() -> (StatusCode, Json<Value>) {
    let registry = health();
    let status = registry.status();
    let code = if registry.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(json!({
            "status": status,
            "sheets": registry.sheets.message(),
        })),
    )
}

/// GET /health/live
pub async fn live_handler() -> StatusCode {
    StatusCode::OK
}

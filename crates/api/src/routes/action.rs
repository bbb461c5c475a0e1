//! Action endpoint handler.

use axum::{extract::State, http::StatusCode};
use telemetry::metrics;

use crate::dispatch::dispatch;
use crate::extractors::ActionRequest;
use crate::response::{ApiError, Envelope};
use crate::state::AppState;

/// GET|POST /api - Runs one action.
///
/// Business outcomes, failed ones included, are answered with 200 and
/// `success: false`; only internal faults produce 500.
pub async fn action_handler(
    State(state): State<AppState>,
    request: ActionRequest,
) -> Result<Envelope, ApiError> {
    let _active = metrics().active_requests.track();
    dispatch(&state, request.action.as_deref(), &request.params).await
}

/// OPTIONS /api - Preflight without CORS request headers; the CORS layer
/// answers real preflights before they get here.
pub async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

//! API routes.

pub mod action;
pub mod health;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Path the storefront calls.
pub const ACTION_PATH: &str = "/api";

/// Legacy serverless path, kept so deployed storefronts keep working.
pub const LEGACY_ACTION_PATH: &str = "/.netlify/functions/api";

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let actions = get(action::action_handler)
        .post(action::action_handler)
        .options(action::preflight_handler);

    Router::new()
        .route(ACTION_PATH, actions.clone())
        .route(LEGACY_ACTION_PATH, actions)
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

//! HTTP action dispatcher for the referral gateway.

pub mod config;
pub mod dispatch;
pub mod extractors;
pub mod params;
pub mod response;
pub mod routes;
pub mod state;

pub use config::AdminConfig;
pub use dispatch::{dispatch, Action};
pub use routes::router;
pub use state::AppState;

//! Telemetry for the referral gateway.
//!
//! Structured logging setup, a process-wide health registry, and in-process
//! counters exposed through the health endpoint.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;

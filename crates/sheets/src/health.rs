//! Store connectivity probe.

use gateway_core::{Result, Table};
use std::time::Duration;
use telemetry::health;
use tracing::{info, warn};

use crate::store::{bounded, TableStore};

/// Reads the smallest table to confirm the store answers, and records the
/// outcome in the health registry.
pub async fn check_connection(store: &dyn TableStore, limit: Duration) -> Result<()> {
    let table = Table::Categories.name();
    match bounded(table, limit, store.read_range(table)).await {
        Ok(grid) => {
            health().sheets.set_healthy();
            info!(store = store.name(), rows = grid.len(), "Store connection verified");
            Ok(())
        }
        Err(e) => {
            health().sheets.set_unhealthy(e.to_string());
            warn!(store = store.name(), error = %e, "Store connection check failed");
            Err(e)
        }
    }
}

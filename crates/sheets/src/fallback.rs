//! Demo-data fallback for failed reads.

use async_trait::async_trait;
use gateway_core::{Grid, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::memory::MemoryStore;
use crate::store::{bounded, RowPosition, TableStore};

/// Reads from `primary`, serving fixture grids when the primary read fails
/// and the fallback is enabled.
///
/// Only [`TableStore::read_range`] falls back. Strict reads and writes go to
/// the primary alone, so fixture rows never feed an id or a duplicate check
/// that ends up in the real sheet.
pub struct FallbackStore {
    primary: Arc<dyn TableStore>,
    fixtures: MemoryStore,
    enabled: bool,
    read_limit: Option<Duration>,
    last_failure: Mutex<Option<String>>,
}

impl FallbackStore {
    pub fn new(primary: Arc<dyn TableStore>, fixtures: MemoryStore, enabled: bool) -> Self {
        Self {
            primary,
            fixtures,
            enabled,
            read_limit: None,
            last_failure: Mutex::new(None),
        }
    }

    /// Gives up on a primary read after `limit` and serves fixtures instead.
    /// Must be shorter than the cache's own bound to take effect.
    pub fn with_read_limit(mut self, limit: Duration) -> Self {
        self.read_limit = Some(limit);
        self
    }

    /// Message of the most recent primary read failure, cleared on success.
    pub fn last_failure(&self) -> Option<String> {
        self.last_failure.lock().clone()
    }
}

#[async_trait]
impl TableStore for FallbackStore {
    async fn read_range(&self, table: &str) -> Result<Grid> {
        let read = match self.read_limit {
            Some(limit) => bounded(table, limit, self.primary.read_range(table)).await,
            None => self.primary.read_range(table).await,
        };

        match read {
            Ok(grid) => {
                *self.last_failure.lock() = None;
                Ok(grid)
            }
            Err(e) if self.enabled => {
                warn!(
                    table = %table,
                    store = self.primary.name(),
                    error = %e,
                    "Primary read failed, serving fixture data"
                );
                *self.last_failure.lock() = Some(e.to_string());
                self.fixtures.read_range(table).await
            }
            Err(e) => Err(e),
        }
    }

    async fn read_range_strict(&self, table: &str) -> Result<Grid> {
        self.primary.read_range_strict(table).await
    }

    async fn append_row(&self, table: &str, row: Vec<String>) -> Result<RowPosition> {
        self.primary.append_row(table, row).await
    }

    async fn update_cell(&self, table: &str, address: &str, value: String) -> Result<()> {
        self.primary.update_cell(table, address, value).await
    }

    async fn clear_range(&self, table: &str, range: &str) -> Result<()> {
        self.primary.clear_range(table, range).await
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }

    fn is_healthy(&self) -> bool {
        self.primary.is_healthy() && self.last_failure.lock().is_none()
    }
}

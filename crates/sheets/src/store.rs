//! The table store abstraction.

use async_trait::async_trait;
use gateway_core::{Error, Grid, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Where an appended row landed (1-based sheet row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowPosition {
    pub row: usize,
}

/// Raw access to named tables.
///
/// Implementations give no transactional or multi-row atomicity. Callers
/// must treat every call as an independent remote operation that may fail.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Reads every row of a table, header included. A missing or empty
    /// table reads as an empty grid.
    async fn read_range(&self, table: &str) -> Result<Grid>;

    /// Reads the backing table itself, never substitute rows. Writes derive
    /// ids and duplicate checks from this read.
    async fn read_range_strict(&self, table: &str) -> Result<Grid> {
        self.read_range(table).await
    }

    /// Writes a row after the last row of the table.
    async fn append_row(&self, table: &str, row: Vec<String>) -> Result<RowPosition>;

    /// Overwrites one cell; `address` is A1 notation such as `Orders!C5`.
    async fn update_cell(&self, table: &str, address: &str, value: String) -> Result<()>;

    /// Blanks a range such as `Products!A2:Z`.
    async fn clear_range(&self, table: &str, range: &str) -> Result<()>;

    /// Short name for logs and health reports.
    fn name(&self) -> &'static str;

    /// Checks if the store is usable.
    fn is_healthy(&self) -> bool {
        true
    }
}

/// Runs a store call with an upper bound; elapsed calls become
/// [`Error::StoreTimeout`].
pub async fn bounded<T, F>(table: &str, limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(Error::store_timeout(table, limit)),
    }
}

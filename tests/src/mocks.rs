//! Mock implementations for testing.

use async_trait::async_trait;
use gateway_core::{Error, Grid, Result};
use parking_lot::Mutex;
use sheets_store::{MemoryStore, RowPosition, TableStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Mock sheet that keeps tables in memory.
///
/// Implements the same `TableStore` trait as the real Sheets client, so the
/// router under test runs the production cache and repository code. Reads
/// are counted, and failures or latency can be switched on per test.
#[derive(Clone)]
pub struct MockStore {
    inner: MemoryStore,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    should_fail: Arc<Mutex<bool>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            reads: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(AtomicUsize::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
            delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Current contents of a table, header included.
    pub fn grid(&self, table: &str) -> Grid {
        self.inner.grid(table)
    }

    /// Number of `read_range` calls that reached the store.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of append, update, and clear calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Set failure mode for testing error handling.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    /// Delay every call, to exercise timeouts and concurrent fills.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }

    async fn enter(&self, table: &str) -> Result<()> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.should_fail.lock() {
            return Err(Error::store(table, "HTTP 503: mock sheet unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for MockStore {
    async fn read_range(&self, table: &str) -> Result<Grid> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.enter(table).await?;
        self.inner.read_range(table).await
    }

    async fn append_row(&self, table: &str, row: Vec<String>) -> Result<RowPosition> {
        self.enter(table).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.append_row(table, row).await
    }

    async fn update_cell(&self, table: &str, address: &str, value: String) -> Result<()> {
        self.enter(table).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_cell(table, address, value).await
    }

    async fn clear_range(&self, table: &str, range: &str) -> Result<()> {
        self.enter(table).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.clear_range(table, range).await
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_healthy(&self) -> bool {
        !*self.should_fail.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_counts_reads() {
        let mock = MockStore::new(MemoryStore::new());

        mock.read_range("Products").await.unwrap();
        mock.read_range("Products").await.unwrap();
        assert_eq!(mock.read_count(), 2);
        assert_eq!(mock.write_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_store_failure_mode() {
        let mock = MockStore::new(MemoryStore::new());
        mock.set_should_fail(true);

        let result = mock.append_row("Products", vec!["1".into()]).await;
        assert!(result.is_err());
        assert!(!mock.is_healthy());
        assert_eq!(mock.write_count(), 0);
    }
}

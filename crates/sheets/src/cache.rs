//! Decoded table snapshots with a TTL and single-flight fills.
//!
//! Concurrent misses for one table share a single store read. A failed read
//! is returned to every waiter and never stored. Invalidation bumps a
//! per-table generation so a read that started before a write completes is
//! discarded instead of repopulating the cache with pre-write rows.

use chrono::{DateTime, Utc};
use gateway_core::{decode_grid, CoercionTable, Error, Record, Result};
use moka::future::Cache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use telemetry::metrics;
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::store::{bounded, TableStore};

/// Stale fills retried before the latest read is served as is.
const MAX_STALE_RETRIES: usize = 3;

/// One decoded read of a table.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub table: String,
    pub header: Vec<String>,
    pub records: Vec<Record>,
    /// Raw grid length, header and blank rows included.
    pub row_count: usize,
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
}

impl TableSnapshot {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Snapshot cache in front of a [`TableStore`].
pub struct TableCache {
    store: Arc<dyn TableStore>,
    entries: Cache<String, Arc<TableSnapshot>>,
    generations: Mutex<HashMap<String, u64>>,
    coercions: CoercionTable,
    store_timeout: Duration,
}

impl TableCache {
    pub fn new(store: Arc<dyn TableStore>, config: &CacheConfig) -> Self {
        Self::with_coercions(store, config, CoercionTable::standard())
    }

    pub fn with_coercions(
        store: Arc<dyn TableStore>,
        config: &CacheConfig,
        coercions: CoercionTable,
    ) -> Self {
        Self {
            store,
            entries: Cache::builder().time_to_live(config.ttl()).build(),
            generations: Mutex::new(HashMap::new()),
            coercions,
            store_timeout: config.store_timeout(),
        }
    }

    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    pub fn coercions(&self) -> &CoercionTable {
        &self.coercions
    }

    fn generation(&self, table: &str) -> u64 {
        self.generations.lock().get(table).copied().unwrap_or(0)
    }

    /// Returns a snapshot no older than the TTL, reading through on a miss.
    pub async fn get(&self, table: &str) -> Result<Arc<TableSnapshot>> {
        let mut attempt = 0;
        loop {
            let generation = self.generation(table);
            let entry = self
                .entries
                .entry_by_ref(table)
                .or_try_insert_with(self.fetch(table, generation))
                .await
                .map_err(|e: Arc<Error>| (*e).clone())?;

            if entry.is_fresh() {
                metrics().cache_misses.inc();
            } else {
                metrics().cache_hits.inc();
            }

            let snapshot = entry.into_value();
            if snapshot.generation >= self.generation(table) {
                return Ok(snapshot);
            }

            attempt += 1;
            if attempt >= MAX_STALE_RETRIES {
                warn!(table = %table, "Table kept changing during reads, serving latest snapshot");
                return Ok(snapshot);
            }
            debug!(table = %table, "Discarding snapshot read before invalidation");
            self.entries.invalidate(table).await;
        }
    }

    async fn fetch(&self, table: &str, generation: u64) -> Result<Arc<TableSnapshot>> {
        let start = Instant::now();
        metrics().store_reads.inc();

        let grid = bounded(table, self.store_timeout, self.store.read_range(table))
            .await
            .inspect_err(|e| {
                metrics().store_errors.inc();
                warn!(table = %table, error = %e, "Table read failed");
            })?;

        let decoded = decode_grid(&grid, &self.coercions);
        debug!(
            table = %table,
            rows = decoded.records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded table snapshot"
        );

        Ok(Arc::new(TableSnapshot {
            table: table.to_string(),
            header: decoded.header,
            records: decoded.records,
            row_count: grid.len(),
            generation,
            fetched_at: Utc::now(),
        }))
    }

    /// Drops the cached snapshot. Reads already in flight for this table will
    /// not be served.
    pub async fn invalidate(&self, table: &str) {
        *self
            .generations
            .lock()
            .entry(table.to_string())
            .or_insert(0) += 1;
        self.entries.invalidate(table).await;
        debug!(table = %table, "Invalidated table snapshot");
    }

    pub async fn invalidate_all(&self) {
        {
            let mut generations = self.generations.lock();
            for generation in generations.values_mut() {
                *generation += 1;
            }
        }
        self.entries.invalidate_all();
    }
}

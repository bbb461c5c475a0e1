//! Table repository: cached reads and invalidating writes.

use gateway_core::address::{cell, data_range};
use gateway_core::{
    decode_grid, decode_row, encode_row, is_blank_row, max_id, Error, Grid, Record, Result, Table, Value,
};
use std::sync::Arc;
use telemetry::metrics;
use tracing::{debug, info, warn};

use crate::cache::{TableCache, TableSnapshot};
use crate::store::{bounded, TableStore};

/// Current state of a table as seen by a write, read fresh from the store.
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub header: Vec<String>,
    /// Raw grid length including the header row.
    pub row_count: usize,
    pub records: Vec<Record>,
}

/// Entry point for table access.
///
/// Reads come from the snapshot cache. Every write runs on its own task so it
/// completes even if the request that started it goes away, and invalidates
/// the table's snapshot once the store call returns, successful or not.
#[derive(Clone)]
pub struct Tables {
    store: Arc<dyn TableStore>,
    cache: Arc<TableCache>,
}

impl Tables {
    pub fn new(cache: Arc<TableCache>) -> Self {
        Self {
            store: cache.store().clone(),
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<TableCache> {
        &self.cache
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Cached snapshot of a table.
    pub async fn snapshot(&self, table: Table) -> Result<Arc<TableSnapshot>> {
        self.cache.get(table.name()).await
    }

    /// Raw grid straight from the backing sheet, bypassing the cache and any
    /// fixture fallback. A failed read fails the caller.
    pub async fn fresh_grid(&self, table: Table) -> Result<Grid> {
        metrics().store_reads.inc();
        bounded(
            table.name(),
            self.cache.store_timeout(),
            self.store.read_range_strict(table.name()),
        )
        .await
    }

    pub async fn invalidate(&self, table: Table) {
        self.cache.invalidate(table.name()).await;
    }

    /// Runs a write on a detached task, then invalidates the table.
    async fn write<T, F, Fut>(&self, table: Table, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Tables) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T>> + Send + 'static,
    {
        let this = self.clone();
        let task = tokio::spawn(async move {
            let result = op(this.clone()).await;
            this.invalidate(table).await;
            if let Err(ref e) = result {
                metrics().store_errors.inc();
                warn!(table = %table, error = %e, "Table write failed");
            }
            result
        });

        task.await
            .map_err(|e| Error::internal(format!("write task failed: {}", e)))?
    }

    /// Reads the table fresh, writing the default header first when the
    /// sheet is empty.
    async fn layout(&self, table: Table) -> Result<TableLayout> {
        let mut grid = self.fresh_grid(table).await?;
        if grid.first().map_or(true, |header| is_blank_row(header)) {
            let header = table.default_header_owned();
            info!(table = %table, "Writing default header to empty table");
            self.append_raw(table, header.clone()).await?;
            grid = vec![header];
        }

        let decoded = decode_grid(&grid, self.cache.coercions());
        Ok(TableLayout {
            header: decoded.header,
            row_count: grid.len(),
            records: decoded.records,
        })
    }

    async fn append_raw(&self, table: Table, row: Vec<String>) -> Result<()> {
        metrics().store_writes.inc();
        bounded(
            table.name(),
            self.cache.store_timeout(),
            self.store.append_row(table.name(), row),
        )
        .await?;
        Ok(())
    }

    /// Appends records built from the table's current layout.
    ///
    /// `build` sees a fresh read so derived ids are computed from the latest
    /// rows. Returns the appended records in header order.
    pub async fn append_with<F>(&self, table: Table, build: F) -> Result<Vec<Record>>
    where
        F: FnOnce(&TableLayout) -> Result<Vec<Record>> + Send + 'static,
    {
        self.write(table, move |tables| async move {
            let layout = tables.layout(table).await?;
            let records = build(&layout)?;
            for record in &records {
                tables
                    .append_raw(table, encode_row(&layout.header, record))
                    .await?;
            }
            debug!(table = %table, rows = records.len(), "Appended records");
            Ok(records)
        })
        .await
    }

    pub async fn append_record(&self, table: Table, record: Record) -> Result<Record> {
        let mut appended = self.append_with(table, move |_| Ok(vec![record])).await?;
        appended
            .pop()
            .ok_or_else(|| Error::internal("append produced no record"))
    }

    /// Appends one record whose `ID` is one past the highest existing id.
    pub async fn append_record_with_id<F>(&self, table: Table, build: F) -> Result<Record>
    where
        F: FnOnce(i64) -> Record + Send + 'static,
    {
        let mut appended = self
            .append_with(table, move |layout| Ok(vec![build(max_id(&layout.records) + 1)]))
            .await?;
        appended
            .pop()
            .ok_or_else(|| Error::internal("append produced no record"))
    }

    /// Overwrites `fields` on the first row whose `key_column` matches `key`
    /// and returns the row as it now reads.
    ///
    /// Columns missing from the header are rejected before anything is
    /// written.
    pub async fn update_fields(
        &self,
        table: Table,
        key_column: &str,
        key: &str,
        fields: Record,
    ) -> Result<Record> {
        let key_column = key_column.to_string();
        let wanted = Value::text(key).key();

        self.write(table, move |tables| async move {
            let grid = tables.fresh_grid(table).await?;
            let decoded = decode_grid(&grid, tables.cache.coercions());
            let header = decoded.header;

            let key_index = header
                .iter()
                .position(|h| *h == key_column)
                .ok_or_else(|| Error::validation(format!("{} has no {} column", table, key_column)))?;

            let mut targets = Vec::with_capacity(fields.len());
            for (column, value) in fields.iter() {
                let index = header
                    .iter()
                    .position(|h| h == column)
                    .ok_or_else(|| Error::validation(format!("Unknown column: {}", column)))?;
                targets.push((index, value.to_cell()));
            }

            let row_index = grid
                .iter()
                .enumerate()
                .skip(1)
                .find(|(_, row)| {
                    row.get(key_index)
                        .is_some_and(|c| !wanted.is_empty() && Value::text(c.as_str()).key() == wanted)
                })
                .map(|(i, _)| i)
                .ok_or_else(|| Error::not_found(format!("{} {} not found", table, wanted)))?;

            let sheet_row = row_index + 1;
            for (col, value) in targets {
                metrics().store_writes.inc();
                bounded(
                    table.name(),
                    tables.cache.store_timeout(),
                    tables
                        .store
                        .update_cell(table.name(), &cell(table.name(), col, sheet_row), value),
                )
                .await?;
            }

            let mut updated = decode_row(&header, &grid[row_index], tables.cache.coercions());
            updated.merge(&fields);
            debug!(table = %table, row = sheet_row, "Updated row");
            Ok(updated)
        })
        .await
    }

    /// Replaces every data row of a table, keeping its header.
    pub async fn replace_records(&self, table: Table, records: Vec<Record>) -> Result<usize> {
        self.write(table, move |tables| async move {
            let layout = tables.layout(table).await?;

            metrics().store_writes.inc();
            bounded(
                table.name(),
                tables.cache.store_timeout(),
                tables
                    .store
                    .clear_range(table.name(), &data_range(table.name())),
            )
            .await?;

            for record in &records {
                tables
                    .append_raw(table, encode_row(&layout.header, record))
                    .await?;
            }
            info!(table = %table, rows = records.len(), "Replaced table contents");
            Ok(records.len())
        })
        .await
    }
}

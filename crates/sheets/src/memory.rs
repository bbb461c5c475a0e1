//! In-process table store.
//!
//! Used for offline fixtures and tests. Behaves like a sheet: rows are
//! ragged, appends land after the last row, cleared cells read as blank.

use async_trait::async_trait;
use gateway_core::address::{parse_cell, parse_range, split_table};
use gateway_core::{Error, Grid, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::store::{RowPosition, TableStore};

/// Grid-per-table store held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, Grid>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a table, replacing anything already stored under the name.
    pub fn with_table(self, table: impl Into<String>, grid: Grid) -> Self {
        self.tables.write().insert(table.into(), grid);
        self
    }

    /// Copy of a table's current grid.
    pub fn grid(&self, table: &str) -> Grid {
        self.tables.read().get(table).cloned().unwrap_or_default()
    }

    /// Names of all seeded tables.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn read_range(&self, table: &str) -> Result<Grid> {
        Ok(self.grid(table))
    }

    async fn append_row(&self, table: &str, row: Vec<String>) -> Result<RowPosition> {
        let mut tables = self.tables.write();
        let grid = tables.entry(table.to_string()).or_default();
        grid.push(row);
        Ok(RowPosition { row: grid.len() })
    }

    async fn update_cell(&self, table: &str, address: &str, value: String) -> Result<()> {
        let (_, cell) = split_table(address);
        let cell = parse_cell(cell)?;
        let row = cell
            .row
            .ok_or_else(|| Error::validation(format!("cell address needs a row: {}", address)))?;

        let mut tables = self.tables.write();
        let grid = tables.entry(table.to_string()).or_default();
        if grid.len() < row {
            grid.resize(row, Vec::new());
        }
        let cells = &mut grid[row - 1];
        if cells.len() <= cell.col {
            cells.resize(cell.col + 1, String::new());
        }
        cells[cell.col] = value;
        Ok(())
    }

    async fn clear_range(&self, table: &str, range: &str) -> Result<()> {
        let range = parse_range(range)?;

        let mut tables = self.tables.write();
        let Some(grid) = tables.get_mut(table) else {
            return Ok(());
        };

        let first_row = range.start.row.unwrap_or(1);
        let last_row = range.end.row.unwrap_or(grid.len()).min(grid.len());
        for row in first_row..=last_row {
            let cells = &mut grid[row - 1];
            for col in range.start.col..=range.end.col {
                if let Some(cell) = cells.get_mut(col) {
                    cell.clear();
                }
            }
        }

        // Trailing blank rows are not part of the sheet's data region.
        while grid
            .last()
            .is_some_and(|row| row.iter().all(|c| c.is_empty()))
        {
            grid.pop();
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

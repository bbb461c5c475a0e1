//! Demo catalog served when the sheet is unreachable.

use gateway_core::{Grid, Table};

use crate::memory::MemoryStore;

fn grid(table: Table, rows: &[&[&str]]) -> Grid {
    let mut grid = vec![table.default_header_owned()];
    grid.extend(
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect()),
    );
    grid
}

/// Builds a store holding every table: a small catalog, one admin user, and
/// empty activity tables.
pub fn demo_store() -> MemoryStore {
    let products = grid(
        Table::Products,
        &[
            &["1", "1", "Jasmine Green Tea", "Loose leaf, 100g", "", "18.00", "15.00", "2", "40", "12", "TRUE", "TRUE", "FALSE"],
            &["2", "1", "Oolong Tea", "Roasted, 100g", "", "24.00", "20.00", "3", "25", "5", "TRUE", "FALSE", "FALSE"],
            &["3", "2", "Sesame Biscuits", "Box of 12", "", "9.50", "8.00", "1", "60", "30", "TRUE", "FALSE", "TRUE"],
            &["4", "2", "Discontinued Wafers", "", "", "5.00", "5.00", "0", "0", "2", "FALSE", "FALSE", "FALSE"],
        ],
    );
    let categories = grid(Table::Categories, &[&["1", "Tea"], &["2", "Snacks"]]);
    let users = grid(
        Table::Users,
        &[&["2", "+60000000000", "ADMIN01", "", "admin", "", "FALSE", "", "2024-01-01 00:00:00"]],
    );

    let mut store = MemoryStore::new()
        .with_table(Table::Products.name(), products)
        .with_table(Table::Categories.name(), categories)
        .with_table(Table::Users.name(), users);

    for table in [Table::Orders, Table::Commissions, Table::ProductStats, Table::Logs] {
        store = store.with_table(table.name(), grid(table, &[]));
    }
    store
}

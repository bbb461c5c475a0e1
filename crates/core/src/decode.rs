//! Row decoding: raw grids of cell strings into typed records, and back.
//!
//! Decoding is positional. The first grid row is the header; cell `i` of a
//! data row belongs to header column `i`. Column names only drive typing.

use crate::record::{CoercionTable, Record, Value};

/// A raw sheet range: rows of cell strings. Rows may be ragged.
pub type Grid = Vec<Vec<String>>;

/// A decoded table: its header and the non-blank data rows.
#[derive(Debug, Clone, Default)]
pub struct DecodedTable {
    pub header: Vec<String>,
    pub records: Vec<Record>,
}

/// True when a row has no cells or only empty cells.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

/// Decodes a grid whose first row is the header.
pub fn decode_grid(grid: &[Vec<String>], coercions: &CoercionTable) -> DecodedTable {
    let Some((header, rows)) = grid.split_first() else {
        return DecodedTable::default();
    };

    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();
    let records = decode_rows(&header, rows, coercions);

    DecodedTable { header, records }
}

/// Decodes data rows against a header.
///
/// Blank rows are skipped. Short rows are padded with empty cells, and
/// columns with an empty header name are dropped.
pub fn decode_rows(header: &[String], rows: &[Vec<String>], coercions: &CoercionTable) -> Vec<Record> {
    rows.iter()
        .filter(|row| !is_blank_row(row))
        .map(|row| decode_row(header, row, coercions))
        .collect()
}

/// Decodes a single row. Never fails.
pub fn decode_row(header: &[String], row: &[String], coercions: &CoercionTable) -> Record {
    header
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .map(|(i, name)| {
            let raw = row.get(i).map(String::as_str).unwrap_or("");
            (name.clone(), coercions.coerce(name, raw))
        })
        .collect()
}

/// Encodes a record into a positional row for the given header.
///
/// Columns the record lacks are written as empty cells; columns the header
/// lacks are not written at all.
pub fn encode_row(header: &[String], record: &Record) -> Vec<String> {
    header
        .iter()
        .map(|name| record.get(name).map(Value::to_cell).unwrap_or_default())
        .collect()
}

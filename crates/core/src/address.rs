//! A1-notation addresses for sheet ranges.
//!
//! Columns are 0-based internally and rows are 1-based, matching how a sheet
//! numbers them (row 1 is the header).

use crate::error::{Error, Result};
use crate::limits::LAST_COLUMN;

/// Converts a 0-based column index to letters (`0 -> A`, `26 -> AA`).
pub fn column_name(col: usize) -> String {
    let mut n = col + 1;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// Converts column letters to a 0-based index.
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut col: usize = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let v = (b.to_ascii_uppercase() - b'A') as usize + 1;
        col = col.checked_mul(26)?.checked_add(v)?;
    }
    Some(col - 1)
}

/// The whole readable range of a table, e.g. `Users!A:Z`.
pub fn table_range(table: &str) -> String {
    format!("{}!A:{}", table, LAST_COLUMN)
}

/// Every data row below the header, e.g. `Products!A2:Z`.
pub fn data_range(table: &str) -> String {
    format!("{}!A2:{}", table, LAST_COLUMN)
}

/// The first cell of a row, used as the anchor when writing a whole row.
pub fn row_anchor(table: &str, row: usize) -> String {
    format!("{}!A{}", table, row)
}

/// A single cell, e.g. `Orders!B5`.
pub fn cell(table: &str, col: usize, row: usize) -> String {
    format!("{}!{}{}", table, column_name(col), row)
}

/// A parsed cell reference: 0-based column, 1-based row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub col: usize,
    pub row: Option<usize>,
}

/// A parsed range; open-ended ranges (`A2:Z`, `A:Z`) have no end row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRef {
    pub start: CellRef,
    pub end: CellRef,
}

/// Strips an optional `Table!` prefix.
pub fn split_table(address: &str) -> (Option<&str>, &str) {
    match address.rsplit_once('!') {
        Some((table, rest)) => (Some(table), rest),
        None => (None, address),
    }
}

/// Parses `B5` or `B` (whole column).
pub fn parse_cell(s: &str) -> Result<CellRef> {
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(s.len());
    let (letters, digits) = s.split_at(split);

    let col = column_index(letters)
        .ok_or_else(|| Error::validation(format!("invalid cell reference: {}", s)))?;
    let row = if digits.is_empty() {
        None
    } else {
        let row: usize = digits
            .parse()
            .map_err(|_| Error::validation(format!("invalid cell reference: {}", s)))?;
        if row == 0 {
            return Err(Error::validation(format!("invalid cell reference: {}", s)));
        }
        Some(row)
    };

    Ok(CellRef { col, row })
}

/// Parses `A2:Z`, `B5`, or `Table!A:Z`.
pub fn parse_range(address: &str) -> Result<RangeRef> {
    let (_, range) = split_table(address);
    match range.split_once(':') {
        Some((start, end)) => Ok(RangeRef {
            start: parse_cell(start)?,
            end: parse_cell(end)?,
        }),
        None => {
            let cell = parse_cell(range)?;
            Ok(RangeRef {
                start: cell,
                end: cell,
            })
        }
    }
}

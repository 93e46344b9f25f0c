//! A1-style cell reference parsing.
//!
//! Rows and columns in this crate are 1-based, so `"A1"` is `(1, 1)` and
//! `"C7"` is row 7, column 3.

use crate::error::{LayoutError, Result};

/// Parse a cell reference like "B3" (absolute markers allowed) into `(row, col)`.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            // Letters after digits ("1A") are not a reference.
            if saw_row {
                return None;
            }
            let upper = ch.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(upper as u32 - 'A' as u32 + 1)?;
            saw_col = true;
        } else if ch.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(ch as u32 - '0' as u32)?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some((row, col))
}

/// Parse "A1:B10" or "A1" into `(top, left, bottom, right)`.
///
/// Corner order is normalized, so "B10:A1" yields the same tuple as "A1:B10".
pub fn parse_cell_range(range: &str) -> Option<(u32, u32, u32, u32)> {
    if let Some((start, end)) = range.split_once(':') {
        let (r1, c1) = parse_cell_ref(start)?;
        let (r2, c2) = parse_cell_ref(end)?;
        Some((r1.min(r2), c1.min(c2), r1.max(r2), c1.max(c2)))
    } else {
        let (row, col) = parse_cell_ref(range)?;
        Some((row, col, row, col))
    }
}

/// Like [`parse_cell_range`] but reports the offending text on failure.
pub fn require_cell_range(range: &str) -> Result<(u32, u32, u32, u32)> {
    parse_cell_range(range).ok_or_else(|| LayoutError::CellRef(range.to_string()))
}

/// Format a 1-based column index as letters (1 -> "A", 27 -> "AA").
#[allow(clippy::cast_possible_truncation)]
pub fn column_letters(col: u32) -> String {
    let mut n = col;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

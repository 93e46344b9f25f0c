use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell_ref::{column_letters, require_cell_range};
use crate::error::{LayoutError, Result};

/// An inclusive, 1-based rectangle of cells.
///
/// Constructed through [`CellRange::new`] the corners are normalized, so
/// `top <= bottom` and `left <= right` always hold. [`CellRange::checked`]
/// rejects inverted input instead.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl CellRange {
    /// Build a range from two corners in any order.
    #[must_use]
    pub fn new(top: u32, left: u32, bottom: u32, right: u32) -> Self {
        Self {
            top: top.min(bottom),
            left: left.min(right),
            bottom: top.max(bottom),
            right: left.max(right),
        }
    }

    /// Build a range, failing when `bottom < top` or `right < left`.
    pub fn checked(top: u32, left: u32, bottom: u32, right: u32) -> Result<Self> {
        if bottom < top || right < left {
            return Err(LayoutError::InvalidRange {
                top,
                left,
                bottom,
                right,
            });
        }
        Ok(Self {
            top,
            left,
            bottom,
            right,
        })
    }

    /// The one-cell range at `(row, col)`.
    #[must_use]
    pub fn single(row: u32, col: u32) -> Self {
        Self {
            top: row,
            left: col,
            bottom: row,
            right: col,
        }
    }

    /// Parse an A1-style range such as `"B2:D4"`.
    pub fn parse(a1: &str) -> Result<Self> {
        let (top, left, bottom, right) = require_cell_range(a1)?;
        Ok(Self {
            top,
            left,
            bottom,
            right,
        })
    }

    pub fn contains_row(&self, row: u32) -> bool {
        row >= self.top && row <= self.bottom
    }

    pub fn contains_col(&self, col: u32) -> bool {
        col >= self.left && col <= self.right
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.contains_row(row) && self.contains_col(col)
    }

    /// True if the two ranges share at least one cell.
    pub fn intersects(&self, other: &Self) -> bool {
        self.top <= other.bottom
            && other.top <= self.bottom
            && self.left <= other.right
            && other.left <= self.right
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            top: self.top.min(other.top),
            left: self.left.min(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.max(other.right),
        }
    }

    /// Number of rows spanned. An inverted range (only reachable through a
    /// struct literal or deserialization) counts as one row.
    pub fn rows(&self) -> u32 {
        self.bottom.saturating_sub(self.top).saturating_add(1)
    }

    /// Number of columns spanned, at least one.
    pub fn cols(&self) -> u32 {
        self.right.saturating_sub(self.left).saturating_add(1)
    }

    pub fn is_single_cell(&self) -> bool {
        self.top == self.bottom && self.left == self.right
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = format!("{}{}", column_letters(self.left), self.top);
        if self.is_single_cell() {
            f.write_str(&start)
        } else {
            write!(
                f,
                "{start}:{}{}",
                column_letters(self.right),
                self.bottom
            )
        }
    }
}

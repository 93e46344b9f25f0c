//! Pre-computed cell positions for one page.
//!
//! Positions are measured from the page's top-left cell, so `(page.top,
//! page.left)` sits at `(0, 0)`. Lookups inside the page are O(1) for
//! positions and O(log n) for hit testing; cells outside the page are
//! measured on demand from the document.

use crate::document::{AnchorResolver, Document};
use crate::error::Result;
use crate::types::{Anchor, CellRange, ResolvedRect};

/// Cumulative row/column edges of a page, plus per-track sizes.
#[derive(Debug, Clone)]
pub struct PageGeometry {
    page: CellRange,
    /// `col_positions[i]` = x of the left edge of column `page.left + i`;
    /// one extra trailing entry holds the right edge of the last column
    col_positions: Vec<f64>,
    row_positions: Vec<f64>,
    col_widths: Vec<f64>,
    row_heights: Vec<f64>,
}

impl PageGeometry {
    /// Measure `page` against the document's row heights and column widths.
    ///
    /// Hidden rows and columns measure 0.
    pub fn new<D: Document + ?Sized>(doc: &D, page: CellRange) -> Self {
        let (col_positions, col_widths) = edges(page.left..=page.right, |c| track_width(doc, c));
        let (row_positions, row_heights) =
            edges(page.top..=page.bottom, |r| track_height(doc, r));

        Self {
            page,
            col_positions,
            row_positions,
            col_widths,
            row_heights,
        }
    }

    pub fn page(&self) -> CellRange {
        self.page
    }

    /// x of the left edge of `col` (negative left of the page).
    pub fn col_x(&self, col: u32, doc: &(impl Document + ?Sized)) -> f64 {
        if let Some(x) = offset_in(col, self.page.left)
            .and_then(|i| self.col_positions.get(i))
        {
            return *x;
        }
        if col < self.page.left {
            -(col..self.page.left).map(|c| track_width(doc, c)).sum::<f64>()
        } else {
            self.total_width()
                + (self.page.right + 1..col)
                    .map(|c| track_width(doc, c))
                    .sum::<f64>()
        }
    }

    /// y of the top edge of `row` (negative above the page).
    pub fn row_y(&self, row: u32, doc: &(impl Document + ?Sized)) -> f64 {
        if let Some(y) = offset_in(row, self.page.top)
            .and_then(|i| self.row_positions.get(i))
        {
            return *y;
        }
        if row < self.page.top {
            -(row..self.page.top).map(|r| track_height(doc, r)).sum::<f64>()
        } else {
            self.total_height()
                + (self.page.bottom + 1..row)
                    .map(|r| track_height(doc, r))
                    .sum::<f64>()
        }
    }

    pub fn col_width(&self, col: u32) -> f64 {
        offset_in(col, self.page.left)
            .and_then(|i| self.col_widths.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn row_height(&self, row: u32) -> f64 {
        offset_in(row, self.page.top)
            .and_then(|i| self.row_heights.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Bounds of a cell range (e.g. a merged region) on this page.
    pub fn range_rect(&self, range: &CellRange, doc: &(impl Document + ?Sized)) -> ResolvedRect {
        let x = self.col_x(range.left, doc);
        let y = self.row_y(range.top, doc);
        let right = self.col_x(range.right.saturating_add(1), doc);
        let bottom = self.row_y(range.bottom.saturating_add(1), doc);
        ResolvedRect::new(x, y, right - x, bottom - y)
    }

    /// Column at page x position (binary search), clamped to the page.
    pub fn col_at_x(&self, x: f64) -> u32 {
        self.page.left + track_at(&self.col_positions, x, self.page.cols())
    }

    /// Row at page y position (binary search), clamped to the page.
    pub fn row_at_y(&self, y: f64) -> u32 {
        self.page.top + track_at(&self.row_positions, y, self.page.rows())
    }

    pub fn total_width(&self) -> f64 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    pub fn total_height(&self) -> f64 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }

    /// Bind the geometry to a document so it can resolve anchors.
    pub fn resolver<'a, D: Document + ?Sized>(&'a self, doc: &'a D) -> GridAnchorResolver<'a, D> {
        GridAnchorResolver {
            geometry: self,
            doc,
        }
    }
}

/// Anchor resolver for targets that lay cells out on a plain grid.
///
/// Corner offsets are fractions of the corner cell's width/height.
#[derive(Debug)]
pub struct GridAnchorResolver<'a, D: ?Sized> {
    geometry: &'a PageGeometry,
    doc: &'a D,
}

impl<D: Document + ?Sized> AnchorResolver for GridAnchorResolver<'_, D> {
    fn anchor_to_rect(&self, anchor: &Anchor, _page: &CellRange) -> Result<ResolvedRect> {
        let g = self.geometry;
        let offsets = anchor.offsets.unwrap_or_default();
        let x1 = g.col_x(anchor.col1, self.doc) + offsets.dx1 * track_width(self.doc, anchor.col1);
        let y1 = g.row_y(anchor.row1, self.doc) + offsets.dy1 * track_height(self.doc, anchor.row1);
        let (x2, y2) = if anchor.offsets.is_some() {
            (
                g.col_x(anchor.col2, self.doc) + offsets.dx2 * track_width(self.doc, anchor.col2),
                g.row_y(anchor.row2, self.doc) + offsets.dy2 * track_height(self.doc, anchor.row2),
            )
        } else {
            // Without offsets the anchor covers its end cell entirely.
            (
                g.col_x(anchor.col2.saturating_add(1), self.doc),
                g.row_y(anchor.row2.saturating_add(1), self.doc),
            )
        };
        Ok(ResolvedRect::new(x1, y1, x2 - x1, y2 - y1))
    }
}

fn track_width<D: Document + ?Sized>(doc: &D, col: u32) -> f64 {
    if doc.is_col_hidden(col) {
        0.0
    } else {
        doc.col_width(col).max(0.0)
    }
}

fn track_height<D: Document + ?Sized>(doc: &D, row: u32) -> f64 {
    if doc.is_row_hidden(row) {
        0.0
    } else {
        doc.row_height(row).max(0.0)
    }
}

fn edges(
    tracks: std::ops::RangeInclusive<u32>,
    size: impl Fn(u32) -> f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut positions = Vec::new();
    let mut sizes = Vec::new();
    let mut at = 0.0;
    for t in tracks {
        positions.push(at);
        let s = size(t);
        sizes.push(s);
        at += s;
    }
    positions.push(at); // Final edge
    (positions, sizes)
}

fn offset_in(index: u32, origin: u32) -> Option<usize> {
    index
        .checked_sub(origin)
        .and_then(|d| usize::try_from(d).ok())
}

fn track_at(positions: &[f64], at: f64, count: u32) -> u32 {
    let i = match positions
        .binary_search_by(|pos| pos.partial_cmp(&at).unwrap_or(std::cmp::Ordering::Equal))
    {
        Ok(i) => i,
        Err(i) => i.saturating_sub(1),
    };
    u32::try_from(i)
        .unwrap_or(u32::MAX)
        .min(count.saturating_sub(1))
}

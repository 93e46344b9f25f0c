//! Boundary traits for the workbook-side collaborators.
//!
//! The layout core never parses a workbook. Everything it needs to know about
//! the sheet being exported comes through [`Document`], and the mapping from
//! a cell anchor to page coordinates comes through [`AnchorResolver`], which
//! each export target (bitmap, PDF, HTML) implements its own way.

use crate::error::Result;
use crate::types::{Anchor, CellRange, FormatId, FormatRef, ResolvedFormat, ResolvedRect, ShapeNode};

/// Read access to the sheet being exported.
pub trait Document {
    /// Height of `row` in page units (0 for a collapsed row).
    fn row_height(&self, row: u32) -> f64;

    /// Width of `col` in page units (0 for a collapsed column).
    fn col_width(&self, col: u32) -> f64;

    fn is_row_hidden(&self, _row: u32) -> bool {
        false
    }

    fn is_col_hidden(&self, _col: u32) -> bool {
        false
    }

    /// Format id used for cells that have nothing more specific.
    fn default_format_id(&self) -> FormatId;

    /// Resolve the format id a cell displays with, inheriting through
    /// row, column and sheet defaults. Expensive.
    fn resolve_visible_format_id(&self, row: u32, col: u32) -> Result<FormatId>;

    /// Materialize the format record behind `id`.
    fn format_by_id(&self, id: FormatId) -> Result<ResolvedFormat>;

    /// Apply conditional formatting for the cell at `(row, col)` on top of
    /// `base`. Returns `None` when no rule changes the format.
    fn apply_conditional_format(
        &self,
        base: &FormatRef,
        row: u32,
        col: u32,
    ) -> Result<Option<ResolvedFormat>>;

    /// Number of drawing objects on the sheet.
    fn object_count(&self) -> usize;

    /// Properties of the object at `index` (0-based), with `z_order` unset.
    fn object_properties(&self, index: usize) -> Option<ShapeNode>;

    /// Text-flow hook called when a text box starting at `(row, col)` is
    /// composited. Targets without text flow leave this as a no-op.
    fn spawn_cell(&self, _row: u32, _col: u32) {}
}

/// Per-target mapping from a cell anchor to a page rectangle.
pub trait AnchorResolver {
    /// Resolve `anchor` against the page covering `page`.
    ///
    /// Only called for anchors that intersect `page`.
    fn anchor_to_rect(&self, anchor: &Anchor, page: &CellRange) -> Result<ResolvedRect>;
}

impl<T: AnchorResolver + ?Sized> AnchorResolver for &T {
    fn anchor_to_rect(&self, anchor: &Anchor, page: &CellRange) -> Result<ResolvedRect> {
        (**self).anchor_to_rect(anchor, page)
    }
}

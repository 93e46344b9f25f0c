//! Common test doubles for the layout core.
//!
//! `SheetDoc` is an in-memory `Document` that counts every call into the
//! expensive collaborator methods, and `CountingResolver` maps anchors on a
//! uniform grid while counting resolutions.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use xlpage::{
    Anchor, AnchorResolver, CellRange, Document, FillSpec, FontSpec, FormatId, FormatRef, LayoutError, ResolvedFormat,
    ResolvedRect, Result, ShapeKind, ShapeNode,
};

pub const ROW_HEIGHT: f64 = 20.0;
pub const COL_WIDTH: f64 = 64.0;

/// In-memory sheet.
#[derive(Default)]
pub struct SheetDoc {
    pub row_heights: HashMap<u32, f64>,
    pub col_widths: HashMap<u32, f64>,
    pub hidden_rows: HashSet<u32>,
    pub hidden_cols: HashSet<u32>,
    /// Cells whose conditional formatting turns them bold
    pub conditional: HashSet<(u32, u32)>,
    /// Format id that makes `format_by_id` fail
    pub broken_format: Option<FormatId>,
    pub objects: Vec<ShapeNode>,
    /// Object positions whose properties cannot be read
    pub unreadable: HashSet<usize>,

    pub resolves: Cell<usize>,
    pub format_loads: Cell<usize>,
    pub conditional_calls: Cell<usize>,
    pub spawned: RefCell<Vec<(u32, u32)>>,
}

impl SheetDoc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(objects: Vec<ShapeNode>) -> Self {
        Self {
            objects,
            ..Self::default()
        }
    }

    /// Calls made into the three format collaborators so far.
    pub fn format_calls(&self) -> usize {
        self.resolves.get() + self.format_loads.get() + self.conditional_calls.get()
    }
}

/// Format id a cell displays with: depends on the column band and row parity.
pub fn format_id_of(row: u32, col: u32) -> FormatId {
    (col / 3) * 2 + row % 2 + 1
}

/// Format record materialized for `id`.
pub fn format_for(id: FormatId) -> ResolvedFormat {
    ResolvedFormat {
        font: FontSpec {
            size: Some(10.0 + f64::from(id)),
            ..FontSpec::default()
        },
        fill: FillSpec::solid(format!("#{:06x}", id * 0x1111)),
        ..ResolvedFormat::default()
    }
}

impl Document for SheetDoc {
    fn row_height(&self, row: u32) -> f64 {
        self.row_heights.get(&row).copied().unwrap_or(ROW_HEIGHT)
    }

    fn col_width(&self, col: u32) -> f64 {
        self.col_widths.get(&col).copied().unwrap_or(COL_WIDTH)
    }

    fn is_row_hidden(&self, row: u32) -> bool {
        self.hidden_rows.contains(&row)
    }

    fn is_col_hidden(&self, col: u32) -> bool {
        self.hidden_cols.contains(&col)
    }

    fn default_format_id(&self) -> FormatId {
        0
    }

    fn resolve_visible_format_id(&self, row: u32, col: u32) -> Result<FormatId> {
        self.resolves.set(self.resolves.get() + 1);
        Ok(format_id_of(row, col))
    }

    fn format_by_id(&self, id: FormatId) -> Result<ResolvedFormat> {
        self.format_loads.set(self.format_loads.get() + 1);
        if self.broken_format == Some(id) {
            return Err(LayoutError::Resolver(format!("format {id} unreadable")));
        }
        Ok(format_for(id))
    }

    fn apply_conditional_format(
        &self,
        base: &FormatRef,
        row: u32,
        col: u32,
    ) -> Result<Option<ResolvedFormat>> {
        self.conditional_calls.set(self.conditional_calls.get() + 1);
        if self.conditional.contains(&(row, col)) {
            let mut f = ResolvedFormat::clone(base);
            f.font.bold = true;
            return Ok(Some(f));
        }
        Ok(None)
    }

    fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn object_properties(&self, index: usize) -> Option<ShapeNode> {
        if self.unreadable.contains(&index) {
            return None;
        }
        self.objects.get(index).cloned()
    }

    fn spawn_cell(&self, row: u32, col: u32) {
        self.spawned.borrow_mut().push((row, col));
    }
}

/// Uniform grid resolver: cell `(r, c)` spans
/// `[(c-1)*cell_w, c*cell_w) x [(r-1)*cell_h, r*cell_h)`, page-relative.
pub struct CountingResolver {
    pub cell_w: f64,
    pub cell_h: f64,
    pub calls: Cell<usize>,
    /// Make every resolution fail
    pub fail: bool,
}

impl CountingResolver {
    pub fn new(cell_w: f64, cell_h: f64) -> Self {
        Self {
            cell_w,
            cell_h,
            calls: Cell::new(0),
            fail: false,
        }
    }
}

impl AnchorResolver for CountingResolver {
    fn anchor_to_rect(&self, anchor: &Anchor, page: &CellRange) -> Result<ResolvedRect> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(LayoutError::Resolver("resolver offline".into()));
        }
        let x = (f64::from(anchor.col1) - f64::from(page.left)) * self.cell_w;
        let y = (f64::from(anchor.row1) - f64::from(page.top)) * self.cell_h;
        let right = (f64::from(anchor.col2) + 1.0 - f64::from(page.left)) * self.cell_w;
        let bottom = (f64::from(anchor.row2) + 1.0 - f64::from(page.top)) * self.cell_h;
        Ok(ResolvedRect::new(x, y, right - x, bottom - y))
    }
}

pub fn shape(r1: u32, c1: u32, r2: u32, c2: u32) -> ShapeNode {
    ShapeNode::new(ShapeKind::Shape, Anchor::cells(r1, c1, r2, c2))
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_rect_close(actual: &ResolvedRect, expected: &ResolvedRect) {
    assert_close(actual.x, expected.x);
    assert_close(actual.y, expected.y);
    assert_close(actual.w, expected.w);
    assert_close(actual.h, expected.h);
}

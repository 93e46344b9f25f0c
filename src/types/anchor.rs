use serde::{Deserialize, Serialize};

use super::{CellRange, ResolvedRect};

/// Upper bound of the normalized coordinate space used by chart-relative anchors.
pub const CHART_COORD_MAX: f64 = 4000.0;

/// Sub-cell offsets for the two anchor corners, as fractions of the corner cell.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CornerOffsets {
    /// Horizontal offset of the top-left corner within `col1`
    pub dx1: f64,
    /// Vertical offset of the top-left corner within `row1`
    pub dy1: f64,
    /// Horizontal offset of the bottom-right corner within `col2`
    pub dx2: f64,
    /// Vertical offset of the bottom-right corner within `row2`
    pub dy2: f64,
}

/// A fractional sub-rectangle of an already-resolved parent frame.
///
/// Used by objects nested inside group shapes: `(0,0,1,1)` covers the whole
/// parent, `(0.5,0,1,0.5)` its top-right quarter.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChildAnchor {
    pub dx1: f64,
    pub dy1: f64,
    pub dx2: f64,
    pub dy2: f64,
}

impl Default for ChildAnchor {
    fn default() -> Self {
        Self::FULL
    }
}

impl ChildAnchor {
    /// The whole parent frame.
    pub const FULL: Self = Self {
        dx1: 0.0,
        dy1: 0.0,
        dx2: 1.0,
        dy2: 1.0,
    };

    #[must_use]
    pub fn new(dx1: f64, dy1: f64, dx2: f64, dy2: f64) -> Self {
        Self { dx1, dy1, dx2, dy2 }
    }

    /// Scale and translate `frame` to the sub-rectangle this anchor names.
    #[must_use]
    pub fn apply(&self, frame: &ResolvedRect) -> ResolvedRect {
        ResolvedRect {
            x: frame.x + frame.w * self.dx1,
            y: frame.y + frame.h * self.dy1,
            w: frame.w * (self.dx2 - self.dx1),
            h: frame.h * (self.dy2 - self.dy1),
        }
    }
}

/// Placement of a drawable object.
///
/// In the default mode the four coordinates are 1-based cell indices. With
/// `chart_coords` set they are normalized `0..=4000` units relative to the
/// page clip rectangle instead.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub row1: u32,
    pub col1: u32,
    pub row2: u32,
    pub col2: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offsets: Option<CornerOffsets>,
    #[serde(default)]
    pub chart_coords: bool,
    /// Region within the parent frame, for objects nested in a group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<ChildAnchor>,
}

impl Anchor {
    /// Cell-unit anchor spanning `(row1,col1)`..`(row2,col2)`.
    #[must_use]
    pub fn cells(row1: u32, col1: u32, row2: u32, col2: u32) -> Self {
        Self {
            row1,
            col1,
            row2,
            col2,
            ..Self::default()
        }
    }

    /// Chart-relative anchor in normalized `0..=4000` units.
    #[must_use]
    pub fn chart(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            row1: y1,
            col1: x1,
            row2: y2,
            col2: x2,
            chart_coords: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_offsets(mut self, offsets: CornerOffsets) -> Self {
        self.offsets = Some(offsets);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: ChildAnchor) -> Self {
        self.child = Some(child);
        self
    }

    /// The outer cell rectangle, ignoring any child anchor.
    ///
    /// This is the bounding anchor used for tile bucketing and page
    /// rejection; a nested child always lies within it.
    pub fn bounds(&self) -> CellRange {
        CellRange::new(self.row1, self.col1, self.row2, self.col2)
    }

    /// Exact overlap test against a cell range.
    pub fn overlaps(&self, range: &CellRange) -> bool {
        self.bounds().intersects(range)
    }
}

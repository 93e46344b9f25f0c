//! Shape compositing: anchors to page rectangles, frames to children,
//! rotation and shadow passes onto a [`Canvas`].
//!
//! Drawing order for one top-level object is obscured shadow, secondary
//! shadow, primary shadow, then the body (see [`shadow_passes`]). Each pass
//! walks the whole node tree. Shadow offsets apply to the top-level frame
//! only; children inherit them through their parent frame.

use std::iter;

use crate::config::LayoutConfig;
use crate::document::{AnchorResolver, Document};
use crate::error::Result;
use crate::layout::ZOrderedShapes;
use crate::types::{
    Anchor, CellRange, ResolvedRect, ShadowPass, ShapeKind, ShapeNode, CHART_COORD_MAX,
};

use super::canvas::{Canvas, StateScope, TransformScope};
use super::shadow::{needs_axis_swap, offset_coords, shadow_passes};

/// Screen-space area of a hyperlinked object.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    /// Axis-aligned bounds of the object's frame after the canvas transform
    pub rect: ResolvedRect,
    pub target: String,
    pub z_order: u32,
}

/// Composites drawing objects onto one page.
///
/// Holds no state between objects; build one per page.
pub struct ShapeCompositor<'a> {
    resolver: &'a dyn AnchorResolver,
    doc: &'a dyn Document,
    page: CellRange,
    clip: ResolvedRect,
    chart_margin: f64,
    zoom: f64,
}

impl<'a> ShapeCompositor<'a> {
    /// `page` is the cell range being exported and `clip` its rectangle in
    /// page units.
    pub fn new(
        resolver: &'a dyn AnchorResolver,
        doc: &'a dyn Document,
        page: CellRange,
        clip: ResolvedRect,
        config: &LayoutConfig,
    ) -> Self {
        Self {
            resolver,
            doc,
            page,
            clip,
            chart_margin: config.chart_margin,
            zoom: config.zoom,
        }
    }

    pub fn page(&self) -> CellRange {
        self.page
    }

    /// Page rectangle of `anchor`, or `None` if it misses the page.
    ///
    /// Chart-relative anchors interpolate inside the clip rect inset by the
    /// chart margin. Cell anchors that miss the page are rejected before the
    /// resolver is asked. Resolved rectangles are narrowed by the child
    /// anchor, if any, and transposed about their center for near-vertical
    /// rotations.
    pub fn resolve_anchor(&self, anchor: &Anchor, rotation: f64) -> Result<Option<ResolvedRect>> {
        if anchor.chart_coords {
            return Ok(Some(self.chart_rect(anchor)));
        }
        if !anchor.overlaps(&self.page) {
            log::trace!(
                "anchor {} outside page {}, skipping resolver",
                anchor.bounds(),
                self.page
            );
            return Ok(None);
        }
        let rect = self.resolver.anchor_to_rect(anchor, &self.page)?;
        let rect = match anchor.child {
            Some(child) => child.apply(&rect),
            None => rect,
        };
        Ok(Some(transpose_for(rect, rotation)))
    }

    fn chart_rect(&self, anchor: &Anchor) -> ResolvedRect {
        let m = self.chart_margin;
        let x0 = self.clip.x + m;
        let y0 = self.clip.y + m;
        let w = (self.clip.w - 2.0 * m).max(0.0);
        let h = (self.clip.h - 2.0 * m).max(0.0);

        let unit = |v: u32| {
            let v = f64::from(v);
            if v > CHART_COORD_MAX {
                log::warn!("chart coordinate {v} beyond {CHART_COORD_MAX}, clamped");
            }
            v.min(CHART_COORD_MAX) / CHART_COORD_MAX
        };
        let x1 = x0 + w * unit(anchor.col1);
        let y1 = y0 + h * unit(anchor.row1);
        let x2 = x0 + w * unit(anchor.col2);
        let y2 = y0 + h * unit(anchor.row2);
        ResolvedRect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Frame of `node`: its own anchor, or its child anchor within `parent`.
    fn frame_of(&self, node: &ShapeNode, parent: Option<&ResolvedRect>) -> Result<Option<ResolvedRect>> {
        match parent {
            Some(parent) => {
                let child = node.anchor.child.unwrap_or_default();
                Ok(Some(transpose_for(child.apply(parent), node.rotation)))
            }
            None => self.resolve_anchor(&node.anchor, node.rotation),
        }
    }

    /// Draw `node` and its children for one pass.
    ///
    /// Returns the frame the node was drawn into, or `None` if it is not on
    /// the page. Body passes record a [`HitRegion`] for hyperlinked nodes.
    /// Every transform and clip pushed here is popped before returning, on
    /// error paths too.
    pub fn composite<C: Canvas + ?Sized>(
        &self,
        node: &ShapeNode,
        parent: Option<&ResolvedRect>,
        pass: ShadowPass,
        canvas: &mut C,
        hits: &mut Vec<HitRegion>,
    ) -> Result<Option<ResolvedRect>> {
        let Some(frame) = self.frame_of(node, parent)? else {
            return Ok(None);
        };
        let top_level = parent.is_none();
        let shadowed = top_level && !node.shadow.is_none();

        // Shadows rotate about the unshifted frame
        let pivot = frame.center();
        let rect = if shadowed {
            offset_coords(&frame, &node.shadow, pass, self.zoom)
        } else {
            frame
        };

        let mut rotated = TransformScope::rotated(canvas, pivot, -node.rotation);
        let obscured_clip = (shadowed && node.shadow.obscured && pass == ShadowPass::Body)
            .then(|| offset_coords(&frame, &node.shadow, ShadowPass::Obscured, self.zoom));
        let mut state = StateScope::clipped(&mut *rotated, obscured_clip.as_ref());

        if node.kind != ShapeKind::Group {
            state.draw_shape(node, &rect, pass)?;
        }

        if pass == ShadowPass::Body {
            if let Some(target) = &node.hyperlink {
                let corners = rect.corners().map(|p| state.transform_point(p));
                if let Some(bounds) = ResolvedRect::bounding(&corners) {
                    hits.push(HitRegion {
                        rect: bounds,
                        target: target.clone(),
                        z_order: node.z_order,
                    });
                }
            }
            if node.kind == ShapeKind::TextBox
                && self.page.contains(node.anchor.row1, node.anchor.col1)
            {
                self.doc.spawn_cell(node.anchor.row1, node.anchor.col1);
            }
        }

        match node.children.split_first() {
            Some((first, rest)) if first.governing => {
                let governed = self.composite(first, Some(&rect), pass, &mut *state, hits)?;
                if let Some(governed) = governed {
                    let mut inner =
                        TransformScope::rotated(&mut *state, governed.center(), -first.rotation);
                    for child in rest {
                        self.composite(child, Some(&governed), pass, &mut *inner, hits)?;
                    }
                }
            }
            _ => {
                for child in &node.children {
                    self.composite(child, Some(&rect), pass, &mut *state, hits)?;
                }
            }
        }

        Ok(Some(rect))
    }

    /// Draw one top-level object with all of its shadow passes.
    pub fn composite_with_shadows<C: Canvas + ?Sized>(
        &self,
        node: &ShapeNode,
        canvas: &mut C,
    ) -> Result<Vec<HitRegion>> {
        let mut hits = Vec::new();
        for pass in shadow_passes(&node.shadow)
            .into_iter()
            .chain(iter::once(ShadowPass::Body))
        {
            self.composite(node, None, pass, canvas, &mut hits)?;
        }
        Ok(hits)
    }

    /// Draw a page's objects bottom to top.
    pub fn composite_page<C: Canvas + ?Sized>(
        &self,
        shapes: &ZOrderedShapes<'_>,
        canvas: &mut C,
    ) -> Result<Vec<HitRegion>> {
        let mut hits = Vec::new();
        for node in shapes.iter() {
            hits.extend(self.composite_with_shadows(node, canvas)?);
        }
        log::debug!(
            "composited {} objects on page {}, {} hit regions",
            shapes.len(),
            self.page,
            hits.len()
        );
        Ok(hits)
    }
}

fn transpose_for(rect: ResolvedRect, rotation: f64) -> ResolvedRect {
    if needs_axis_swap(rotation) {
        rect.swap_axes_about_center()
    } else {
        rect
    }
}

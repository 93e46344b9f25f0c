//! A [`Canvas`] that records what was asked of it.
//!
//! Tracks the transform stack with real affine math, so `transform_point`
//! answers exactly as a raster target would. Useful as a measuring target
//! (hit regions, bounds) and for checking draw order and stack balance.

use crate::error::{LayoutError, Result};
use crate::types::{Point, ResolvedRect, ShadowPass, ShapeKind, ShapeNode};

use super::canvas::Canvas;

/// 2D affine transform `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Rotation by `degrees` about `pivot`, matching [`Point::rotate_about`].
    pub fn rotation_about(pivot: Point, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: pivot.x - cos * pivot.x + sin * pivot.y,
            f: pivot.y - sin * pivot.x - cos * pivot.y,
        }
    }

    /// `self` applied after `inner`.
    #[must_use]
    pub fn then_after(&self, inner: &Self) -> Self {
        Self {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub z_order: u32,
    pub kind: ShapeKind,
    pub name: Option<String>,
    pub rect: ResolvedRect,
    pub pass: ShadowPass,
    /// Screen-space bounds of `rect` under the transform active at draw time
    pub device_bounds: ResolvedRect,
}

/// One recorded canvas operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    SaveTransform,
    ResetTransform,
    SaveState,
    RestoreState,
    Rotate { pivot: Point, degrees: f64 },
    Clip(ResolvedRect),
    Draw(DrawCall),
}

/// Recording canvas.
#[derive(Debug)]
pub struct RecordingCanvas {
    current: Affine,
    saved: Vec<Affine>,
    state_depth: usize,
    ops: Vec<CanvasOp>,
    /// Object (and optionally the one pass) whose draws fail
    fail_on: Option<(u32, Option<ShadowPass>)>,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            current: Affine::IDENTITY,
            saved: Vec::new(),
            state_depth: 0,
            ops: Vec::new(),
            fail_on: None,
        }
    }

    /// Make every draw of the object with `z_order` fail.
    #[must_use]
    pub fn failing_on(mut self, z_order: u32) -> Self {
        self.fail_on = Some((z_order, None));
        self
    }

    /// Make draws of the object with `z_order` fail in `pass` only.
    #[must_use]
    pub fn failing_on_pass(mut self, z_order: u32, pass: ShadowPass) -> Self {
        self.fail_on = Some((z_order, Some(pass)));
        self
    }

    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    /// Draw calls in order.
    pub fn draws(&self) -> Vec<&DrawCall> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Draw(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    /// Saved transforms not yet reset.
    pub fn transform_depth(&self) -> usize {
        self.saved.len()
    }

    /// Saved states not yet restored.
    pub fn state_depth(&self) -> usize {
        self.state_depth
    }

    pub fn current_transform(&self) -> Affine {
        self.current
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn save_transform(&mut self) {
        self.saved.push(self.current);
        self.ops.push(CanvasOp::SaveTransform);
    }

    fn reset_transform(&mut self) {
        match self.saved.pop() {
            Some(t) => self.current = t,
            None => log::warn!("reset_transform without a saved transform"),
        }
        self.ops.push(CanvasOp::ResetTransform);
    }

    fn save_state(&mut self) {
        self.state_depth += 1;
        self.ops.push(CanvasOp::SaveState);
    }

    fn restore_state(&mut self) {
        if self.state_depth == 0 {
            log::warn!("restore_state without a saved state");
        }
        self.state_depth = self.state_depth.saturating_sub(1);
        self.ops.push(CanvasOp::RestoreState);
    }

    fn rotate(&mut self, pivot: Point, degrees: f64) {
        // Canvas angles run counterclockwise, page rotations clockwise
        self.current = self
            .current
            .then_after(&Affine::rotation_about(pivot, -degrees));
        self.ops.push(CanvasOp::Rotate { pivot, degrees });
    }

    fn transform_point(&self, point: Point) -> Point {
        self.current.apply(point)
    }

    fn clip_rect(&mut self, rect: &ResolvedRect) {
        self.ops.push(CanvasOp::Clip(*rect));
    }

    fn draw_shape(&mut self, node: &ShapeNode, rect: &ResolvedRect, pass: ShadowPass) -> Result<()> {
        let fails = self
            .fail_on
            .is_some_and(|(z, only)| z == node.z_order && only.map_or(true, |p| p == pass));
        if fails {
            return Err(LayoutError::Canvas(format!(
                "draw of object {} failed",
                node.z_order
            )));
        }
        let corners = rect.corners().map(|p| self.current.apply(p));
        let device_bounds = ResolvedRect::bounding(&corners).unwrap_or(*rect);
        self.ops.push(CanvasOp::Draw(DrawCall {
            z_order: node.z_order,
            kind: node.kind,
            name: node.name.clone(),
            rect: *rect,
            pass,
            device_bounds,
        }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_affine_matches_point_rotation() {
        let pivot = Point::new(10.0, 20.0);
        let p = Point::new(13.0, 24.0);
        for deg in [0.0, 30.0, 90.0, -45.0, 200.0] {
            let via_affine = Affine::rotation_about(pivot, deg).apply(p);
            assert!(close(via_affine, p.rotate_about(pivot, deg)), "{deg}");
        }
    }

    #[test]
    fn test_negated_canvas_angle_rotates_like_page_rotation() {
        let mut canvas = RecordingCanvas::new();
        let pivot = Point::new(20.0, 10.0);
        canvas.rotate(pivot, -30.0);
        let p = Point::new(40.0, 0.0);
        assert!(close(canvas.transform_point(p), p.rotate_about(pivot, 30.0)));
    }

    #[test]
    fn test_nested_rotations_compose() {
        let mut canvas = RecordingCanvas::new();
        canvas.save_transform();
        canvas.rotate(Point::default(), 30.0);
        canvas.save_transform();
        canvas.rotate(Point::default(), 60.0);
        let p = canvas.transform_point(Point::new(1.0, 0.0));
        assert!(close(p, Point::new(0.0, -1.0)));
        canvas.reset_transform();
        canvas.reset_transform();
        assert_eq!(canvas.current_transform(), Affine::IDENTITY);
        assert_eq!(canvas.transform_depth(), 0);
    }
}

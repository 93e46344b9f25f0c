//! Drawing capability used by the compositor, and scoped guards over it.
//!
//! Transform and clip state are stack disciplines. The compositor never calls
//! the push/pop pairs directly: it takes a [`TransformScope`] or
//! [`StateScope`], which pops on drop only if it pushed, so every exit path
//! (including `?` on a failed draw) leaves the canvas balanced.

use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::types::{Point, ResolvedRect, ShadowPass, ShapeNode};

/// A drawing target.
pub trait Canvas {
    /// Push the current transform.
    fn save_transform(&mut self);

    /// Pop back to the transform saved by the matching `save_transform`.
    fn reset_transform(&mut self);

    /// Push clip and paint state.
    fn save_state(&mut self);

    /// Pop back to the state saved by the matching `save_state`.
    fn restore_state(&mut self);

    /// Rotate subsequent drawing by `degrees` about `pivot`, counterclockwise
    /// on the y-down page. A shape rotated clockwise by `r` is drawn under
    /// `rotate(pivot, -r)`.
    fn rotate(&mut self, pivot: Point, degrees: f64);

    /// Map a page point through the current transform.
    fn transform_point(&self, point: Point) -> Point;

    /// Intersect the clip with `rect`.
    fn clip_rect(&mut self, rect: &ResolvedRect);

    /// Draw one shape (or its shadow, per `pass`) into `rect`.
    fn draw_shape(&mut self, node: &ShapeNode, rect: &ResolvedRect, pass: ShadowPass) -> Result<()>;
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn save_transform(&mut self) {
        (**self).save_transform();
    }

    fn reset_transform(&mut self) {
        (**self).reset_transform();
    }

    fn save_state(&mut self) {
        (**self).save_state();
    }

    fn restore_state(&mut self) {
        (**self).restore_state();
    }

    fn rotate(&mut self, pivot: Point, degrees: f64) {
        (**self).rotate(pivot, degrees);
    }

    fn transform_point(&self, point: Point) -> Point {
        (**self).transform_point(point)
    }

    fn clip_rect(&mut self, rect: &ResolvedRect) {
        (**self).clip_rect(rect);
    }

    fn draw_shape(&mut self, node: &ShapeNode, rect: &ResolvedRect, pass: ShadowPass) -> Result<()> {
        (**self).draw_shape(node, rect, pass)
    }
}

/// Rotation transform held for the lifetime of the guard.
///
/// Acquired only for a non-zero rotation; an unrotated scope is a plain
/// pass-through and releases nothing.
pub struct TransformScope<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    active: bool,
}

impl<'a, C: Canvas + ?Sized> TransformScope<'a, C> {
    /// Rotate by `degrees` about `pivot` if the rotation is not a multiple of 360.
    pub fn rotated(canvas: &'a mut C, pivot: Point, degrees: f64) -> Self {
        let active = degrees.rem_euclid(360.0) != 0.0;
        if active {
            canvas.save_transform();
            canvas.rotate(pivot, degrees);
        }
        Self { canvas, active }
    }

    /// Whether this scope pushed a transform.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl<C: Canvas + ?Sized> Deref for TransformScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for TransformScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for TransformScope<'_, C> {
    fn drop(&mut self) {
        if self.active {
            self.canvas.reset_transform();
        }
    }
}

/// Clip/paint state held for the lifetime of the guard.
pub struct StateScope<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    active: bool,
}

impl<'a, C: Canvas + ?Sized> StateScope<'a, C> {
    /// Save state and clip to `rect` when `clip` is given; otherwise a pass-through.
    pub fn clipped(canvas: &'a mut C, clip: Option<&ResolvedRect>) -> Self {
        let active = clip.is_some();
        if let Some(rect) = clip {
            canvas.save_state();
            canvas.clip_rect(rect);
        }
        Self { canvas, active }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl<C: Canvas + ?Sized> Deref for StateScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for StateScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for StateScope<'_, C> {
    fn drop(&mut self) {
        if self.active {
            self.canvas.restore_state();
        }
    }
}

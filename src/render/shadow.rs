//! Shadow offsets and rotated bounds.
//!
//! Shadow offsets are defined in the shape's unrotated space, so every
//! function here offsets first and rotates second.

use crate::types::{Point, ResolvedRect, Shadow, ShadowKind, ShadowPass, EMU_PER_POINT};

/// Scaling origin that suppresses the rich-shadow size compensation.
const UNSHIFTED_ORIGIN: f64 = -0.5;

/// Whether a rotation (degrees) transposes the stored bounding box.
///
/// True on `[45, 135)` and `[225, 315)` after reducing modulo 360.
pub fn needs_axis_swap(degrees: f64) -> bool {
    let d = degrees.rem_euclid(360.0);
    (45.0..135.0).contains(&d) || (225.0..315.0).contains(&d)
}

/// Rectangle a shadow pass draws into, given the shape's frame.
///
/// The body pass draws the frame unchanged. Shadow passes shift by the
/// pass's offset (EMU converted to points, times `zoom`). Rich shadows take
/// no offset: they are scaled per axis and shifted by `size * (1 - scale)`,
/// except along an axis whose origin is exactly `-0.5`. Negative offsets and
/// scales yield inverted rectangles, which are valid.
pub fn offset_coords(rect: &ResolvedRect, shadow: &Shadow, pass: ShadowPass, zoom: f64) -> ResolvedRect {
    let (ox, oy) = match pass {
        ShadowPass::Body => return *rect,
        ShadowPass::Obscured | ShadowPass::Primary => (shadow.offset_x, shadow.offset_y),
        ShadowPass::Secondary => shadow.secondary(),
    };
    if shadow.kind == ShadowKind::Rich {
        return rich_coords(rect, shadow);
    }
    rect.translate(ox / EMU_PER_POINT * zoom, oy / EMU_PER_POINT * zoom)
}

fn rich_coords(rect: &ResolvedRect, shadow: &Shadow) -> ResolvedRect {
    let mut out = ResolvedRect::new(rect.x, rect.y, rect.w * shadow.scale_x, rect.h * shadow.scale_y);
    if !is_unshifted_origin(shadow.origin_x) {
        out.x += rect.w * (1.0 - shadow.scale_x);
    }
    if !is_unshifted_origin(shadow.origin_y) {
        out.y += rect.h * (1.0 - shadow.scale_y);
    }
    out
}

#[allow(clippy::float_cmp)]
fn is_unshifted_origin(origin: Option<f64>) -> bool {
    origin == Some(UNSHIFTED_ORIGIN)
}

/// Axis-aligned bounds of `rect` rotated by `degrees` about `pivot`.
///
/// Rotates the two diagonals, pairing the corners by the quarter turn the
/// angle falls in (anti-diagonal first in the second and fourth quarters).
pub fn rotate_rect_about(rect: &ResolvedRect, pivot: Point, degrees: f64) -> ResolvedRect {
    let [tl, tr, br, bl] = rect.corners();
    let turn = degrees.rem_euclid(360.0);
    let odd_quadrant = (90.0..180.0).contains(&turn) || (270.0..360.0).contains(&turn);
    let (a, b, c, d) = if odd_quadrant {
        (tr, bl, tl, br)
    } else {
        (tl, br, tr, bl)
    };
    let diag = ResolvedRect::from_points(a.rotate_about(pivot, degrees), b.rotate_about(pivot, degrees));
    let anti = ResolvedRect::from_points(c.rotate_about(pivot, degrees), d.rotate_about(pivot, degrees));
    diag.union(&anti)
}

/// Bounds of a `w` x `h` object at the origin rotated by `degrees`,
/// including every shadow pass it draws.
///
/// Used when exporting a single object as a standalone image. Each shadow
/// rectangle is offset in unrotated space and then rotated about the
/// unrotated object's center.
pub fn rotated_bounds(w: f64, h: f64, degrees: f64, shadow: &Shadow, zoom: f64) -> ResolvedRect {
    let body = ResolvedRect::new(0.0, 0.0, w, h);
    let pivot = body.center();
    let mut bounds = rotate_rect_about(&body, pivot, degrees);

    for pass in shadow_passes(shadow) {
        let offset = offset_coords(&body, shadow, pass, zoom);
        bounds = bounds.union(&rotate_rect_about(&offset, pivot, degrees));
    }
    bounds
}

/// Passes drawn for a shadow, in drawing order, excluding the body.
pub fn shadow_passes(shadow: &Shadow) -> Vec<ShadowPass> {
    if shadow.is_none() {
        return Vec::new();
    }
    let mut passes = Vec::with_capacity(3);
    if shadow.obscured {
        passes.push(ShadowPass::Obscured);
    }
    if shadow.kind.has_secondary() {
        passes.push(ShadowPass::Secondary);
    }
    passes.push(ShadowPass::Primary);
    passes
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn rich(scale_x: f64, scale_y: f64) -> Shadow {
        Shadow {
            kind: ShadowKind::Rich,
            scale_x,
            scale_y,
            ..Shadow::default()
        }
    }

    #[test]
    fn test_plain_offset_in_points() {
        let r = ResolvedRect::new(10.0, 10.0, 40.0, 20.0);
        let s = Shadow::offset(ShadowKind::Normal, 25400.0, -12700.0);
        let out = offset_coords(&r, &s, ShadowPass::Primary, 2.0);
        assert_eq!(out, ResolvedRect::new(14.0, 8.0, 40.0, 20.0));
        assert_eq!(offset_coords(&r, &s, ShadowPass::Body, 2.0), r);
        let sec = offset_coords(&r, &s, ShadowPass::Secondary, 2.0);
        assert_eq!(sec, ResolvedRect::new(6.0, 12.0, 40.0, 20.0));
    }

    #[test]
    fn test_rich_scale_shifts_by_lost_size() {
        let r = ResolvedRect::new(0.0, 0.0, 100.0, 50.0);
        let out = offset_coords(&r, &rich(0.5, 2.0), ShadowPass::Primary, 1.0);
        assert_eq!(out, ResolvedRect::new(50.0, -50.0, 50.0, 100.0));
    }

    #[test]
    fn test_rich_ignores_plain_offset() {
        let r = ResolvedRect::new(0.0, 0.0, 40.0, 40.0);
        let mut s = rich(1.0, 1.0);
        s.offset_x = 5.0 * EMU_PER_POINT;
        s.offset_y = -3.0 * EMU_PER_POINT;
        assert_eq!(offset_coords(&r, &s, ShadowPass::Primary, 2.0), r);
        assert_eq!(offset_coords(&r, &s, ShadowPass::Obscured, 2.0), r);
    }

    #[test]
    fn test_rich_negative_scale_inverts() {
        let r = ResolvedRect::new(0.0, 0.0, 10.0, 10.0);
        let out = offset_coords(&r, &rich(-1.0, 1.0), ShadowPass::Primary, 1.0);
        assert_eq!(out.w, -10.0);
        assert_eq!(out.x, 20.0);
    }

    #[test]
    fn test_axis_swap_boundaries() {
        for (deg, swap) in [
            (0.0, false),
            (44.9, false),
            (45.0, true),
            (134.9, true),
            (135.0, false),
            (225.0, true),
            (315.0, false),
            (-90.0, true),
            (450.0, true),
        ] {
            assert_eq!(needs_axis_swap(deg), swap, "{deg}");
        }
    }

    #[test]
    fn test_rotate_rect_quarter_turn() {
        let r = ResolvedRect::new(0.0, 0.0, 40.0, 20.0);
        let out = rotate_rect_about(&r, r.center(), 90.0);
        assert!((out.w - 20.0).abs() < 1e-9);
        assert!((out.h - 40.0).abs() < 1e-9);
        assert!((out.center().x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_pass_order() {
        let mut s = Shadow::offset(ShadowKind::Double, 1.0, 1.0);
        s.obscured = true;
        assert_eq!(
            shadow_passes(&s),
            vec![ShadowPass::Obscured, ShadowPass::Secondary, ShadowPass::Primary]
        );
        assert!(shadow_passes(&Shadow::default()).is_empty());
    }
}

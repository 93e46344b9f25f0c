//! Page drawing: format lookup, canvas capability and shape compositing.
//!
//! This module provides:
//! - The two-tier visible-format cache used by the page cell loop
//! - The `Canvas` trait and scoped transform/clip guards
//! - Shadow offset and rotated-bounds math
//! - The shape compositor driving a canvas for drawing objects
//! - A recording canvas for measurement and tests

mod canvas;
mod compositor;
mod format_cache;
mod recording;
mod shadow;

pub use canvas::{Canvas, StateScope, TransformScope};
pub use compositor::{HitRegion, ShapeCompositor};
pub use format_cache::{CacheStats, FormatVisibilityCache, PageFormatCache, PageScope};
pub use recording::{Affine, CanvasOp, DrawCall, RecordingCanvas};
pub use shadow::{needs_axis_swap, offset_coords, rotate_rect_about, rotated_bounds, shadow_passes};

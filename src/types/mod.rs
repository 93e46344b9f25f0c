//! Data model shared by the layout and render modules.

mod anchor;
mod format;
mod geometry;
mod range;
mod shape;

pub use anchor::*;
pub use format::*;
pub use geometry::*;
pub use range::*;
pub use shape::*;

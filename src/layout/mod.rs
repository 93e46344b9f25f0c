//! Cell-space structures built once per sheet or page and queried many times.
//!
//! This module handles:
//! - Bucketing drawing objects into a tile grid for page queries
//! - Coalescing merged-cell rectangles per column
//! - Pre-computing page cell positions for anchor resolution

mod merge_cache;
mod page_geometry;
mod spatial_index;

pub use merge_cache::RangeMergeCache;
pub use page_geometry::{GridAnchorResolver, PageGeometry};
pub use spatial_index::{SpatialShapeIndex, TileBucket, TileGrid, ZOrderedShapes};

//! xlpage - page layout core for spreadsheet export
//!
//! Locates, caches and composites what goes on one exported page:
//! - Tile-bucketed spatial index of drawing objects, queried per page in z-order
//! - Per-column coalesced merged-cell ranges
//! - Two-tier cache of each cell's resolved visible format
//! - Shape compositing with nested anchors, rotation and multi-pass shadows
//!
//! Workbook parsing, drawing primitives and output serialization stay with
//! the caller, behind the [`Document`], [`AnchorResolver`] and
//! [`render::Canvas`] traits.
//!
//! # Usage
//!
//! ```ignore
//! let index = SpatialShapeIndex::from_document(&doc, TileGrid::from_config(&config), sheet_range);
//! let geometry = PageGeometry::new(&doc, page);
//! let resolver = geometry.resolver(&doc);
//! let clip = ResolvedRect::new(0.0, 0.0, geometry.total_width(), geometry.total_height());
//! let compositor = ShapeCompositor::new(&resolver, &doc, page, clip, &config);
//! let links = compositor.composite_page(&index.query(&page), &mut canvas)?;
//! ```

pub mod cell_ref;
pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod render;
pub mod types;

pub use config::LayoutConfig;
pub use document::{AnchorResolver, Document};
pub use error::{LayoutError, Result};
pub use layout::{GridAnchorResolver, PageGeometry, RangeMergeCache, SpatialShapeIndex, TileGrid};
pub use render::{FormatVisibilityCache, HitRegion, ShapeCompositor};

pub use types::*;

//! Tile-bucketed index of drawing objects.
//!
//! Objects are bucketed into a coarse grid of `tile_rows x tile_cols` cell
//! tiles over the index bounds, so a page query only looks at objects whose
//! tiles it touches. Tile membership is approximate: every candidate is
//! checked against the exact query range before it is returned.

use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::document::Document;
use crate::types::{CellRange, ShapeNode};

/// Tile dimensions of a [`SpatialShapeIndex`] grid, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub rows_per_tile: u32,
    pub cols_per_tile: u32,
}

impl TileGrid {
    /// A grid of `rows x cols` cell tiles. Zero dimensions are clamped to 1.
    pub fn new(rows_per_tile: u32, cols_per_tile: u32) -> Self {
        if rows_per_tile == 0 || cols_per_tile == 0 {
            log::warn!(
                "spatial index tile of {rows_per_tile}x{cols_per_tile} cells clamped to at least 1x1"
            );
        }
        Self {
            rows_per_tile: rows_per_tile.max(1),
            cols_per_tile: cols_per_tile.max(1),
        }
    }

    /// The grid configured by `tile_rows` and `tile_cols`.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.tile_rows, config.tile_cols)
    }
}

/// Objects bucketed in one tile, as positions in the index's object list.
///
/// Unordered: an object is pushed to every tile its anchor touches.
#[derive(Debug, Default, Clone)]
pub struct TileBucket {
    entries: Vec<usize>,
}

impl TileBucket {
    fn push(&mut self, slot: usize) {
        self.entries.push(slot);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Query result: objects sorted ascending by z-order, each at most once.
///
/// Callers draw in iteration order so later (higher) objects paint over
/// earlier ones.
#[derive(Debug, Default, Clone)]
pub struct ZOrderedShapes<'a> {
    items: Vec<&'a ShapeNode>,
}

impl<'a> ZOrderedShapes<'a> {
    /// Insert keeping z-order sorted. Returns `false` if an object with the
    /// same z-order is already present.
    pub fn insert(&mut self, node: &'a ShapeNode) -> bool {
        match self
            .items
            .binary_search_by_key(&node.z_order, |n| n.z_order)
        {
            Ok(_) => false,
            Err(pos) => {
                self.items.insert(pos, node);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ShapeNode> + '_ {
        self.items.iter().copied()
    }

    pub fn z_orders(&self) -> Vec<u32> {
        self.items.iter().map(|n| n.z_order).collect()
    }

    pub fn as_slice(&self) -> &[&'a ShapeNode] {
        &self.items
    }
}

impl<'a> IntoIterator for ZOrderedShapes<'a> {
    type Item = &'a ShapeNode;
    type IntoIter = std::vec::IntoIter<&'a ShapeNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Spatial index of the printable objects of one sheet.
#[derive(Debug, Clone)]
pub struct SpatialShapeIndex {
    grid: TileGrid,
    bounds: CellRange,
    tiles_down: u32,
    tiles_across: u32,
    /// Accepted objects, in the order they were visited (last to first)
    objects: Vec<ShapeNode>,
    /// Sparse buckets keyed by `(tile_row, tile_col)`
    buckets: HashMap<(u32, u32), TileBucket>,
}

impl SpatialShapeIndex {
    /// Build an index over `bounds` from objects in document order.
    ///
    /// Objects are visited from last to first. Hidden, non-printing and
    /// comment objects are dropped; every accepted object gets its 1-based
    /// document position as z-order.
    pub fn build(grid: TileGrid, bounds: CellRange, objects: Vec<ShapeNode>) -> Self {
        Self::from_slots(grid, bounds, objects.into_iter().map(Some).collect())
    }

    /// Build from document slots; an empty slot keeps its position so later
    /// objects still get their document z-order.
    fn from_slots(grid: TileGrid, bounds: CellRange, slots: Vec<Option<ShapeNode>>) -> Self {
        let tiles_down = bounds.rows().div_ceil(grid.rows_per_tile).max(1);
        let tiles_across = bounds.cols().div_ceil(grid.cols_per_tile).max(1);

        let mut index = Self {
            grid,
            bounds,
            tiles_down,
            tiles_across,
            objects: Vec::with_capacity(slots.len()),
            buckets: HashMap::new(),
        };

        for (position, entry) in slots.into_iter().enumerate().rev() {
            let Some(mut node) = entry.filter(ShapeNode::is_page_object) else {
                continue;
            };
            node.z_order = u32::try_from(position + 1).unwrap_or(u32::MAX);

            let area = node.anchor.bounds();
            let (row_tiles, col_tiles) = index.tile_span(&area);
            let slot = index.objects.len();
            index.objects.push(node);
            for tile_row in row_tiles.0..=row_tiles.1 {
                for tile_col in col_tiles.0..=col_tiles.1 {
                    index
                        .buckets
                        .entry((tile_row, tile_col))
                        .or_default()
                        .push(slot);
                }
            }
        }

        log::debug!(
            "spatial index over {bounds}: {} objects in {} of {}x{} tiles",
            index.objects.len(),
            index.buckets.len(),
            index.tiles_down,
            index.tiles_across
        );
        index
    }

    /// Build from the objects a [`Document`] enumerates.
    ///
    /// Objects the document cannot describe are skipped without shifting the
    /// z-order of the ones after them.
    pub fn from_document<D: Document + ?Sized>(doc: &D, grid: TileGrid, bounds: CellRange) -> Self {
        let slots = (0..doc.object_count())
            .map(|i| {
                let node = doc.object_properties(i);
                if node.is_none() {
                    log::trace!("object {i} has no properties, skipped");
                }
                node
            })
            .collect();
        Self::from_slots(grid, bounds, slots)
    }

    /// Objects whose anchor intersects `range`, ascending by z-order.
    pub fn query(&self, range: &CellRange) -> ZOrderedShapes<'_> {
        let mut result = ZOrderedShapes::default();
        let (row_tiles, col_tiles) = self.tile_span(range);
        for tile_row in row_tiles.0..=row_tiles.1 {
            for tile_col in col_tiles.0..=col_tiles.1 {
                let Some(bucket) = self.buckets.get(&(tile_row, tile_col)) else {
                    continue;
                };
                for &slot in &bucket.entries {
                    let Some(node) = self.objects.get(slot) else {
                        continue;
                    };
                    if node.anchor.overlaps(range) {
                        result.insert(node);
                    }
                }
            }
        }
        result
    }

    /// Number of accepted objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Tiles in each axis: `(down, across)`.
    pub fn tile_counts(&self) -> (u32, u32) {
        (self.tiles_down, self.tiles_across)
    }

    pub fn bounds(&self) -> CellRange {
        self.bounds
    }

    /// Accepted objects, last document position first.
    pub fn objects(&self) -> &[ShapeNode] {
        &self.objects
    }

    /// Bucket for one tile, if any object landed there.
    pub fn bucket(&self, tile_row: u32, tile_col: u32) -> Option<&TileBucket> {
        self.buckets.get(&(tile_row, tile_col))
    }

    /// Inclusive tile ranges `((row_first, row_last), (col_first, col_last))`
    /// covered by `area`, clamped to the grid.
    fn tile_span(&self, area: &CellRange) -> ((u32, u32), (u32, u32)) {
        let rows = (
            tile_of(area.top, self.bounds.top, self.grid.rows_per_tile, self.tiles_down),
            tile_of(area.bottom, self.bounds.top, self.grid.rows_per_tile, self.tiles_down),
        );
        let cols = (
            tile_of(area.left, self.bounds.left, self.grid.cols_per_tile, self.tiles_across),
            tile_of(area.right, self.bounds.left, self.grid.cols_per_tile, self.tiles_across),
        );
        (rows, cols)
    }
}

/// Tile index of cell `pos` along one axis, clamped to `[0, count - 1]`.
fn tile_of(pos: u32, origin: u32, per_tile: u32, count: u32) -> u32 {
    if pos < origin {
        return 0;
    }
    ((pos - origin) / per_tile).min(count.saturating_sub(1))
}

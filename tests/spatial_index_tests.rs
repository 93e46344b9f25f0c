//! Tests for the tile-bucketed drawing object index.
//!
//! Queries must return exactly the objects whose anchor intersects the
//! query range, ascending by z-order, each once, whatever the tile size.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

mod common;

use common::{shape, SheetDoc};
use proptest::prelude::*;
use test_case::test_case;
use xlpage::{CellRange, LayoutConfig, ShapeKind, ShapeNode, SpatialShapeIndex, TileGrid};

#[test]
fn test_single_cell_object_on_small_grid() {
    let index = SpatialShapeIndex::build(
        TileGrid::new(2, 2),
        CellRange::new(1, 1, 10, 10),
        vec![shape(3, 3, 3, 3)],
    );
    let hits = index.query(&CellRange::new(1, 1, 4, 4));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.iter().next().unwrap().anchor.bounds(), CellRange::single(3, 3));
    assert!(index.query(&CellRange::new(6, 6, 10, 10)).is_empty());
}

#[test_case(CellRange::new(3, 3, 3, 3), true ; "exact cell")]
#[test_case(CellRange::new(1, 1, 2, 2), false ; "same tile row, no overlap")]
#[test_case(CellRange::new(4, 4, 4, 4), false ; "same tile, next cell")]
#[test_case(CellRange::new(3, 1, 3, 10), true ; "row band")]
#[test_case(CellRange::new(1, 3, 10, 3), true ; "column band")]
fn test_tile_mates_are_filtered(range: CellRange, expected: bool) {
    let index = SpatialShapeIndex::build(
        TileGrid::new(2, 2),
        CellRange::new(1, 1, 10, 10),
        vec![shape(3, 3, 3, 3)],
    );
    assert_eq!(!index.query(&range).is_empty(), expected);
}

#[test]
fn test_z_order_follows_document_position() {
    let objects = vec![
        shape(1, 1, 4, 4),
        shape(2, 2, 2, 2),
        ShapeNode::new(ShapeKind::Comment, common::shape(1, 1, 1, 1).anchor),
        shape(3, 3, 9, 9),
    ];
    let index = SpatialShapeIndex::build(TileGrid::new(3, 3), CellRange::new(1, 1, 12, 12), objects);
    assert_eq!(index.len(), 3);
    assert_eq!(index.query(&CellRange::new(1, 1, 12, 12)).z_orders(), vec![1, 2, 4]);
}

#[test]
fn test_from_document() {
    let doc = SheetDoc::with_objects(vec![shape(5, 5, 6, 6), shape(50, 1, 60, 2)]);
    let index = SpatialShapeIndex::from_document(&doc, TileGrid::new(16, 4), CellRange::new(1, 1, 64, 16));
    assert_eq!(index.len(), 2);
    assert_eq!(index.tile_counts(), (4, 4));
    assert_eq!(index.query(&CellRange::new(55, 1, 55, 1)).z_orders(), vec![2]);
}

#[test]
fn test_unreadable_object_keeps_later_z_orders() {
    let mut doc = SheetDoc::with_objects(vec![shape(1, 1, 1, 1), shape(2, 2, 2, 2), shape(3, 3, 3, 3)]);
    doc.unreadable.insert(1);
    let index = SpatialShapeIndex::from_document(&doc, TileGrid::new(4, 4), CellRange::new(1, 1, 8, 8));
    assert_eq!(index.len(), 2);
    assert_eq!(index.query(&CellRange::new(3, 3, 3, 3)).z_orders(), vec![3]);
    assert_eq!(index.query(&CellRange::new(1, 1, 8, 8)).z_orders(), vec![1, 3]);
}

#[test]
fn test_tile_grid_from_config() {
    let config = LayoutConfig::from_json(r#"{"tileRows": 4, "tileCols": 2}"#).unwrap();
    let index = SpatialShapeIndex::build(
        TileGrid::from_config(&config),
        CellRange::new(1, 1, 16, 16),
        vec![shape(5, 3, 5, 3)],
    );
    assert_eq!(index.tile_counts(), (4, 8));
    assert!(index.bucket(1, 1).is_some());
    assert_eq!(TileGrid::from_config(&LayoutConfig::default()), TileGrid::new(64, 16));
}

#[test]
fn test_large_sparse_sheet_allocates_few_buckets() {
    let bounds = CellRange::new(1, 1, 1_048_576, 16_384);
    let index = SpatialShapeIndex::build(
        TileGrid::new(64, 16),
        bounds,
        vec![shape(1, 1, 2, 2), shape(1_000_000, 16_000, 1_000_001, 16_001)],
    );
    assert_eq!(index.tile_counts(), (16_384, 1_024));
    assert!(index.bucket(0, 0).is_some());
    assert_eq!(
        index.query(&CellRange::new(999_990, 15_990, 1_000_010, 16_010)).z_orders(),
        vec![2]
    );
}

fn range_strategy() -> impl Strategy<Value = CellRange> {
    (1u32..40, 1u32..40, 0u32..8, 0u32..8)
        .prop_map(|(top, left, h, w)| CellRange::new(top, left, top + h, left + w))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_query_matches_brute_force(
        anchors in prop::collection::vec(range_strategy(), 0..24),
        query in range_strategy(),
        tile_rows in 0u32..6,
        tile_cols in 0u32..6,
    ) {
        let objects: Vec<ShapeNode> = anchors
            .iter()
            .map(|r| shape(r.top, r.left, r.bottom, r.right))
            .collect();
        let index = SpatialShapeIndex::build(
            TileGrid::new(tile_rows, tile_cols),
            CellRange::new(5, 5, 30, 30),
            objects,
        );

        let expected: Vec<u32> = anchors
            .iter()
            .enumerate()
            .filter(|(_, r)| r.intersects(&query))
            .map(|(i, _)| i as u32 + 1)
            .collect();
        prop_assert_eq!(index.query(&query).z_orders(), expected);
    }

    #[test]
    fn prop_results_strictly_ascending(
        anchors in prop::collection::vec(range_strategy(), 1..24),
        query in range_strategy(),
    ) {
        let objects: Vec<ShapeNode> = anchors
            .iter()
            .map(|r| shape(r.top, r.left, r.bottom, r.right))
            .collect();
        let index = SpatialShapeIndex::build(TileGrid::new(2, 2), CellRange::new(1, 1, 48, 48), objects);
        let z = index.query(&query).z_orders();
        prop_assert!(z.windows(2).all(|w| w[0] < w[1]));
    }
}

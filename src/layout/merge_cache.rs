//! Coalesced merged-cell lookup.
//!
//! Each column keeps a list of merged rectangles sorted by top row, with
//! pairwise disjoint row intervals. A rectangle is registered in every column
//! from its left edge through the column just past its right edge, so two
//! merges that meet at a vertical edge share a column and are unioned, just
//! like two merges whose row intervals overlap in a common column.
//!
//! Unioning can widen a rectangle past the columns that were visited, so
//! insertion repeats over the union's full span until it stops growing.

use std::collections::HashMap;

use crate::types::CellRange;

/// Per-column interval store of merged regions.
#[derive(Debug, Default, Clone)]
pub struct RangeMergeCache {
    columns: HashMap<u32, Vec<CellRange>>,
}

impl RangeMergeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from `(top, left, bottom, right)` tuples.
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32, u32, u32)>,
    {
        let mut cache = Self::new();
        for (top, left, bottom, right) in ranges {
            cache.add(top, left, bottom, right);
        }
        cache
    }

    /// Register a merged rectangle.
    ///
    /// Inverted and single-cell rectangles carry no merge information and
    /// are ignored.
    pub fn add(&mut self, top: u32, left: u32, bottom: u32, right: u32) {
        if bottom < top || right < left {
            return;
        }
        if top == bottom && left == right {
            return;
        }

        let mut region = CellRange {
            top,
            left,
            bottom,
            right,
        };
        loop {
            let before = region;
            for col in region.left..=region.right.saturating_add(1) {
                region = self.insert_in_column(col, region);
            }
            if region == before {
                break;
            }
            log::trace!("merge {before} grew to {region}, revisiting columns");
        }
    }

    /// Union `region` into the list for `col`, returning the grown region.
    fn insert_in_column(&mut self, col: u32, region: CellRange) -> CellRange {
        let list = self.columns.entry(col).or_default();

        let pos = list.partition_point(|r| r.top < region.top);
        // The entry before may start above us and still reach into our rows.
        let mut first = pos;
        if let Some(prev) = pos.checked_sub(1).and_then(|i| list.get(i)) {
            if prev.bottom >= region.top {
                first = pos - 1;
            }
        }

        let mut union = region;
        let mut end = first;
        while let Some(next) = list.get(end) {
            if next.top > union.bottom {
                break;
            }
            union = union.union(next);
            end += 1;
        }

        list.splice(first..end, std::iter::once(union));
        union
    }

    /// The merged region containing `(row, col)`, or the cell itself.
    pub fn query(&self, row: u32, col: u32) -> CellRange {
        self.find(row, col)
            .unwrap_or_else(|| CellRange::single(row, col))
    }

    /// True if `(row, col)` lies in a registered merge.
    pub fn is_merged(&self, row: u32, col: u32) -> bool {
        self.find(row, col).is_some()
    }

    fn find(&self, row: u32, col: u32) -> Option<CellRange> {
        let list = self.columns.get(&col)?;
        let idx = match list.binary_search_by_key(&row, |r| r.top) {
            Ok(i) => i,
            Err(i) => i.checked_sub(1)?,
        };
        list.get(idx)
            .filter(|r| r.contains(row, col))
            .copied()
    }

    /// Every distinct merged region, sorted by top row then left column.
    pub fn regions(&self) -> Vec<CellRange> {
        let mut out: Vec<CellRange> = self
            .columns
            .iter()
            .flat_map(|(&col, list)| list.iter().filter(move |r| r.left == col).copied())
            .collect();
        out.sort_by_key(|r| (r.top, r.left));
        out
    }

    /// Number of distinct merged regions.
    pub fn len(&self) -> usize {
        self.columns
            .iter()
            .map(|(&col, list)| list.iter().filter(|r| r.left == col).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.values().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    /// Stored intervals for one column, sorted by top row.
    pub fn column(&self, col: u32) -> &[CellRange] {
        self.columns.get(&col).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignores_degenerate_input() {
        let mut cache = RangeMergeCache::new();
        cache.add(3, 3, 3, 3);
        cache.add(5, 1, 4, 2);
        cache.add(1, 5, 2, 4);
        assert!(cache.is_empty());
        assert_eq!(cache.query(3, 3), CellRange::single(3, 3));
    }

    #[test]
    fn test_edge_adjacent_merges_union() {
        let mut cache = RangeMergeCache::new();
        cache.add(2, 2, 4, 4);
        cache.add(3, 5, 3, 6);
        assert_eq!(cache.regions(), vec![CellRange::new(2, 2, 4, 6)]);
        assert_eq!(cache.query(4, 6), CellRange::new(2, 2, 4, 6));
        assert_eq!(cache.query(5, 6), CellRange::single(5, 6));
    }

    #[test]
    fn test_vertically_stacked_merges_stay_apart() {
        let cache = RangeMergeCache::from_ranges([(1, 1, 2, 2), (3, 1, 4, 2)]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.query(2, 2), CellRange::new(1, 1, 2, 2));
        assert_eq!(cache.query(3, 1), CellRange::new(3, 1, 4, 2));
    }

    #[test]
    fn test_preceding_entry_reaching_into_range() {
        let mut cache = RangeMergeCache::new();
        cache.add(1, 1, 10, 1);
        cache.add(5, 1, 6, 1);
        assert_eq!(cache.column(1), &[CellRange::new(1, 1, 10, 1)]);
    }

    #[test]
    fn test_sweep_consumes_several_entries() {
        let mut cache = RangeMergeCache::new();
        cache.add(1, 3, 2, 3);
        cache.add(4, 3, 5, 3);
        cache.add(8, 3, 9, 3);
        cache.add(2, 3, 4, 3);
        assert_eq!(
            cache.column(3),
            &[CellRange::new(1, 3, 5, 3), CellRange::new(8, 3, 9, 3)]
        );
    }

    #[test]
    fn test_chain_through_other_columns() {
        let mut cache = RangeMergeCache::new();
        cache.add(1, 1, 2, 2);
        cache.add(10, 5, 11, 6);
        // Links the two through column 3 and column 5.
        cache.add(2, 3, 10, 4);
        assert_eq!(cache.regions(), vec![CellRange::new(1, 1, 11, 6)]);
        for col in 1..=7 {
            assert_eq!(cache.column(col).len(), 1, "column {col}");
        }
    }

    #[test]
    fn test_add_twice_is_idempotent() {
        let mut cache = RangeMergeCache::new();
        cache.add(2, 2, 3, 3);
        let once = cache.regions();
        cache.add(2, 2, 3, 3);
        assert_eq!(cache.regions(), once);
        assert_eq!(cache.column(2).len(), 1);
    }
}

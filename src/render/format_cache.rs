//! Two-tier cache for a cell's resolved visible format.
//!
//! The global tier maps format ids to shared [`FormatRef`]s for the whole
//! export. The page tier is a dense table over the page being exported,
//! created by [`FormatVisibilityCache::begin_page`] and dropped with the
//! returned [`PageScope`], so a second scan of the same page never reaches
//! the document.
//!
//! Conditional formatting depends on the cell position, so it is applied per
//! cell and only its result is stored in the page tier.

use std::collections::{HashMap, VecDeque};
use std::ops::{Deref, DerefMut};

use crate::config::LayoutConfig;
use crate::document::Document;
use crate::error::Result;
use crate::types::{CellRange, FormatId, FormatRef};

/// Dense per-page table of resolved formats.
#[derive(Debug)]
pub struct PageFormatCache {
    area: CellRange,
    cols: usize,
    slots: Vec<Option<FormatRef>>,
}

impl PageFormatCache {
    pub fn new(area: CellRange) -> Self {
        let cols = area.cols() as usize;
        let rows = area.rows() as usize;
        Self {
            area,
            cols,
            slots: vec![None; rows.saturating_mul(cols)],
        }
    }

    pub fn area(&self) -> CellRange {
        self.area
    }

    /// Whether `(row, col)` falls inside the page.
    pub fn includes(&self, row: u32, col: u32) -> bool {
        self.area.contains(row, col)
    }

    /// Whether `(row, col)` is inside the page and has a stored format.
    pub fn is_valid(&self, row: u32, col: u32) -> bool {
        self.get_format(row, col).is_some()
    }

    pub fn get_format(&self, row: u32, col: u32) -> Option<&FormatRef> {
        let slot = self.slot(row, col)?;
        self.slots.get(slot)?.as_ref()
    }

    /// Store a format. Coordinates outside the page are ignored.
    pub fn set_format(&mut self, row: u32, col: u32, format: FormatRef) {
        if let Some(entry) = self.slot(row, col).and_then(|i| self.slots.get_mut(i)) {
            *entry = Some(format);
        }
    }

    fn slot(&self, row: u32, col: u32) -> Option<usize> {
        if !self.includes(row, col) {
            return None;
        }
        let r = (row - self.area.top) as usize;
        let c = (col - self.area.left) as usize;
        Some(r * self.cols + c)
    }
}

/// Format-id cache with a fixed capacity.
///
/// Insertion-order eviction: once full, the oldest id is dropped. Lookups do
/// not promote entries. A capacity of 0 disables caching.
#[derive(Debug)]
struct FormatIdCache {
    entries: HashMap<FormatId, FormatRef>,
    order: VecDeque<FormatId>,
    capacity: usize,
}

impl FormatIdCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn get(&self, id: FormatId) -> Option<&FormatRef> {
        self.entries.get(&id)
    }

    fn insert(&mut self, id: FormatId, format: FormatRef) {
        if self.capacity == 0 || self.entries.contains_key(&id) {
            return;
        }
        self.entries.insert(id, format);
        self.order.push_back(id);
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Hit/miss counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the page tier
    pub page_hits: u64,
    /// Format ids found in the global tier
    pub format_hits: u64,
    /// Format ids materialized from the document
    pub format_misses: u64,
    /// Calls to the document's visible-format-id resolver
    pub resolves: u64,
}

/// Memo of the last row or column size check.
#[derive(Debug, Default, Clone, Copy)]
struct TrackMemo {
    last: Option<(u32, bool)>,
}

impl TrackMemo {
    fn collapsed(&mut self, index: u32, check: impl FnOnce() -> bool) -> bool {
        match self.last {
            Some((i, collapsed)) if i == index => collapsed,
            _ => {
                let collapsed = check();
                self.last = Some((index, collapsed));
                collapsed
            }
        }
    }
}

/// Cache of resolved visible cell formats.
#[derive(Debug)]
pub struct FormatVisibilityCache {
    formats: FormatIdCache,
    page: Option<PageFormatCache>,
    last_row: TrackMemo,
    last_col: TrackMemo,
    max_page_cells: u64,
    stats: CacheStats,
}

impl Default for FormatVisibilityCache {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl FormatVisibilityCache {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            formats: FormatIdCache::new(config.format_cache_capacity),
            page: None,
            last_row: TrackMemo::default(),
            last_col: TrackMemo::default(),
            max_page_cells: config.max_page_cells,
            stats: CacheStats::default(),
        }
    }

    /// Start a page. The page tier lives until the returned scope drops.
    ///
    /// Pages larger than the configured cell budget run without a page tier.
    pub fn begin_page(&mut self, area: CellRange) -> PageScope<'_> {
        self.last_row = TrackMemo::default();
        self.last_col = TrackMemo::default();
        let cells = u64::from(area.rows()) * u64::from(area.cols());
        self.page = if cells <= self.max_page_cells {
            log::debug!("page format cache for {area} ({cells} cells)");
            Some(PageFormatCache::new(area))
        } else {
            log::debug!("page {area} has {cells} cells, running without page format cache");
            None
        };
        PageScope { cache: self }
    }

    fn end_page(&mut self) {
        if let Some(page) = self.page.take() {
            log::debug!("page format cache for {} released", page.area());
        }
        self.last_row = TrackMemo::default();
        self.last_col = TrackMemo::default();
    }

    /// The active page tier, if any.
    pub fn page(&self) -> Option<&PageFormatCache> {
        self.page.as_ref()
    }

    /// Resolved visible format of the cell at `(row, col)`.
    ///
    /// Cells in collapsed rows or columns are not cached and fall back to the
    /// document's default format, unless `merged` says the cell belongs to a
    /// merged region, whose format follows its anchor cell regardless.
    pub fn cell_visible_format<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        row: u32,
        col: u32,
        merged: bool,
    ) -> Result<FormatRef> {
        let cacheable = merged || !self.is_collapsed(doc, row, col);

        if !cacheable {
            return self.format_for_id(doc, doc.default_format_id());
        }

        if let Some(format) = self.page.as_ref().and_then(|p| p.get_format(row, col)) {
            self.stats.page_hits += 1;
            return Ok(format.clone());
        }

        self.stats.resolves += 1;
        let id = doc.resolve_visible_format_id(row, col)?;
        let base = self.format_for_id(doc, id)?;
        let resolved = match doc.apply_conditional_format(&base, row, col)? {
            Some(overridden) => FormatRef::new(overridden),
            None => base,
        };
        if let Some(page) = self.page.as_mut() {
            page.set_format(row, col, resolved.clone());
        }
        Ok(resolved)
    }

    fn is_collapsed<D: Document + ?Sized>(&mut self, doc: &D, row: u32, col: u32) -> bool {
        let row_collapsed = self
            .last_row
            .collapsed(row, || doc.is_row_hidden(row) || doc.row_height(row) <= 0.0);
        let col_collapsed = self
            .last_col
            .collapsed(col, || doc.is_col_hidden(col) || doc.col_width(col) <= 0.0);
        row_collapsed || col_collapsed
    }

    /// Shared format for `id`, materialized on first use.
    pub fn format_for_id<D: Document + ?Sized>(&mut self, doc: &D, id: FormatId) -> Result<FormatRef> {
        if let Some(format) = self.formats.get(id) {
            self.stats.format_hits += 1;
            return Ok(format.clone());
        }
        self.stats.format_misses += 1;
        log::trace!("format id {id} not cached, materializing");
        let format = FormatRef::new(doc.format_by_id(id)?);
        self.formats.insert(id, format.clone());
        Ok(format)
    }

    /// Number of format ids in the global tier.
    pub fn cached_formats(&self) -> usize {
        self.formats.len()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop both tiers and reset the row/column memo.
    pub fn clear(&mut self) {
        self.formats.clear();
        self.page = None;
        self.last_row = TrackMemo::default();
        self.last_col = TrackMemo::default();
        self.stats = CacheStats::default();
    }
}

/// Guard for one page of cell lookups; releases the page tier on drop.
#[derive(Debug)]
pub struct PageScope<'a> {
    cache: &'a mut FormatVisibilityCache,
}

impl Deref for PageScope<'_> {
    type Target = FormatVisibilityCache;

    fn deref(&self) -> &Self::Target {
        &*self.cache
    }
}

impl DerefMut for PageScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.cache
    }
}

impl Drop for PageScope<'_> {
    fn drop(&mut self) {
        self.cache.end_page();
    }
}

//! Tunables for page layout.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration and callers only spell out what they change.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Default inset, in page units, applied to chart-relative anchors.
pub const DEFAULT_CHART_MARGIN: f64 = 5.0;

/// Layout configuration for one export.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Rows per spatial-index tile
    pub tile_rows: u32,
    /// Columns per spatial-index tile
    pub tile_cols: u32,
    /// Inset on every side of the page clip rect for chart-relative anchors
    pub chart_margin: f64,
    /// Zoom factor applied to shadow offsets
    pub zoom: f64,
    /// Entries kept in the format-id cache (0 disables it)
    pub format_cache_capacity: usize,
    /// Largest page (rows x cols) that gets a dense page cache
    pub max_page_cells: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tile_rows: 64,
            tile_cols: 16,
            chart_margin: DEFAULT_CHART_MARGIN,
            zoom: 1.0,
            format_cache_capacity: 4096,
            max_page_cells: 4_000_000,
        }
    }
}

impl LayoutConfig {
    /// Read a configuration from JSON, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot produce a meaningful layout.
    ///
    /// Zero tile dimensions are not rejected: the index clamps them to 1.
    pub fn validate(&self) -> Result<()> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(LayoutError::Config(format!(
                "zoom must be a positive number, got {}",
                self.zoom
            )));
        }
        if !self.chart_margin.is_finite() || self.chart_margin < 0.0 {
            return Err(LayoutError::Config(format!(
                "chartMargin must be non-negative, got {}",
                self.chart_margin
            )));
        }
        Ok(())
    }
}

//! Structured error types for xlpage.
//!
//! Out-of-range geometry is never reported through these types: the layout
//! structures clamp or ignore it. Errors come from configuration input and
//! from the external collaborators (document accessor, anchor resolver,
//! canvas) the compositor and format cache call into.

/// All errors that can occur while laying out or compositing a page.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// Invalid A1-style cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// A range whose bottom/right edge precedes its top/left edge was passed
    /// to a constructor that does not accept inverted ranges.
    #[error("Invalid range: ({top},{left})-({bottom},{right})")]
    InvalidRange {
        top: u32,
        left: u32,
        bottom: u32,
        right: u32,
    },

    /// Configuration could not be read.
    #[error("Configuration: {0}")]
    Config(String),

    /// JSON decoding error (configuration documents).
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An external resolver (format lookup, anchor resolution) failed.
    #[error("Resolver failed: {0}")]
    Resolver(String),

    /// A canvas primitive failed.
    #[error("Canvas error: {0}")]
    Canvas(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

impl From<String> for LayoutError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for LayoutError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

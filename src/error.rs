//! Typed error types for serp-pixel.
//!
//! Library calls return `SerpError` so callers can tell a missing font from
//! a bad spreadsheet cell. The binary wraps these in `anyhow` at the process
//! boundary.

use serp_pixel_fonts::FontError;
use thiserror::Error;

/// Top-level error type for width measurement and batch checks.
#[derive(Debug, Error)]
pub enum SerpError {
    // -----------------------------------------------------------------------
    // Measurement
    // -----------------------------------------------------------------------
    /// Font resolution, loading or shaping failed.
    #[error(transparent)]
    Font(#[from] FontError),

    /// A field name other than title or description was requested.
    #[error("unknown field kind '{0}' (expected 'title' or 'description')")]
    InvalidFieldKind(String),

    // -----------------------------------------------------------------------
    // Batch input
    // -----------------------------------------------------------------------
    /// A cell of a batch row could not be interpreted as text.
    #[error("row {row}: {reason}")]
    RowRead {
        /// Spreadsheet row number
        row: usize,
        /// Why the cell was rejected
        reason: String,
    },

    /// The sheet file could not be opened.
    #[error("sheet '{path}' could not be read: {source}")]
    Sheet {
        /// Path of the sheet file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A spreadsheet column reference is not made of letters.
    #[error("invalid column '{0}' (expected letters such as E or AB)")]
    InvalidColumn(String),
}

impl SerpError {
    /// Whether the error is isolated to one batch row's input.
    pub fn is_row_read(&self) -> bool {
        matches!(self, SerpError::RowRead { .. })
    }
}

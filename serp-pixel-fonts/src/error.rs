//! Typed error types for serp-pixel-fonts.

use thiserror::Error;

use crate::script::ScriptCategory;

/// Errors raised while resolving, loading or shaping fonts.
#[derive(Debug, Error)]
pub enum FontError {
    /// Neither the category's own font nor the Latin-class fallback could
    /// be resolved.
    #[error("no font available for {category} scripts")]
    FontUnavailable {
        /// Category that was requested.
        category: ScriptCategory,
    },

    /// A resolved font file could not be read from disk.
    #[error("font file '{path}' could not be read: {source}")]
    FontRead {
        /// Path of the font file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A resolved font file was read but is not a usable font face.
    #[error("font file '{path}' could not be loaded: {reason}")]
    FontLoad {
        /// Path of the font file.
        path: String,
        /// Why the face was rejected.
        reason: String,
    },
}

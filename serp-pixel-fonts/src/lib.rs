//! Font resolution and text shaping for serp-pixel.
//!
//! This crate provides:
//! - Script segmentation: text split into runs that share one font category
//! - A font catalog resolving one font file per script category, with
//!   platform candidate paths, family-name fallback and an override font
//! - HarfBuzz-based text shaping via rustybuzz, with cached faces and an
//!   LRU cache of shaped runs
//!
//! # Architecture
//!
//! The `FontCatalog` resolves its table once and hands out a
//! `ResolvedFont` per `ScriptCategory`. The `TextShaper` turns a run of
//! text plus a resolved font into a `ShapedRun` whose width is expressed
//! in pixels at the requested size.

pub mod error;
pub mod font_catalog;
pub mod script;
pub mod text_shaper;

// Re-export main types for convenience
pub use error::FontError;
pub use font_catalog::{
    CandidateTable, FontAsset, FontCatalog, FontKey, FontOverride, FontResolver, FontTable,
    Platform, ResolvedFont,
};
pub use script::{ScriptCategory, ScriptRun, ScriptSegment, UnknownCategory, script_runs, segment};
pub use text_shaper::{ShapedRun, ShapingOptions, TextShaper};

//! serp-pixel - SERP title and description pixel-width measurement
//!
//! Measures how wide a meta title or description renders in a search
//! results page, using the same fonts and sizes the page uses, and checks
//! the width against the truncation limit for that field.
//!
//! Text is split into script runs (Latin, Korean, Thai, CJK), each run is
//! shaped with a font covering its script, and the run widths are summed.
//! Fonts are resolved once per process and parsed faces are shared by all
//! measurements.

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod limits;
pub mod measure;
pub mod report;
pub mod sheet;

pub use batch::{BatchRow, BatchRunner, Cell, RowMeasurements, SheetRow};
pub use config::SerpConfig;
pub use error::SerpError;
pub use limits::{FieldKind, LimitEvaluator, Verdict};
pub use measure::{Confidence, FieldMeasurement, SegmentWidth, WidthBreakdown, WidthMeasurer};
pub use report::{BatchSummary, FieldTally};
pub use sheet::{DelimitedSheet, Delimiter, SheetColumns, column_index};

pub use serp_pixel_fonts;

//! Pixel-width measurement of one field.
//!
//! The text is split into script runs, each run is shaped with the font of
//! its category at the field's pixel size, and the run advances are summed.
//! Runs are never re-shaped as one joined string: a single font cannot
//! shape mixed-script text, and browsers measure a fallback chain the same
//! way.

use std::sync::Arc;

use serde::Serialize;
use serp_pixel_fonts::{
    FontAsset, FontCatalog, FontResolver, ScriptCategory, TextShaper, segment,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::SerpError;
use crate::limits::{FieldKind, LimitEvaluator, Verdict};

/// Signals that a width may not match what a browser draws.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Confidence {
    /// Glyphs shaped to the missing-glyph box
    pub missing_glyphs: usize,
    /// Some run was measured with another category's font
    pub font_fallback: bool,
}

impl Confidence {
    pub fn is_low(&self) -> bool {
        self.missing_glyphs > 0 || self.font_fallback
    }
}

/// Width contributed by one script run.
#[derive(Debug, Clone)]
pub struct SegmentWidth {
    /// Byte offset of the run in the measured text
    pub start: usize,
    /// Byte length of the run
    pub len: usize,
    pub category: ScriptCategory,
    /// Font the run was shaped with
    pub font: Arc<FontAsset>,
    /// True when `font` was borrowed from another category
    pub degraded: bool,
    /// Unrounded advance in pixels
    pub width_px: f64,
    pub missing_glyphs: usize,
}

/// Width of a whole field with its per-run breakdown.
#[derive(Debug, Clone, Default)]
pub struct WidthBreakdown {
    /// Total width rounded to whole pixels
    pub width_px: u32,
    /// Sum of the unrounded run widths
    pub raw_width_px: f64,
    pub segments: Vec<SegmentWidth>,
    pub confidence: Confidence,
}

/// Measured width of one field, checked against its limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMeasurement {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub text: String,
    /// User-perceived characters (grapheme clusters)
    pub chars: usize,
    #[serde(rename = "pixels")]
    pub width_px: u32,
    #[serde(rename = "max_pixels")]
    pub limit_px: u32,
    /// Limit minus width; negative when over
    pub remaining_px: i64,
    pub verdict: Verdict,
    pub confidence: Confidence,
}

impl FieldMeasurement {
    /// Build a measurement from an already computed width.
    pub fn new(kind: FieldKind, text: &str, width_px: u32, confidence: Confidence) -> Self {
        let limit_px = kind.limit_px();
        Self {
            kind,
            text: text.to_string(),
            chars: text.graphemes(true).count(),
            width_px,
            limit_px,
            remaining_px: i64::from(limit_px) - i64::from(width_px),
            verdict: LimitEvaluator::evaluate(width_px, kind),
            confidence,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.verdict.is_ok()
    }

    /// Pixels over the limit, zero when within it.
    pub fn over_by(&self) -> u32 {
        self.width_px.saturating_sub(self.limit_px)
    }

    pub fn is_low_confidence(&self) -> bool {
        self.confidence.is_low()
    }
}

/// Measures field widths with one font source and one shaper.
///
/// Both the resolved fonts and the shaper caches live as long as the
/// measurer, so one measurer should serve a whole run.
pub struct WidthMeasurer<R = FontCatalog> {
    fonts: R,
    shaper: TextShaper,
}

impl<R: FontResolver> WidthMeasurer<R> {
    pub fn new(fonts: R) -> Self {
        Self::with_shaper(fonts, TextShaper::new())
    }

    pub fn with_shaper(fonts: R, shaper: TextShaper) -> Self {
        Self { fonts, shaper }
    }

    pub fn fonts(&self) -> &R {
        &self.fonts
    }

    pub fn shaper(&self) -> &TextShaper {
        &self.shaper
    }

    /// Width of `text` rendered as `kind`, with its run breakdown.
    ///
    /// # Errors
    /// `Font` when a run has no usable font, or its font cannot be loaded.
    pub fn measure_width(
        &mut self,
        text: &str,
        kind: FieldKind,
    ) -> Result<WidthBreakdown, SerpError> {
        let pixel_size = kind.pixel_size();
        let mut breakdown = WidthBreakdown::default();

        for seg in segment(text) {
            let font = self.fonts.font_for(seg.category)?;
            let run = self.shaper.shape(seg.text(text), &font.asset, pixel_size)?;

            breakdown.raw_width_px += run.width_px;
            breakdown.confidence.missing_glyphs += run.missing_glyphs;
            breakdown.confidence.font_fallback |= font.degraded;
            breakdown.segments.push(SegmentWidth {
                start: seg.start,
                len: seg.len,
                category: seg.category,
                font: font.asset,
                degraded: font.degraded,
                width_px: run.width_px,
                missing_glyphs: run.missing_glyphs,
            });
        }

        breakdown.width_px = breakdown.raw_width_px.round() as u32;
        Ok(breakdown)
    }

    /// Measure `text` as `kind` and check it against the field's limit.
    pub fn measure(&mut self, text: &str, kind: FieldKind) -> Result<FieldMeasurement, SerpError> {
        let breakdown = self.measure_width(text, kind)?;
        if breakdown.confidence.is_low() {
            log::debug!(
                "Low-confidence {} measurement ({} missing glyphs, fallback font: {})",
                kind,
                breakdown.confidence.missing_glyphs,
                breakdown.confidence.font_fallback
            );
        }
        Ok(FieldMeasurement::new(
            kind,
            text,
            breakdown.width_px,
            breakdown.confidence,
        ))
    }

    pub fn check_title(&mut self, text: &str) -> Result<FieldMeasurement, SerpError> {
        self.measure(text, FieldKind::Title)
    }

    pub fn check_description(&mut self, text: &str) -> Result<FieldMeasurement, SerpError> {
        self.measure(text, FieldKind::Description)
    }
}

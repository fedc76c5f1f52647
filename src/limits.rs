//! Field kinds, their fixed sizes and pixel limits, and the pass/fail rule.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SerpError;

/// Font size titles are rendered at, in pixels.
pub const TITLE_FONT_PX: f32 = 20.0;
/// Font size descriptions are rendered at, in pixels.
pub const DESCRIPTION_FONT_PX: f32 = 14.0;
/// Widest title that is shown untruncated.
pub const TITLE_LIMIT_PX: u32 = 580;
/// Widest description that is shown untruncated.
pub const DESCRIPTION_LIMIT_PX: u32 = 990;

/// Which piece of SERP metadata is being measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Title,
    Description,
}

impl FieldKind {
    /// Pixel size the field is rendered at.
    pub fn pixel_size(self) -> f32 {
        match self {
            FieldKind::Title => TITLE_FONT_PX,
            FieldKind::Description => DESCRIPTION_FONT_PX,
        }
    }

    /// Pixel budget for the field.
    pub fn limit_px(self) -> u32 {
        match self {
            FieldKind::Title => TITLE_LIMIT_PX,
            FieldKind::Description => DESCRIPTION_LIMIT_PX,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Title => "title",
            FieldKind::Description => "description",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = SerpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(FieldKind::Title),
            "description" | "desc" => Ok(FieldKind::Description),
            _ => Err(SerpError::InvalidFieldKind(s.to_string())),
        }
    }
}

/// Outcome of comparing a width to its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "OVER")]
    Over,
}

impl Verdict {
    /// Whether the field fits its limit.
    pub fn is_ok(self) -> bool {
        self == Verdict::Ok
    }

    /// Uppercase label, as printed in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Over => "OVER",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass/fail rule: a width is OK when it is at most the field's limit.
pub struct LimitEvaluator;

impl LimitEvaluator {
    /// Verdict for a width of `width_px` rendered as `kind`.
    pub fn evaluate(width_px: u32, kind: FieldKind) -> Verdict {
        if width_px <= kind.limit_px() {
            Verdict::Ok
        } else {
            Verdict::Over
        }
    }

    /// Same as `evaluate`, for a field named by string.
    ///
    /// # Errors
    /// `InvalidFieldKind` when `kind` is neither title nor description.
    pub fn evaluate_named(width_px: u32, kind: &str) -> Result<Verdict, SerpError> {
        Ok(Self::evaluate(width_px, kind.parse()?))
    }
}

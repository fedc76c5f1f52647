//! Batch tallies and plain-text result formatting.

use serde::Serialize;

use crate::batch::BatchRow;
use crate::limits::FieldKind;
use crate::measure::FieldMeasurement;

/// Longest text shown in a summary table row before it is cut.
const PREVIEW_CHARS: usize = 70;

/// A field that went over its limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverRow {
    pub row: usize,
    pub pixels: u32,
    pub over_by: u32,
    pub chars: usize,
    pub text: String,
}

/// A row that could not be measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRow {
    pub row: usize,
    pub error: String,
}

/// Per-field counts over a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTally {
    pub total: usize,
    pub ok: usize,
    pub over: usize,
    pub max_px: u32,
    pub over_rows: Vec<OverRow>,
}

impl FieldTally {
    fn new(kind: FieldKind) -> Self {
        Self {
            total: 0,
            ok: 0,
            over: 0,
            max_px: kind.limit_px(),
            over_rows: Vec::new(),
        }
    }

    fn record(&mut self, row: usize, m: &FieldMeasurement) {
        self.total += 1;
        if m.is_ok() {
            self.ok += 1;
        } else {
            self.over += 1;
            self.over_rows.push(OverRow {
                row,
                pixels: m.width_px,
                over_by: m.over_by(),
                chars: m.chars,
                text: m.text.clone(),
            });
        }
    }
}

/// Running summary of a batch, fed one row at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub title: FieldTally,
    pub description: FieldTally,
    pub failed_rows: Vec<FailedRow>,
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchSummary {
    pub fn new() -> Self {
        Self {
            title: FieldTally::new(FieldKind::Title),
            description: FieldTally::new(FieldKind::Description),
            failed_rows: Vec::new(),
        }
    }

    pub fn record(&mut self, row: &BatchRow) {
        match &row.outcome {
            Ok(measurements) => {
                if let Some(m) = &measurements.title {
                    self.title.record(row.index, m);
                }
                if let Some(m) = &measurements.description {
                    self.description.record(row.index, m);
                }
            }
            Err(err) => self.failed_rows.push(FailedRow {
                row: row.index,
                error: err.to_string(),
            }),
        }
    }

    pub fn tally(&self, kind: FieldKind) -> &FieldTally {
        match kind {
            FieldKind::Title => &self.title,
            FieldKind::Description => &self.description,
        }
    }
}

/// One measurement as two lines:
/// `[OK] TITLE: 381px / 580px (+199px) | 40 chars` and the indented text.
pub fn format_measurement(m: &FieldMeasurement) -> String {
    let mut out = format!(
        "[{}] {}: {}px / {}px ({:+}px) | {} chars",
        m.verdict,
        m.kind.name().to_uppercase(),
        m.width_px,
        m.limit_px,
        m.remaining_px,
        m.chars
    );
    if m.is_low_confidence() {
        out.push_str(" | low confidence");
    }
    out.push_str("\n       ");
    out.push_str(&m.text);
    out
}

/// Summary table for the fields that were checked.
pub fn format_summary(summary: &BatchSummary, fields: &[FieldKind]) -> String {
    let mut out = String::new();
    for kind in fields {
        let tally = summary.tally(*kind);
        let heading = match kind {
            FieldKind::Title => "TITLES",
            FieldKind::Description => "DESCRIPTIONS",
        };
        out.push_str(&format!(
            "{heading}: {}/{} OK | {} over {}px limit\n",
            tally.ok, tally.total, tally.over, tally.max_px
        ));
        if !tally.over_rows.is_empty() {
            out.push_str(&format!("  {:<6} {:<10} {:<10} Text\n", "Row", "Pixels", "Over by"));
            out.push_str(&format!("  {:<6} {:<10} {:<10} ----\n", "---", "------", "-------"));
            for r in &tally.over_rows {
                let over = format!("+{}px", r.over_by);
                out.push_str(&format!(
                    "  {:<6} {:<10} {:<10} {}\n",
                    r.row,
                    r.pixels,
                    over,
                    preview(&r.text)
                ));
            }
        }
        out.push('\n');
    }

    if !summary.failed_rows.is_empty() {
        out.push_str(&format!("FAILED ROWS: {}\n", summary.failed_rows.len()));
        for failed in &summary.failed_rows {
            out.push_str(&format!("  {:<6} {}\n", failed.row, failed.error));
        }
    }
    out
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

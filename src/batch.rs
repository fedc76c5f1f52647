//! Row-by-row checks over tabular input.
//!
//! Rows are measured strictly in input order and emitted lazily. A row that
//! cannot be read or measured carries its error in `BatchRow::outcome`; the
//! rows after it are still processed.

use serp_pixel_fonts::{FontCatalog, FontResolver};

use crate::error::SerpError;
use crate::limits::FieldKind;
use crate::measure::{FieldMeasurement, WidthMeasurer};

/// One spreadsheet cell as handed over by the sheet reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// No value (missing column or blank cell)
    Empty,
    /// Cell text, as read
    Text(String),
    /// The cell exists but its value could not be read as text
    Unreadable(String),
}

impl Cell {
    /// Cell from an optional raw value.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(text) => Cell::Text(text.to_string()),
            None => Cell::Empty,
        }
    }

    /// Trimmed text to measure, `None` for empty or blank cells.
    ///
    /// # Errors
    /// `RowRead` for unreadable cells.
    pub fn text(&self, row: usize) -> Result<Option<&str>, SerpError> {
        match self {
            Cell::Empty => Ok(None),
            Cell::Text(text) => {
                let trimmed = text.trim();
                Ok((!trimmed.is_empty()).then_some(trimmed))
            }
            Cell::Unreadable(reason) => Err(SerpError::RowRead {
                row,
                reason: reason.clone(),
            }),
        }
    }
}

/// Input row: spreadsheet row number plus the two metadata cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub index: usize,
    pub title: Cell,
    pub description: Cell,
}

impl SheetRow {
    pub fn new(index: usize, title: Cell, description: Cell) -> Self {
        Self {
            index,
            title,
            description,
        }
    }
}

/// Measurements for the fields present in a row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowMeasurements {
    pub title: Option<FieldMeasurement>,
    pub description: Option<FieldMeasurement>,
}

impl RowMeasurements {
    /// Present measurements, title first.
    pub fn iter(&self) -> impl Iterator<Item = &FieldMeasurement> {
        self.title.iter().chain(self.description.iter())
    }
}

/// Output row, in the same order as the input rows.
#[derive(Debug)]
pub struct BatchRow {
    pub index: usize,
    pub outcome: Result<RowMeasurements, SerpError>,
}

impl BatchRow {
    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Applies a `WidthMeasurer` to every row of a sheet.
pub struct BatchRunner<R = FontCatalog> {
    measurer: WidthMeasurer<R>,
}

impl<R: FontResolver> BatchRunner<R> {
    pub fn new(measurer: WidthMeasurer<R>) -> Self {
        Self { measurer }
    }

    /// Give back the measurer, with its warm caches.
    pub fn into_measurer(self) -> WidthMeasurer<R> {
        self.measurer
    }

    /// Lazily measure `rows`, yielding one `BatchRow` per input row.
    pub fn run<I>(&mut self, rows: I) -> impl Iterator<Item = BatchRow>
    where
        I: IntoIterator<Item = SheetRow>,
    {
        rows.into_iter().map(move |row| self.measure_row(row))
    }

    /// Measure one row, capturing any failure on the row.
    pub fn measure_row(&mut self, row: SheetRow) -> BatchRow {
        let outcome = self.measure_cells(&row);
        if let Err(err) = &outcome {
            log::warn!("Row {} skipped: {}", row.index, err);
        }
        BatchRow {
            index: row.index,
            outcome,
        }
    }

    fn measure_cells(&mut self, row: &SheetRow) -> Result<RowMeasurements, SerpError> {
        // Read both cells first so an unreadable cell fails the row as a whole
        let title = row.title.text(row.index)?;
        let description = row.description.text(row.index)?;

        Ok(RowMeasurements {
            title: title
                .map(|text| self.measurer.measure(text, FieldKind::Title))
                .transpose()?,
            description: description
                .map(|text| self.measurer.measure(text, FieldKind::Description))
                .transpose()?,
        })
    }
}

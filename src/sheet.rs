//! Delimited-text sheet reader feeding the batch runner.
//!
//! Reads a tab- or comma-separated export of a spreadsheet one record at
//! a time. A quoted cell may span several lines, so records rather than
//! physical lines are counted: record numbers are spreadsheet row numbers
//! and output rows can be matched back to the original sheet.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::batch::{Cell, SheetRow};
use crate::error::SerpError;

/// Convert a spreadsheet column reference (A, B, ..., Z, AA, ...) to a
/// zero-based index.
///
/// # Errors
/// `InvalidColumn` for anything but ASCII letters.
pub fn column_index(letters: &str) -> Result<usize, SerpError> {
    let letters = letters.trim();
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(SerpError::InvalidColumn(letters.to_string()));
    }
    let mut index: usize = 0;
    for c in letters.to_ascii_uppercase().bytes() {
        index = index
            .checked_mul(26)
            .and_then(|i| i.checked_add(usize::from(c - b'A' + 1)))
            .ok_or_else(|| SerpError::InvalidColumn(letters.to_string()))?;
    }
    Ok(index - 1)
}

/// Field separator of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
}

impl Delimiter {
    fn as_char(self) -> char {
        match self {
            Delimiter::Tab => '\t',
            Delimiter::Comma => ',',
        }
    }
}

/// Which columns hold the title and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetColumns {
    pub title: Option<usize>,
    pub description: Option<usize>,
}

impl SheetColumns {
    /// Columns from optional letter references.
    pub fn from_letters(title: Option<&str>, description: Option<&str>) -> Result<Self, SerpError> {
        Ok(Self {
            title: title.map(column_index).transpose()?,
            description: description.map(column_index).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Lazy row iterator over a delimited export.
pub struct DelimitedSheet<B> {
    lines: std::io::Split<B>,
    /// Physical lines consumed so far
    line_no: usize,
    /// Records (spreadsheet rows) consumed so far
    row_no: usize,
    start_row: usize,
    columns: SheetColumns,
    delimiter: Delimiter,
    done: bool,
}

impl DelimitedSheet<BufReader<File>> {
    /// Open `path`. Rows before the 1-based `start_row` are skipped.
    pub fn open(
        path: &Path,
        delimiter: Delimiter,
        columns: SheetColumns,
        start_row: usize,
    ) -> Result<Self, SerpError> {
        let file = File::open(path).map_err(|source| SerpError::Sheet {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_reader(
            BufReader::new(file),
            delimiter,
            columns,
            start_row,
        ))
    }
}

impl<B: BufRead> DelimitedSheet<B> {
    pub fn from_reader(
        reader: B,
        delimiter: Delimiter,
        columns: SheetColumns,
        start_row: usize,
    ) -> Self {
        Self {
            lines: reader.split(b'\n'),
            line_no: 0,
            row_no: 0,
            start_row: start_row.max(1),
            columns,
            delimiter,
            done: false,
        }
    }

    /// Read one record, joining physical lines while a quoted cell is open.
    fn read_record(&mut self) -> Option<std::io::Result<Vec<u8>>> {
        let mut record = Vec::new();
        let mut quotes = QuoteScan::new();
        loop {
            let mut line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) => return Some(Err(err)),
                None if quotes.started => {
                    log::warn!(
                        "Quoted cell in row {} is never closed; reading to end of sheet",
                        self.row_no + 1
                    );
                    return Some(Ok(record));
                }
                None => return None,
            };
            self.line_no += 1;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if quotes.started {
                record.push(b'\n');
            }
            quotes.scan(&line, self.delimiter.as_char() as u8);
            record.extend_from_slice(&line);
            if !quotes.in_quotes {
                return Some(Ok(record));
            }
        }
    }

    fn row_from_record(&self, bytes: Vec<u8>) -> SheetRow {
        match String::from_utf8(bytes) {
            Ok(record) => {
                let fields = split_fields(&record, self.delimiter.as_char());
                let cell = |col: Option<usize>| {
                    Cell::from_value(col.and_then(|c| fields.get(c)).map(String::as_str))
                };
                SheetRow::new(
                    self.row_no,
                    cell(self.columns.title),
                    cell(self.columns.description),
                )
            }
            Err(_) => self.unreadable_row("cell is not valid UTF-8 text"),
        }
    }

    fn unreadable_row(&self, reason: &str) -> SheetRow {
        let cell = |col: Option<usize>| match col {
            Some(_) => Cell::Unreadable(reason.to_string()),
            None => Cell::Empty,
        };
        SheetRow::new(
            self.row_no,
            cell(self.columns.title),
            cell(self.columns.description),
        )
    }
}

impl<B: BufRead> Iterator for DelimitedSheet<B> {
    type Item = SheetRow;

    fn next(&mut self) -> Option<SheetRow> {
        while !self.done {
            let record = self.read_record()?;
            self.row_no += 1;
            if self.row_no < self.start_row {
                continue;
            }
            return Some(match record {
                Ok(bytes) => self.row_from_record(bytes),
                Err(err) => {
                    // A failed read cannot be resumed reliably
                    log::warn!(
                        "Sheet read failed at row {} (line {}): {}",
                        self.row_no,
                        self.line_no + 1,
                        err
                    );
                    self.done = true;
                    self.unreadable_row(&format!("read failed: {err}"))
                }
            });
        }
        None
    }
}

/// Quote state of a record being read line by line. Follows the same
/// rules as `split_fields`.
struct QuoteScan {
    in_quotes: bool,
    field_empty: bool,
    /// At least one line has been scanned
    started: bool,
}

impl QuoteScan {
    fn new() -> Self {
        Self {
            in_quotes: false,
            field_empty: true,
            started: false,
        }
    }

    fn scan(&mut self, line: &[u8], delimiter: u8) {
        if self.started {
            // The joining newline is cell text
            self.field_empty = false;
        }
        self.started = true;

        let mut bytes = line.iter().peekable();
        while let Some(&b) = bytes.next() {
            match b {
                b'"' if self.in_quotes => {
                    if bytes.peek() == Some(&&b'"') {
                        bytes.next();
                        self.field_empty = false;
                    } else {
                        self.in_quotes = false;
                    }
                }
                b'"' if self.field_empty => self.in_quotes = true,
                b if b == delimiter && !self.in_quotes => self.field_empty = true,
                _ => self.field_empty = false,
            }
        }
    }
}

/// Split one line on `delimiter`, honouring double-quoted fields with `""`
/// escapes.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            c if c == delimiter && !in_quotes => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

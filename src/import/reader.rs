//! Streaming CSV reader producing one [`RowContext`] per data row.

use std::io::Read;

use thiserror::Error;

use crate::error::{RelimportError, Result};

/// Column holding the row's culture.
pub const CULTURE_COLUMN: &str = "culture";

/// Columns a relation import file must declare.
pub const REQUIRED_COLUMNS: [&str; 3] = [
    "sourceAuthorizedFormOfName",
    "targetAuthorizedFormOfName",
    "category",
];

/// Columns copied onto the relation only when non-empty.
pub const OPTIONAL_COLUMNS: [&str; 4] = ["description", "date", "startDate", "endDate"];

/// Values of one data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowContext {
    /// 1-based line number in the input file.
    pub line: u64,
    pub culture: String,
    pub source_name: String,
    pub target_name: String,
    pub category: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A row that could not be read.
#[derive(Debug, Error)]
pub enum RowError {
    /// The row is unusable (wrong field count, invalid UTF-8); later rows can still be read.
    #[error("line {line}: {message}")]
    Malformed { line: u64, message: String },

    /// The underlying stream failed; nothing more can be read.
    #[error("input stream failed: {0}")]
    Stream(csv::Error),
}

#[derive(Debug, Default)]
struct ColumnMap {
    culture: Option<usize>,
    source: usize,
    target: usize,
    category: usize,
    description: Option<usize>,
    date: Option<usize>,
    start_date: Option<usize>,
    end_date: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| position(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(RelimportError::InvalidInput(format!(
                "CSV is missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let required = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            culture: position(CULTURE_COLUMN),
            source: required(REQUIRED_COLUMNS[0]),
            target: required(REQUIRED_COLUMNS[1]),
            category: required(REQUIRED_COLUMNS[2]),
            description: position(OPTIONAL_COLUMNS[0]),
            date: position(OPTIONAL_COLUMNS[1]),
            start_date: position(OPTIONAL_COLUMNS[2]),
            end_date: position(OPTIONAL_COLUMNS[3]),
        })
    }
}

/// Forward-only reader over a relation CSV.
///
/// The first row is the header; unrecognised columns are ignored. Each call
/// to `next` yields either a row or a [`RowError`]; a malformed row does not
/// end the stream, a stream failure does.
pub struct CsvRowReader<R: Read> {
    reader: csv::Reader<R>,
    columns: ColumnMap,
    default_culture: String,
    record: csv::StringRecord,
    rows_read: u64,
    finished: bool,
}

impl<R: Read> CsvRowReader<R> {
    /// Read the header and prepare to stream rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be read or a required column is missing.
    pub fn new(reader: R, default_culture: &str) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnMap::from_headers(&headers)?;

        Ok(Self {
            reader: csv_reader,
            columns,
            default_culture: default_culture.to_string(),
            record: csv::StringRecord::new(),
            rows_read: 0,
            finished: false,
        })
    }

    /// Number of data rows consumed so far, including malformed ones.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    fn build_row(&self, line: u64) -> RowContext {
        let record = &self.record;
        let text = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        let optional = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let culture = optional(self.columns.culture).unwrap_or_else(|| self.default_culture.clone());

        RowContext {
            line,
            culture,
            source_name: text(self.columns.source),
            target_name: text(self.columns.target),
            category: text(self.columns.category),
            description: optional(self.columns.description),
            date: optional(self.columns.date),
            start_date: optional(self.columns.start_date),
            end_date: optional(self.columns.end_date),
        }
    }
}

impl<R: Read> Iterator for CsvRowReader<R> {
    type Item = std::result::Result<RowContext, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        // Header is line 1, so the nth data row is line n + 1 absent multi-line fields.
        let fallback_line = self.rows_read + 2;
        match self.reader.read_record(&mut self.record) {
            Ok(false) => {
                self.finished = true;
                None
            }
            Ok(true) => {
                self.rows_read += 1;
                let line = self
                    .record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(fallback_line);
                Some(Ok(self.build_row(line)))
            }
            Err(e) => {
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    self.finished = true;
                    return Some(Err(RowError::Stream(e)));
                }
                self.rows_read += 1;
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                Some(Err(RowError::Malformed {
                    line,
                    message: e.to_string(),
                }))
            }
        }
    }
}

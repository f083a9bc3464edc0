#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Header-preserving CSV table I/O.
//!
//! The enrichment tools read a CSV, rewrite or append a few named columns
//! row by row, and write it back with every other column untouched and in
//! its original order. [`Dataset`] keeps the whole file in memory as plain
//! strings; the files involved are a few hundred rows.

pub mod columns;

use std::io::{Read, Write};
use std::path::Path;

pub use columns::Columns;

/// Errors from reading or writing a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column the operation requires is not present.
    #[error("Missing column: {0}")]
    MissingColumn(String),
}

/// An in-memory CSV table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Creates a dataset with the given headers and no rows.
    #[must_use]
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Reads a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file cannot be opened or parsed.
    pub fn read_path(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file)?;
        log::debug!(
            "Read {} rows x {} columns from {}",
            dataset.len(),
            dataset.headers.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parses CSV from any reader. Rows shorter than the header are padded
    /// with empty cells; longer rows keep their extra cells.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Csv`] if the input is not valid CSV.
    pub fn from_reader(reader: impl Read) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;
            let mut row: Vec<String> = record.iter().map(str::to_owned).collect();
            if row.len() < headers.len() {
                row.resize(headers.len(), String::new());
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Writes the dataset to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file cannot be created or written.
    pub fn write_path(&self, path: &Path) -> Result<(), DatasetError> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)?;
        log::debug!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }

    /// Serializes the dataset (header row first) to any writer.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Csv`] if serialization or flushing fails.
    pub fn write_to(&self, writer: impl Write) -> Result<(), DatasetError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Returns the column headers in file order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row, padding it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        if row.len() < self.headers.len() {
            row.resize(self.headers.len(), String::new());
        }
        self.rows.push(row);
    }

    /// Returns the index of the named column, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Returns `true` if the named column is present.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns the index of the named column or [`DatasetError::MissingColumn`].
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingColumn`] if the column is absent.
    pub fn require_column(&self, name: &str) -> Result<usize, DatasetError> {
        self.column_index(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_owned()))
    }

    /// Appends the named column (with empty cells) if it is not already
    /// present, and returns its index.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.headers.push(name.to_owned());
        let idx = self.headers.len() - 1;
        for row in &mut self.rows {
            if row.len() <= idx {
                row.resize(idx + 1, String::new());
            }
        }
        log::debug!("Added column '{name}'");
        idx
    }

    /// Returns the cell at (`row`, `column`). Missing rows, columns, or
    /// cells read as the empty string.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> &str {
        self.column_index(column)
            .and_then(|idx| self.rows.get(row)?.get(idx))
            .map_or("", String::as_str)
    }

    /// Sets the cell at (`row`, `column`). Returns `false` (and does
    /// nothing) if the row or column does not exist.
    pub fn set(&mut self, row: usize, column: &str, value: impl Into<String>) -> bool {
        let Some(idx) = self.column_index(column) else {
            return false;
        };
        let Some(cells) = self.rows.get_mut(row) else {
            return false;
        };
        if cells.len() <= idx {
            cells.resize(idx + 1, String::new());
        }
        cells[idx] = value.into();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Full_Address,Redfin_URL,Notes
\"123 Main St, Springfield, OR\",https://www.redfin.com/x/123-main-st,corner lot
\"9 Elm Ave, Salem, OR\",,
";

    fn sample() -> Dataset {
        Dataset::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn reads_headers_and_rows() {
        let ds = sample();
        assert_eq!(ds.headers(), ["Full_Address", "Redfin_URL", "Notes"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(0, "Full_Address"), "123 Main St, Springfield, OR");
        assert_eq!(ds.get(1, "Redfin_URL"), "");
    }

    #[test]
    fn missing_cells_read_as_empty() {
        let ds = sample();
        assert_eq!(ds.get(0, "Nope"), "");
        assert_eq!(ds.get(99, "Notes"), "");
    }

    #[test]
    fn pads_short_rows() {
        let ds = Dataset::from_reader("a,b,c\n1\n".as_bytes()).unwrap();
        assert_eq!(ds.get(0, "a"), "1");
        assert_eq!(ds.get(0, "c"), "");
    }

    #[test]
    fn set_ignores_unknown_column() {
        let mut ds = sample();
        assert!(!ds.set(0, "Redfin_Image", "x"));
        assert!(ds.set(0, "Notes", "updated"));
        assert_eq!(ds.get(0, "Notes"), "updated");
    }

    #[test]
    fn ensure_column_appends_once() {
        let mut ds = sample();
        let idx = ds.ensure_column("Street_Image_URL");
        assert_eq!(idx, 3);
        assert_eq!(ds.ensure_column("Street_Image_URL"), 3);
        assert_eq!(ds.ensure_column("Notes"), 2);
        assert_eq!(ds.headers().len(), 4);
        assert_eq!(ds.get(1, "Street_Image_URL"), "");
    }

    #[test]
    fn require_column_reports_name() {
        let err = sample().require_column("Latitude").unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(name) if name == "Latitude"));
    }

    #[test]
    fn writes_in_header_order_with_quoting() {
        let mut ds = sample();
        ds.set(0, "Redfin_URL", "");
        let mut out = Vec::new();
        ds.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Full_Address,Redfin_URL,Notes\n\
             \"123 Main St, Springfield, OR\",,corner lot\n\
             \"9 Elm Ave, Salem, OR\",,\n"
        );
    }

    #[test]
    fn push_row_pads_to_width() {
        let mut ds = Dataset::new(vec!["a".into(), "b".into()]);
        ds.push_row(vec!["1".into()]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.get(0, "b"), "");
    }
}

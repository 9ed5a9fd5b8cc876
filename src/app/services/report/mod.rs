//! Report table handling
//!
//! A report is a CSV table edited by hand in a spreadsheet, so nothing about
//! it can be trusted: the delimiter varies between semicolon and comma,
//! headers carry inconsistent spelling, and rows may be shorter than the
//! header. This module loads such a table into a uniform in-memory grid,
//! locates columns tolerantly, and writes results back atomically.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::Result;

pub mod schema;
pub mod writer;

pub use schema::{ReportSchema, find_column, open_csv_reader, sniff_delimiter};

/// An in-memory report table with every row padded to the header width
#[derive(Debug, Clone)]
pub struct Report {
    source: PathBuf,
    delimiter: u8,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Report {
    /// Load a report, sniffing the delimiter from the header line
    pub fn load(path: &Path) -> Result<Self> {
        let path_str = path.display().to_string();
        let (mut reader, delimiter) = open_csv_reader(path)?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| crate::Error::csv(&path_str, "cannot read header row", Some(e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let width = headers.len();
        let mut rows = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| crate::Error::csv(&path_str, "cannot read row", Some(e)))?;
            let mut cells: Vec<String> = row.iter().map(str::to_string).collect();
            cells.resize(width.max(cells.len()), String::new());
            rows.push(cells);
        }

        info!(file = %path_str, rows = rows.len(), columns = width, "loaded report");

        Ok(Self {
            source: path.to_path_buf(),
            delimiter,
            headers,
            rows,
        })
    }

    /// Path the report was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Delimiter detected at load time
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell value, empty for anything out of range
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Overwrite a cell, ignoring out-of-range coordinates
    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = value.into();
        }
    }

    /// Index of an existing column with this exact (trimmed) header, or a new
    /// column appended at the end with every row padded
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.headers.iter().position(|h| h.trim() == name) {
            return index;
        }

        self.headers.push(name.to_string());
        let width = self.headers.len();
        for row in &mut self.rows {
            // pad short rows only; rows wider than the header keep their cells
            while row.len() < width {
                row.push(String::new());
            }
        }
        width - 1
    }

    /// Write the table back to its source path
    pub fn save(&self) -> Result<()> {
        self.save_as(&self.source)
    }

    /// Write the table to an arbitrary path, keeping the loaded delimiter
    pub fn save_as(&self, path: &Path) -> Result<()> {
        writer::write_table(path, self.delimiter, &self.headers, &self.rows)
    }
}

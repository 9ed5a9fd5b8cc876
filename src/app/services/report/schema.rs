//! Delimiter sniffing and tolerant column location
//!
//! Spreadsheet exports disagree on almost everything, so column lookup goes
//! through alias lists compared on a whitespace-free lower-cased key, and the
//! delimiter is decided by counting candidates in the header line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::app::models::Address;
use crate::app::services::normalizer::match_key;
use crate::app::services::numeric::{parse_decimal, trim_after_semicolon};
use crate::constants::column_aliases;
use crate::{Error, Result};

use super::Report;

/// Decide between semicolon and comma by counting occurrences in the header
/// line. Ties (including none of either) go to the semicolon, the common
/// convention for locales with a decimal comma.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if commas > semicolons { b',' } else { b';' }
}

/// Open a CSV file with a sniffed delimiter and flexible row widths.
///
/// Returns the reader together with the delimiter so it can be reused when
/// writing results back.
pub fn open_csv_reader(path: &Path) -> Result<(csv::Reader<File>, u8)> {
    let path_str = path.display().to_string();

    let file = File::open(path).map_err(|e| Error::io(format!("cannot open {path_str}"), e))?;
    let mut first_line = String::new();
    BufReader::new(file).read_line(&mut first_line)?;
    let delimiter = sniff_delimiter(first_line.trim_start_matches('\u{feff}'));

    let reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::csv(&path_str, "cannot open file", Some(e)))?;

    Ok((reader, delimiter))
}

/// Find the first header matching any of the aliases, tried in alias order.
///
/// Comparison ignores case and all whitespace, so "Nr KW" matches "nr_kw"
/// only via an explicit alias, but " Powiat " matches "powiat" directly.
/// When no header matches exactly, a second pass accepts a header that
/// contains an alias, so "Obszar działki" still counts as the area column.
pub fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    let keys: Vec<String> = headers.iter().map(|h| match_key(h)).collect();
    for alias in aliases {
        let wanted = match_key(alias);
        if let Some(index) = keys.iter().position(|key| *key == wanted) {
            return Some(index);
        }
    }
    for alias in aliases {
        let wanted = match_key(alias);
        if wanted.is_empty() {
            continue;
        }
        if let Some(index) = keys.iter().position(|key| key.contains(&wanted)) {
            return Some(index);
        }
    }
    None
}

/// Column indices of the report fields the pipeline reads, detected once per
/// file. Absent columns are simply treated as holding no values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportSchema {
    pub kw: Option<usize>,
    pub province: Option<usize>,
    pub county: Option<usize>,
    pub municipality: Option<usize>,
    pub city: Option<usize>,
    pub district: Option<usize>,
    pub street: Option<usize>,
    pub area: Option<usize>,
}

impl ReportSchema {
    /// Detect report columns from a header row
    pub fn detect(headers: &[String]) -> Self {
        Self {
            kw: find_column(headers, column_aliases::KW),
            province: find_column(headers, column_aliases::PROVINCE),
            county: find_column(headers, column_aliases::COUNTY),
            municipality: find_column(headers, column_aliases::MUNICIPALITY),
            city: find_column(headers, column_aliases::CITY),
            district: find_column(headers, column_aliases::DISTRICT),
            street: find_column(headers, column_aliases::STREET),
            area: find_column(headers, column_aliases::AREA),
        }
    }

    /// Area column index, required for valuation
    pub fn require_area(&self, file: &str) -> Result<usize> {
        self.area.ok_or_else(|| Error::missing_column(file, "obszar"))
    }

    /// Column index of an address level, when the report has that column
    pub fn index_of(&self, level: crate::app::models::AddressLevel) -> Option<usize> {
        use crate::app::models::AddressLevel::*;
        match level {
            Province => self.province,
            County => self.county,
            Municipality => self.municipality,
            City => self.city,
            District => self.district,
            Street => self.street,
        }
    }

    /// Assemble the address of one report row. Missing columns and sentinel
    /// cells come through as absent levels.
    pub fn address_of(&self, report: &Report, row: usize) -> Address {
        let cell = |index: Option<usize>| index.map(|i| report.cell(row, i)).unwrap_or("");
        Address::from_raw(
            cell(self.province),
            cell(self.county),
            cell(self.municipality),
            cell(self.city),
            cell(self.district),
            cell(self.street),
        )
    }

    /// Parse the area of one report row, ignoring any note after a semicolon
    pub fn area_of(&self, report: &Report, row: usize) -> Option<f64> {
        self.area
            .and_then(|i| parse_decimal(trim_after_semicolon(report.cell(row, i))))
    }
}

//! Gazetteer CSV loading
//!
//! Gazetteer files are semicolon- or comma-delimited CSV with a header row
//! naming the five administrative columns. Headers are matched tolerantly
//! (case, whitespace, with or without Polish diacritics); rows shorter than
//! the header are padded with empty fields rather than rejected.

use std::path::Path;

use tracing::{info, warn};

use crate::app::services::report::schema::{find_column, open_csv_reader};
use crate::constants::column_aliases;
use crate::{Error, Result};

use super::{Gazetteer, GeoRecord};

/// Alias sets for the five gazetteer columns, in hierarchy order
const REQUIRED_COLUMNS: [(&str, &[&str]); 5] = [
    ("Wojewodztwo", column_aliases::PROVINCE),
    ("Powiat", column_aliases::COUNTY),
    ("Gmina", column_aliases::MUNICIPALITY),
    ("Miejscowosc", column_aliases::CITY),
    ("Dzielnica", column_aliases::DISTRICT),
];

/// Load a gazetteer from a CSV file.
///
/// Fails with [`Error::FileNotFound`] when the file does not exist and
/// [`Error::MissingColumn`] when a required administrative column cannot be
/// located in the header row.
pub fn load_gazetteer(path: &Path) -> Result<Gazetteer> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }

    let path_str = path.display().to_string();
    let (mut reader, _) = open_csv_reader(path)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::csv(&path_str, "cannot read header row", Some(e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut indices = [0usize; 5];
    for (slot, (canonical, aliases)) in REQUIRED_COLUMNS.iter().enumerate() {
        indices[slot] = find_column(&headers, aliases)
            .ok_or_else(|| Error::missing_column(&path_str, *canonical))?;
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row_number, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(
                    file = %path_str,
                    row = row_number + 2,
                    error = %e,
                    "skipping unreadable gazetteer row"
                );
                skipped += 1;
                continue;
            }
        };

        let cell = |slot: usize| row.get(indices[slot]).unwrap_or("");
        let record = GeoRecord::new(cell(0), cell(1), cell(2), cell(3), cell(4));

        // A row with no place information at all contributes nothing
        if record.province.is_empty()
            && record.county.is_empty()
            && record.municipality.is_empty()
            && record.city.is_empty()
            && record.district.is_empty()
        {
            skipped += 1;
            continue;
        }

        records.push(record);
    }

    info!(
        file = %path_str,
        records = records.len(),
        skipped,
        "loaded gazetteer"
    );

    Ok(Gazetteer::new(records, path_str))
}

/// Load an optional secondary gazetteer.
///
/// A missing file is not an error: the resolver simply runs without a
/// fallback source. Malformed content still fails.
pub fn load_optional_gazetteer(path: &Path) -> Result<Option<Gazetteer>> {
    if !path.exists() {
        info!(
            file = %path.display(),
            "secondary gazetteer not present, resolving without fallback"
        );
        return Ok(None);
    }
    load_gazetteer(path).map(Some)
}

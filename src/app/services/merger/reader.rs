//! Region file reading and row repair
//!
//! Region files come straight from the scraper and are occasionally
//! malformed: a price like `123900,90` written unquoted into a
//! comma-delimited file splits into two fields and shifts the whole row one
//! column right. Such rows are detected by field count and rejoined when the
//! two leading fields look like an integer part and a two-digit fraction;
//! anything else with too many fields keeps its overflow in a parallel error
//! slot instead of silently landing in the wrong columns.

use std::path::Path;

use tracing::{debug, warn};

use crate::app::services::normalizer::{match_key, region_slug};
use crate::app::services::report::schema::open_csv_reader;
use crate::constants::{MERGE_HEADERS, VOIVODESHIPS};
use crate::{Error, Result};

/// One region file, reshaped to the canonical column order
#[derive(Debug)]
pub struct RegionTable {
    /// Region name derived from the file name, used to back-fill the
    /// province column
    pub region: String,

    /// Rows in canonical column order, one entry per input row
    pub rows: Vec<Vec<String>>,

    /// Parallel to `rows`: overflow text of malformed rows, empty otherwise
    pub errors: Vec<String>,

    /// Rows repaired by rejoining a split decimal
    pub repaired: usize,

    /// Rows whose overflow could not be repaired
    pub malformed: usize,
}

/// Read one region CSV and reshape it to the canonical columns
pub fn read_region_file(path: &Path) -> Result<RegionTable> {
    let path_str = path.display().to_string();
    let (mut reader, _) = open_csv_reader(path)?;

    let file_headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::csv(&path_str, "cannot read header row", Some(e)))?
        .iter()
        .map(str::to_string)
        .collect();
    let width = file_headers.len();

    // Canonical column -> index in this file, matched on normalized keys
    let mapping: Vec<Option<usize>> = MERGE_HEADERS
        .iter()
        .map(|canonical| {
            let wanted = match_key(canonical);
            file_headers.iter().position(|h| match_key(h) == wanted)
        })
        .collect();

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut repaired = 0usize;
    let mut malformed = 0usize;

    for (row_number, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(file = %path_str, row = row_number + 2, error = %e, "skipping unreadable row");
                continue;
            }
        };
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();

        if cells.len() == width + 1 && looks_like_split_decimal(&cells[0], &cells[1]) {
            let merged = format!("{},{}", cells[0].trim(), cells[1].trim());
            cells.splice(0..2, [merged]);
            repaired += 1;
            debug!(file = %path_str, row = row_number + 2, "rejoined split price");
        }

        let error = if cells.len() > width {
            malformed += 1;
            format!("extra fields: {}", cells[width..].join(" | "))
        } else {
            String::new()
        };

        let canonical_row: Vec<String> = mapping
            .iter()
            .map(|index| {
                index
                    .and_then(|i| cells.get(i))
                    .map(|c| c.trim().to_string())
                    .unwrap_or_default()
            })
            .collect();

        rows.push(canonical_row);
        errors.push(error);
    }

    Ok(RegionTable {
        region: region_from_file_name(path),
        rows,
        errors,
        repaired,
        malformed,
    })
}

/// True when two adjacent fields look like a decimal split by the delimiter:
/// an integer part and an exactly-two-digit fraction (grosze)
pub(crate) fn looks_like_split_decimal(left: &str, right: &str) -> bool {
    let left = left.trim();
    let right = right.trim();
    !left.is_empty()
        && left.chars().all(|c| c.is_ascii_digit())
        && right.len() == 2
        && right.chars().all(|c| c.is_ascii_digit())
}

/// Canonical region name from a file name.
///
/// Scraper temp markers are stripped; the stem is then matched against the
/// known voivodeships so "slaskie.csv" comes back as "Śląskie". An
/// unrecognized stem is kept as-is.
pub(crate) fn region_from_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
        .replace(".__tmp__", "");

    let slug = region_slug(&stem);
    VOIVODESHIPS
        .iter()
        .find(|name| region_slug(name) == slug)
        .map(|name| name.to_string())
        .unwrap_or_else(|| stem.trim().to_string())
}

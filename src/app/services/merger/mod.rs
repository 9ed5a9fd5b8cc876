//! Consolidation of per-region listing files
//!
//! Every region scrape produces its own CSV. Merging concatenates them in
//! file-name order into one table with a fixed canonical column order,
//! back-fills the province from the source file name where rows left it
//! empty, and deduplicates on the listing link, keeping the first
//! occurrence. Rows that arrive with too many fields are repaired when they
//! look like a decimal price split by the delimiter, and quarantined into an
//! error column otherwise.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::app::services::normalizer::normalize;
use crate::constants::{MERGE_ERROR_COLUMN, MERGE_HEADERS};
use crate::{Error, Result};

pub mod reader;

#[cfg(test)]
pub mod tests;

pub use reader::{RegionTable, read_region_file};

/// Counters reported after a merge
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeStats {
    pub files: usize,
    pub rows_read: usize,
    pub rows_written: usize,
    pub duplicates: usize,
    pub repaired: usize,
    pub malformed: usize,
}

/// The unified table produced by a merge
#[derive(Debug)]
pub struct MergedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub stats: MergeStats,
}

/// Find region files under `dir` matching the glob pattern, sorted by name
pub fn discover_region_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::file_not_found(dir.display().to_string()));
    }

    let full_pattern = dir.join(pattern);
    let full_pattern = full_pattern.to_string_lossy();

    let mut files = Vec::new();
    for entry in glob::glob(&full_pattern)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Merge region files into one canonical table.
///
/// Files that cannot be read at all are skipped with a warning; a merge with
/// zero readable rows is a configuration error.
pub fn merge_files(files: &[PathBuf], sort: bool) -> Result<MergedTable> {
    let mut stats = MergeStats::default();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    for path in files {
        let table = match read_region_file(path) {
            Ok(table) => table,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable region file");
                continue;
            }
        };

        stats.files += 1;
        stats.rows_read += table.rows.len();
        stats.repaired += table.repaired;
        stats.malformed += table.malformed;

        for (mut row, error) in table.rows.into_iter().zip(table.errors) {
            // Region back-fill from the file the row came from
            if row[PROVINCE_INDEX].trim().is_empty() {
                row[PROVINCE_INDEX] = table.region.clone();
            }
            rows.push(row);
            errors.push(error);
        }
    }

    if rows.is_empty() {
        return Err(Error::configuration(
            "no region rows found to merge; check the input directory and pattern",
        ));
    }

    dedup_by_link(&mut rows, &mut errors, &mut stats);

    if sort {
        sort_rows(&mut rows, &mut errors);
    }

    let mut headers: Vec<String> = MERGE_HEADERS.iter().map(|h| h.to_string()).collect();
    if errors.iter().any(|e| !e.is_empty()) {
        headers.push(MERGE_ERROR_COLUMN.to_string());
        for (row, error) in rows.iter_mut().zip(errors) {
            row.push(error);
        }
    }

    stats.rows_written = rows.len();
    info!(
        files = stats.files,
        rows = stats.rows_written,
        duplicates = stats.duplicates,
        repaired = stats.repaired,
        malformed = stats.malformed,
        "merged region files"
    );

    Ok(MergedTable {
        headers,
        rows,
        stats,
    })
}

/// Default output file name, stamped with the local time
pub fn default_output_name(now: DateTime<Local>) -> String {
    format!("Polska ({}).csv", now.format("%H.%M %d.%m.%Y"))
}

const PROVINCE_INDEX: usize = 8;
const CITY_INDEX: usize = 11;
const DISTRICT_INDEX: usize = 12;
const LINK_INDEX: usize = 14;

/// Drop later rows sharing a link with an earlier one. Rows without a link
/// have no identity and are always kept.
fn dedup_by_link(rows: &mut Vec<Vec<String>>, errors: &mut Vec<String>, stats: &mut MergeStats) {
    let mut seen = std::collections::HashSet::new();
    let mut keep = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let link = row[LINK_INDEX].trim();
        keep.push(link.is_empty() || seen.insert(link.to_string()));
    }

    stats.duplicates = keep.iter().filter(|k| !**k).count();

    let mut keep_rows = keep.iter().copied();
    rows.retain(|_| keep_rows.next().unwrap_or(true));
    let mut keep_errors = keep.iter().copied();
    errors.retain(|_| keep_errors.next().unwrap_or(true));
}

/// Stable sort by province, city, district on normalized keys
fn sort_rows(rows: &mut [Vec<String>], errors: &mut [String]) {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by_key(|&i| {
        (
            normalize(&rows[i][PROVINCE_INDEX]),
            normalize(&rows[i][CITY_INDEX]),
            normalize(&rows[i][DISTRICT_INDEX]),
        )
    });

    let sorted_rows: Vec<Vec<String>> = order.iter().map(|&i| rows[i].clone()).collect();
    let sorted_errors: Vec<String> = order.iter().map(|&i| errors[i].clone()).collect();
    rows.clone_from_slice(&sorted_rows);
    errors.clone_from_slice(&sorted_errors);
}

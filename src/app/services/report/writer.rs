//! Atomic CSV output
//!
//! Results are written to a temporary file in the destination directory and
//! renamed over the target, so a crash or interrupt mid-write never leaves a
//! half-written report behind. Output is UTF-8 with a BOM so spreadsheet
//! applications pick up Polish characters without an import dialog.
//!
//! A report open in a spreadsheet on Windows is locked against writing; that
//! surfaces as a dedicated error telling the user to close the file.

use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::{Error, Result};

/// UTF-8 byte order mark written at the start of every output file
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Write a header row and data rows to `path` atomically
pub fn write_table(
    path: &Path,
    delimiter: u8,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<()> {
    let path_str = path.display().to_string();
    let directory = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(directory)
        .map_err(|e| map_write_error(&path_str, "cannot create temporary file", e))?;

    temp.write_all(UTF8_BOM)
        .map_err(|e| map_write_error(&path_str, "cannot write output", e))?;

    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_writer(&mut temp);

        writer
            .write_record(headers)
            .map_err(|e| Error::csv(&path_str, "cannot write header row", Some(e)))?;
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| Error::csv(&path_str, "cannot write row", Some(e)))?;
        }
        writer
            .flush()
            .map_err(|e| map_write_error(&path_str, "cannot flush output", e))?;
    }

    temp.persist(path)
        .map_err(|e| map_write_error(&path_str, "cannot replace output file", e.error))?;

    info!(file = %path_str, rows = rows.len(), "wrote output table");
    Ok(())
}

/// Translate a write failure, recognizing the locked-file case
fn map_write_error(path: &str, message: &str, error: std::io::Error) -> Error {
    if error.kind() == ErrorKind::PermissionDenied {
        Error::report_locked(path)
    } else {
        Error::io(format!("{message} '{path}'"), error)
    }
}

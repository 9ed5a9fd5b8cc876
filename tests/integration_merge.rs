//! Integration tests for the region merge pipeline
//!
//! Full path: region CSVs on disk, discovery, merge, and the final table
//! written out and read back.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, TimeZone};
use tempfile::TempDir;

use pricebot_processor::app::services::merger::{
    default_output_name, discover_region_files, merge_files,
};
use pricebot_processor::app::services::report::Report;
use pricebot_processor::app::services::report::writer::write_table;

const HEADER: &str = "cena,cena_za_metr,metry,liczba_pokoi,pietro,rynek,rok_budowy,material,\
                      wojewodztwo,powiat,gmina,miejscowosc,dzielnica,ulica,link";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn row(price: &str, province: &str, city: &str, link: &str) -> String {
    format!(
        "{price},10000,52,2,3,wtorny,1990,cegla,{province},piaseczyński,Lesznowola,{city},dzielnica,Polna,{link}"
    )
}

#[test]
fn test_merge_writes_unified_table_to_disk() -> Result<()> {
    let input = TempDir::new().unwrap();
    write(
        &input,
        "mazowieckie.csv",
        &format!(
            "{HEADER}\n{}\n{}\n",
            row("500000", "", "Warszawa", "https://w1"),
            row("450000", "Mazowieckie", "Piaseczno", "https://p1")
        ),
    );
    write(
        &input,
        "slaskie.__tmp__.csv",
        &format!(
            "{HEADER}\n{}\n{}\n",
            row("300000", "", "Katowice", "https://k1"),
            // scraped again in the second region; first occurrence must win
            row("999999", "Mazowieckie", "Warszawa", "https://w1")
        ),
    );

    let files = discover_region_files(input.path(), "*.csv")?;
    assert_eq!(files.len(), 2);

    let merged = merge_files(&files, true)?;
    assert_eq!(merged.stats.files, 2);
    assert_eq!(merged.stats.rows_read, 4);
    assert_eq!(merged.stats.duplicates, 1);
    assert_eq!(merged.stats.rows_written, 3);

    let output = input.path().join("Polska.csv");
    write_table(&output, b';', &merged.headers, &merged.rows)?;

    let raw = fs::read(&output)?;
    assert!(raw.starts_with(b"\xef\xbb\xbf"));

    let table = Report::load(&output)?;
    assert_eq!(table.delimiter(), b';');
    assert_eq!(table.row_count(), 3);

    // sorted by province then city: Mazowieckie/Piaseczno, Mazowieckie/Warszawa,
    // Śląskie/Katowice; provinces back-filled from the file names, temp marker
    // stripped
    assert_eq!(table.cell(0, 8), "Mazowieckie");
    assert_eq!(table.cell(0, 11), "Piaseczno");
    assert_eq!(table.cell(1, 11), "Warszawa");
    assert_eq!(table.cell(1, 0), "500000");
    assert_eq!(table.cell(2, 8), "Śląskie");
    assert_eq!(table.cell(2, 11), "Katowice");
    Ok(())
}

#[test]
fn test_split_price_survives_the_full_path() -> Result<()> {
    let input = TempDir::new().unwrap();
    // the scraper wrote a decimal price unquoted into a comma-delimited file,
    // shifting the row one column right
    write(
        &input,
        "lubelskie.csv",
        &format!(
            "{HEADER}\n123900,90,10000,52,2,3,wtorny,1990,cegla,Lubelskie,lubelski,Lublin,Lublin,dzielnica,Polna,https://l1\n"
        ),
    );

    let files = discover_region_files(input.path(), "*.csv")?;
    let merged = merge_files(&files, false)?;

    assert_eq!(merged.stats.repaired, 1);
    assert_eq!(merged.stats.malformed, 0);
    // no error column needed
    assert_eq!(merged.headers.len(), 15);

    let output = input.path().join("Polska.csv");
    write_table(&output, b';', &merged.headers, &merged.rows)?;

    let table = Report::load(&output)?;
    assert_eq!(table.cell(0, 0), "123900,90");
    assert_eq!(table.cell(0, 14), "https://l1");
    Ok(())
}

#[test]
fn test_default_output_name_uses_local_stamp() {
    let moment = Local.with_ymd_and_hms(2026, 8, 29, 9, 30, 0).unwrap();
    assert_eq!(default_output_name(moment), "Polska (09.30 29.08.2026).csv");
}

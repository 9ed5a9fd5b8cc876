use chrono::{Local, TimeZone};
use tempfile::TempDir;

use crate::Error;
use crate::app::services::merger::tests::{REGION_HEADER, write_region};
use crate::app::services::merger::{default_output_name, discover_region_files, merge_files};
use crate::constants::MERGE_ERROR_COLUMN;

fn data_row(price: &str, province: &str, city: &str, link: &str) -> String {
    format!(
        "{price},10000,52,2,3,wtorny,1990,cegla,{province},powiat,gmina,{city},dzielnica,ulica,{link}"
    )
}

#[test]
fn test_merge_concatenates_in_file_name_order() {
    let dir = TempDir::new().unwrap();
    write_region(
        &dir,
        "b_mazowieckie.csv",
        &format!("{REGION_HEADER}\n{}\n", data_row("1", "Mazowieckie", "Warszawa", "https://m1")),
    );
    write_region(
        &dir,
        "a_lubelskie.csv",
        &format!("{REGION_HEADER}\n{}\n", data_row("2", "Lubelskie", "Lublin", "https://l1")),
    );

    let files = discover_region_files(dir.path(), "*.csv").unwrap();
    let merged = merge_files(&files, false).unwrap();

    assert_eq!(merged.stats.files, 2);
    assert_eq!(merged.rows.len(), 2);
    assert_eq!(merged.rows[0][11], "Lublin");
    assert_eq!(merged.rows[1][11], "Warszawa");
}

#[test]
fn test_dedup_on_link_keeps_first() {
    let dir = TempDir::new().unwrap();
    write_region(
        &dir,
        "a.csv",
        &format!(
            "{REGION_HEADER}\n{}\n{}\n",
            data_row("pierwszy", "Mazowieckie", "Warszawa", "https://dup"),
            data_row("bez-linku-1", "Mazowieckie", "Warszawa", "")
        ),
    );
    write_region(
        &dir,
        "b.csv",
        &format!(
            "{REGION_HEADER}\n{}\n{}\n",
            data_row("drugi", "Mazowieckie", "Warszawa", "https://dup"),
            data_row("bez-linku-2", "Mazowieckie", "Warszawa", "")
        ),
    );

    let files = discover_region_files(dir.path(), "*.csv").unwrap();
    let merged = merge_files(&files, false).unwrap();

    assert_eq!(merged.stats.duplicates, 1);
    // the duplicate link survives once, with the first file's price;
    // rows without a link are never treated as duplicates of each other
    assert_eq!(merged.rows.len(), 3);
    assert_eq!(merged.rows[0][0], "pierwszy");
}

#[test]
fn test_region_backfill_from_file_name() {
    let dir = TempDir::new().unwrap();
    write_region(
        &dir,
        "slaskie.csv",
        &format!(
            "{REGION_HEADER}\n{}\n{}\n",
            data_row("1", "", "Katowice", "https://k1"),
            data_row("2", "Opolskie", "Opole", "https://o1")
        ),
    );

    let files = discover_region_files(dir.path(), "*.csv").unwrap();
    let merged = merge_files(&files, false).unwrap();

    assert_eq!(merged.rows[0][8], "Śląskie");
    // a row that names its own province keeps it
    assert_eq!(merged.rows[1][8], "Opolskie");
}

#[test]
fn test_error_column_only_when_needed() {
    let dir = TempDir::new().unwrap();
    write_region(
        &dir,
        "czyste.csv",
        &format!("{REGION_HEADER}\n{}\n", data_row("1", "Mazowieckie", "Warszawa", "https://x")),
    );

    let files = discover_region_files(dir.path(), "*.csv").unwrap();
    let merged = merge_files(&files, false).unwrap();
    assert_eq!(merged.headers.len(), 15);
    assert!(!merged.headers.iter().any(|h| h == MERGE_ERROR_COLUMN));

    // now add a malformed row
    write_region(
        &dir,
        "zepsute.csv",
        &format!(
            "{REGION_HEADER}\n{},nadmiar\n",
            data_row("x1", "Mazowieckie", "Warszawa", "https://y")
        ),
    );
    let files = discover_region_files(dir.path(), "*.csv").unwrap();
    let merged = merge_files(&files, false).unwrap();

    assert_eq!(*merged.headers.last().unwrap(), MERGE_ERROR_COLUMN);
    let bad_row = merged
        .rows
        .iter()
        .find(|r| r[0] == "x1")
        .expect("malformed row present");
    assert!(bad_row[15].contains("nadmiar"));
}

#[test]
fn test_sorted_merge_orders_by_location() {
    let dir = TempDir::new().unwrap();
    write_region(
        &dir,
        "mix.csv",
        &format!(
            "{REGION_HEADER}\n{}\n{}\n{}\n",
            data_row("1", "Śląskie", "Katowice", "https://a"),
            data_row("2", "Lubelskie", "Lublin", "https://b"),
            data_row("3", "Lubelskie", "Chełm", "https://c")
        ),
    );

    let files = discover_region_files(dir.path(), "*.csv").unwrap();
    let merged = merge_files(&files, true).unwrap();

    let cities: Vec<&str> = merged.rows.iter().map(|r| r[11].as_str()).collect();
    assert_eq!(cities, vec!["Chełm", "Lublin", "Katowice"]);
}

#[test]
fn test_empty_input_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let files = discover_region_files(dir.path(), "*.csv").unwrap();
    assert!(files.is_empty());

    let err = merge_files(&files, false).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_missing_directory_is_an_error() {
    let err = discover_region_files(std::path::Path::new("/nie/ma/takiego"), "*.csv").unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_default_output_name_stamp() {
    let moment = Local.with_ymd_and_hms(2025, 3, 7, 14, 5, 0).unwrap();
    assert_eq!(default_output_name(moment), "Polska (14.05 07.03.2025).csv");
}

use std::path::Path;

use tempfile::TempDir;

use crate::app::services::merger::reader::{
    looks_like_split_decimal, read_region_file, region_from_file_name,
};
use crate::app::services::merger::tests::{REGION_HEADER, write_region};

#[test]
fn test_split_price_row_is_rejoined() {
    let dir = TempDir::new().unwrap();
    // "123900,90" written unquoted: 16 fields against a 15-column header
    let path = write_region(
        &dir,
        "mazowieckie.csv",
        &format!(
            "{REGION_HEADER}\n\
             123900,90,11999,52,2,3,wtorny,1990,cegla,Mazowieckie,Warszawa,Warszawa,Warszawa,Mokotów,Puławska,https://x\n"
        ),
    );

    let table = read_region_file(&path).unwrap();

    assert_eq!(table.repaired, 1);
    assert_eq!(table.malformed, 0);
    assert_eq!(table.rows[0][0], "123900,90");
    assert_eq!(table.rows[0][1], "11999");
    assert_eq!(table.rows[0][14], "https://x");
    assert_eq!(table.errors[0], "");
}

#[test]
fn test_unrepairable_overflow_goes_to_error_slot() {
    let dir = TempDir::new().unwrap();
    // 16 fields but the leading pair is not a split decimal
    let path = write_region(
        &dir,
        "mazowieckie.csv",
        &format!(
            "{REGION_HEADER}\n\
             515000,11999,52,2,3,wtorny,1990,cegla,Mazowieckie,Warszawa,Warszawa,Warszawa,Mokotów,Puławska,https://x,niespodzianka\n"
        ),
    );

    let table = read_region_file(&path).unwrap();

    assert_eq!(table.repaired, 0);
    assert_eq!(table.malformed, 1);
    // the first 15 fields still land in their columns
    assert_eq!(table.rows[0][0], "515000");
    assert_eq!(table.errors[0], "extra fields: niespodzianka");
}

#[test]
fn test_columns_are_reordered_and_missing_ones_blank() {
    let dir = TempDir::new().unwrap();
    let path = write_region(
        &dir,
        "lubelskie.csv",
        "link,cena,miejscowosc\nhttps://x,515000,Lublin\n",
    );

    let table = read_region_file(&path).unwrap();

    let row = &table.rows[0];
    assert_eq!(row.len(), 15);
    assert_eq!(row[0], "515000");
    assert_eq!(row[11], "Lublin");
    assert_eq!(row[14], "https://x");
    assert_eq!(row[1], "");
    assert_eq!(table.region, "Lubelskie");
}

#[test]
fn test_looks_like_split_decimal() {
    assert!(looks_like_split_decimal("123900", "90"));
    assert!(looks_like_split_decimal(" 123900 ", "05"));
    assert!(!looks_like_split_decimal("123900", "9"));
    assert!(!looks_like_split_decimal("123900", "905"));
    assert!(!looks_like_split_decimal("cena", "90"));
    assert!(!looks_like_split_decimal("", "90"));
    assert!(!looks_like_split_decimal("123900", "zł"));
}

#[test]
fn test_region_from_file_name() {
    assert_eq!(
        region_from_file_name(Path::new("/dane/slaskie.csv")),
        "Śląskie"
    );
    assert_eq!(
        region_from_file_name(Path::new("Warmińsko-Mazurskie.csv")),
        "Warmińsko-Mazurskie"
    );
    assert_eq!(
        region_from_file_name(Path::new("mazowieckie.__tmp__.csv")),
        "Mazowieckie"
    );
    assert_eq!(region_from_file_name(Path::new("dziwne.csv")), "dziwne");
}

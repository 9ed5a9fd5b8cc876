use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::Error;
use crate::app::models::AddressLevel;
use crate::app::services::comparables::loader::load_database;

fn write_fixture(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("Polska.csv");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_parses_prices_and_keys() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "cena;cena_za_metr;metry;wojewodztwo;powiat;gmina;miejscowosc;dzielnica;ulica;link\n\
         515000;11 999 zł/m²;52;Mazowieckie;Warszawa;Warszawa;Warszawa;Mokotów;Puławska;https://a\n\
         400000;---;48,5;Mazowieckie;;;Warszawa;;;https://b\n",
    );

    let db = load_database(&path).unwrap();

    assert_eq!(db.len(), 2);
    let first = &db.listings()[0];
    assert_eq!(first.price_per_m2, Some(11999.0));
    assert_eq!(first.area, Some(52.0));
    assert_eq!(first.key(AddressLevel::City), "warszawa");
    assert_eq!(first.key(AddressLevel::District), "mokotow");

    let second = &db.listings()[1];
    assert_eq!(second.price_per_m2, None);
    assert_eq!(second.area, Some(48.5));
    assert_eq!(second.key(AddressLevel::District), "");
}

#[test]
fn test_missing_price_column_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "cena;metry;miejscowosc\n515000;52;Warszawa\n");

    let err = load_database(&path).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "cena_za_metr"));
}

#[test]
fn test_missing_location_columns_are_tolerated() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "cena_za_metr;metry\n10000;52\n");

    let db = load_database(&path).unwrap();
    assert_eq!(db.len(), 1);
    assert_eq!(db.listings()[0].key(AddressLevel::City), "");
}

#[test]
fn test_missing_file_is_an_error() {
    let err = load_database(&PathBuf::from("/nonexistent/Polska.csv")).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

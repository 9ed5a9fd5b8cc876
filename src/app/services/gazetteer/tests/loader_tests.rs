use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::Error;
use crate::app::services::gazetteer::loader::{load_gazetteer, load_optional_gazetteer};

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_semicolon_delimited() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "teryt.csv",
        "Wojewodztwo;Powiat;Gmina;Miejscowosc;Dzielnica\n\
         Mazowieckie;piaseczyński;Lesznowola;Zamienie;\n\
         Mazowieckie;Warszawa;Warszawa;Warszawa;Mokotów\n",
    );

    let gazetteer = load_gazetteer(&path).unwrap();

    assert_eq!(gazetteer.len(), 2);
    assert_eq!(gazetteer.records()[0].city, "Zamienie");
    assert_eq!(gazetteer.records()[1].district, "Mokotów");
}

#[test]
fn test_load_comma_delimited_with_diacritic_headers() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "teryt.csv",
        "Województwo,Powiat,Gmina,Miejscowość,Dzielnica\n\
         Małopolskie,Kraków,Kraków,Kraków,Podgórze\n",
    );

    let gazetteer = load_gazetteer(&path).unwrap();

    assert_eq!(gazetteer.len(), 1);
    assert_eq!(gazetteer.records()[0].province, "Małopolskie");
}

#[test]
fn test_blank_rows_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "teryt.csv",
        "Wojewodztwo;Powiat;Gmina;Miejscowosc;Dzielnica\n\
         ;;;;\n\
         Lubelskie;zamojski;Zamość;Kolonia Zamość;\n",
    );

    let gazetteer = load_gazetteer(&path).unwrap();

    assert_eq!(gazetteer.len(), 1);
}

#[test]
fn test_missing_column_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "teryt.csv",
        "Wojewodztwo;Powiat;Gmina;Miejscowosc\n\
         Mazowieckie;Warszawa;Warszawa;Warszawa\n",
    );

    let err = load_gazetteer(&path).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "Dzielnica"));
}

#[test]
fn test_missing_file_is_an_error() {
    let err = load_gazetteer(&PathBuf::from("/nonexistent/teryt.csv")).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_optional_loader_tolerates_absence() {
    let dir = TempDir::new().unwrap();

    let absent = load_optional_gazetteer(&dir.path().join("obszar_sadow.csv")).unwrap();
    assert!(absent.is_none());

    let path = write_fixture(
        &dir,
        "obszar_sadow.csv",
        "Wojewodztwo;Powiat;Gmina;Miejscowosc;Dzielnica\n\
         Mazowieckie;Warszawa;Warszawa;Warszawa;Ursynów\n",
    );
    let present = load_optional_gazetteer(&path).unwrap();
    assert_eq!(present.unwrap().len(), 1);
}

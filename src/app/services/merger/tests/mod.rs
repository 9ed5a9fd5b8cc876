//! Tests for region file reading and merging

mod merge_tests;
mod reader_tests;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

pub fn write_region(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Header line shared by the region fixtures (the full canonical set)
pub const REGION_HEADER: &str =
    "cena,cena_za_metr,metry,liczba_pokoi,pietro,rynek,rok_budowy,material,\
     wojewodztwo,powiat,gmina,miejscowosc,dzielnica,ulica,link";

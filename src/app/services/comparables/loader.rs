//! Comparables database loading
//!
//! The database is the merged listings table. The price-per-m² and area
//! columns are required; location columns are located by alias and may be
//! absent, in which case every listing simply has no key at that level.

use std::path::Path;

use tracing::{info, warn};

use crate::app::services::report::schema::{find_column, open_csv_reader};
use crate::constants::column_aliases;
use crate::{Error, Result};

use super::{ComparablesDb, Listing};

/// Load the comparables database from a CSV file
pub fn load_database(path: &Path) -> Result<ComparablesDb> {
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

    let price = find_column(&headers, column_aliases::PRICE_PER_AREA)
        .ok_or_else(|| Error::missing_column(&path_str, "cena_za_metr"))?;
    let area = find_column(&headers, column_aliases::AREA)
        .ok_or_else(|| Error::missing_column(&path_str, "metry"))?;

    let province = find_column(&headers, column_aliases::PROVINCE);
    let county = find_column(&headers, column_aliases::COUNTY);
    let municipality = find_column(&headers, column_aliases::MUNICIPALITY);
    let city = find_column(&headers, column_aliases::CITY);
    let district = find_column(&headers, column_aliases::DISTRICT);
    let street = find_column(&headers, column_aliases::STREET);

    let mut listings = Vec::new();
    let mut skipped = 0usize;

    for (row_number, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(
                    file = %path_str,
                    row = row_number + 2,
                    error = %e,
                    "skipping unreadable listing"
                );
                skipped += 1;
                continue;
            }
        };

        let cell = |index: Option<usize>| index.and_then(|i| row.get(i)).unwrap_or("");

        listings.push(Listing::from_raw(
            cell(Some(price)),
            cell(Some(area)),
            cell(province),
            cell(county),
            cell(municipality),
            cell(city),
            cell(district),
            cell(street),
        ));
    }

    info!(
        file = %path_str,
        listings = listings.len(),
        skipped,
        "loaded comparables database"
    );

    Ok(ComparablesDb::new(listings, path_str))
}

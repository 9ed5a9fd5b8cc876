//! Comparables-database cleaning
//!
//! The scraped database accumulates damage over time: prices polluted with
//! the build year, a stale or missing price-per-m² column, streets hidden in
//! listing URLs, and address gaps. Cleaning repairs the numerics, then fills
//! address gaps twice over: first from the table's own rows (a municipality
//! that elsewhere names its province fills the blanks), then from the
//! gazetteer. Every address fill is fill-only, same as the resolver.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::app::models::{AddressLevel, is_missing_value};
use crate::app::services::gazetteer::resolver::{ResolverOptions, resolve};
use crate::app::services::gazetteer::Gazetteer;
use crate::app::services::normalizer::normalize;
use crate::app::services::numeric::{format_number, parse_decimal, round2};
use crate::app::services::report::{Report, ReportSchema, find_column};
use crate::config::MatchingConfig;
use crate::constants::column_aliases;
use crate::Result;

/// Counters reported after a cleaning run
#[derive(Debug, Default, Clone, Copy)]
pub struct CleanStats {
    pub prices_cleaned: usize,
    pub prices_per_m2_updated: usize,
    pub streets_from_links: usize,
    pub internal_fills: usize,
    pub gazetteer_fills: usize,
}

/// Column indices of the database table, located once up front.
///
/// Columns absent from the file are appended empty, so the cleaned table
/// always carries the full set.
struct DbColumns {
    price: usize,
    build_year: usize,
    area: usize,
    price_per_m2: usize,
    province: usize,
    county: usize,
    municipality: usize,
    city: usize,
    district: usize,
    street: usize,
    link: usize,
}

impl DbColumns {
    fn locate(report: &mut Report) -> Self {
        let mut find_or_add = |aliases: &[&str], canonical: &str| -> usize {
            match find_column(report.headers(), aliases) {
                Some(index) => index,
                None => report.ensure_column(canonical),
            }
        };

        Self {
            price: find_or_add(column_aliases::PRICE, "cena"),
            build_year: find_or_add(column_aliases::BUILD_YEAR, "rok_budowy"),
            area: find_or_add(column_aliases::AREA, "metry"),
            price_per_m2: find_or_add(column_aliases::PRICE_PER_AREA, "cena_za_metr"),
            province: find_or_add(column_aliases::PROVINCE, "wojewodztwo"),
            county: find_or_add(column_aliases::COUNTY, "powiat"),
            municipality: find_or_add(column_aliases::MUNICIPALITY, "gmina"),
            city: find_or_add(column_aliases::CITY, "miejscowosc"),
            district: find_or_add(column_aliases::DISTRICT, "dzielnica"),
            street: find_or_add(column_aliases::STREET, "ulica"),
            link: find_or_add(column_aliases::LINK, "link"),
        }
    }

    fn level_index(&self, level: AddressLevel) -> usize {
        match level {
            AddressLevel::Province => self.province,
            AddressLevel::County => self.county,
            AddressLevel::Municipality => self.municipality,
            AddressLevel::City => self.city,
            AddressLevel::District => self.district,
            AddressLevel::Street => self.street,
        }
    }
}

/// Maximum internal fill passes before giving up on convergence
const MAX_INTERNAL_PASSES: usize = 3;

/// Clean the comparables database in place.
///
/// The gazetteer pass runs only when a gazetteer is supplied; everything
/// else is unconditional.
pub fn clean_database(
    report: &mut Report,
    gazetteer: Option<&Gazetteer>,
    config: &MatchingConfig,
) -> Result<CleanStats> {
    let columns = DbColumns::locate(report);
    let mut stats = CleanStats::default();

    clean_prices(report, &columns, &mut stats);
    recompute_price_per_m2(report, &columns, &mut stats);
    fill_streets_from_links(report, &columns, &mut stats);

    for pass in 0..MAX_INTERNAL_PASSES {
        let changes = internal_fill_pass(report, &columns);
        stats.internal_fills += changes;
        debug!(pass = pass + 1, changes, "internal fill pass");
        if changes == 0 {
            break;
        }
    }

    if let Some(gazetteer) = gazetteer {
        stats.gazetteer_fills = gazetteer_fill(report, &columns, gazetteer, config);
    }

    info!(
        prices = stats.prices_cleaned,
        per_m2 = stats.prices_per_m2_updated,
        streets = stats.streets_from_links,
        internal = stats.internal_fills,
        gazetteer = stats.gazetteer_fills,
        "cleaned database"
    );

    Ok(stats)
}

// =============================================================================
// Numeric repair
// =============================================================================

/// Reduce a scraped price cell to plain digits, stripping a build year that
/// the scraper glued onto the front (a known artifact of the listing layout).
///
/// A two-digit year in the year column is expanded pivoting at 50, so `98`
/// strips a leading `1998` and `21` a leading `2021`. Returns `None` when
/// nothing numeric remains.
pub fn clean_price(raw_price: &str, raw_year: &str) -> Option<u64> {
    let mut digits: String = raw_price.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    if let Some(year) = parse_decimal(raw_year).map(|y| y as i64).filter(|y| *y > 0) {
        let year = if year < 100 {
            if year < 50 { 2000 + year } else { 1900 + year }
        } else {
            year
        };
        let year = year.to_string();
        if digits.starts_with(&year) && digits.len() > year.len() {
            digits = digits[year.len()..].to_string();
        }
    }

    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<u64>().ok()
}

fn clean_prices(report: &mut Report, columns: &DbColumns, stats: &mut CleanStats) {
    for row in 0..report.row_count() {
        let raw = report.cell(row, columns.price).to_string();
        if raw.trim().is_empty() {
            continue;
        }
        let year = report.cell(row, columns.build_year).to_string();
        let cleaned = match clean_price(&raw, &year) {
            Some(price) => price.to_string(),
            None => String::new(),
        };
        if cleaned != raw.trim() {
            report.set_cell(row, columns.price, cleaned);
            stats.prices_cleaned += 1;
        }
    }
}

/// Recompute price-per-m² from the cleaned price and the area. A zero or
/// missing area leaves the cell empty rather than writing an infinity.
fn recompute_price_per_m2(report: &mut Report, columns: &DbColumns, stats: &mut CleanStats) {
    for row in 0..report.row_count() {
        let price = parse_decimal(report.cell(row, columns.price));
        let area = parse_decimal(report.cell(row, columns.area)).filter(|a| *a > 0.0);

        let computed = match (price, area) {
            (Some(price), Some(area)) => format_number(round2(price / area)),
            _ => String::new(),
        };

        if computed != report.cell(row, columns.price_per_m2) {
            report.set_cell(row, columns.price_per_m2, computed);
            stats.prices_per_m2_updated += 1;
        }
    }
}

// =============================================================================
// Street recovery from listing URLs
// =============================================================================

static STREET_IN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w])ul\.\s*([A-ZĄĆĘŁŃÓŚŹŻa-ząćęłńóśźż0-9 .\-']+)")
        .unwrap_or_else(|e| unreachable!("invalid street pattern: {e}"))
});

/// Extract a street name embedded in a listing URL, e.g.
/// `...?q=ul. Puławska 12...` comes back as `ul. Puławska 12`
pub fn street_from_link(link: &str) -> Option<String> {
    let captured = STREET_IN_LINK.captures(link)?.get(1)?.as_str();
    let street = captured
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .trim();
    if street.is_empty() {
        return None;
    }
    Some(format!("ul. {street}"))
}

fn fill_streets_from_links(report: &mut Report, columns: &DbColumns, stats: &mut CleanStats) {
    for row in 0..report.row_count() {
        if !is_missing_value(report.cell(row, columns.street)) {
            continue;
        }
        if let Some(street) = street_from_link(report.cell(row, columns.link)) {
            report.set_cell(row, columns.street, street);
            stats.streets_from_links += 1;
        }
    }
}

// =============================================================================
// Internal fill: learn from the table's own complete rows
// =============================================================================

type ModeMap = HashMap<Vec<String>, String>;

/// Most common value per key combination, over rows where all key cells and
/// the value cell are present. Keys compare normalized; the stored value is
/// the raw cell. Ties go to the value seen first.
fn mode_map(report: &Report, key_columns: &[usize], value_column: usize) -> ModeMap {
    let mut counts: HashMap<Vec<String>, HashMap<String, (usize, usize, String)>> = HashMap::new();

    for row in 0..report.row_count() {
        let value = report.cell(row, value_column).trim();
        if is_missing_value(value) {
            continue;
        }

        let mut key = Vec::with_capacity(key_columns.len());
        let mut complete = true;
        for &column in key_columns {
            let cell = report.cell(row, column);
            if is_missing_value(cell) {
                complete = false;
                break;
            }
            key.push(normalize(cell));
        }
        if !complete {
            continue;
        }

        let entry = counts
            .entry(key)
            .or_default()
            .entry(normalize(value))
            .or_insert((0, row, value.to_string()));
        entry.0 += 1;
    }

    counts
        .into_iter()
        .map(|(key, candidates)| {
            let best = candidates
                .into_values()
                .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
                .map(|(_, _, value)| value)
                .unwrap_or_default();
            (key, best)
        })
        .collect()
}

/// One pass of filling address gaps from the table itself. Returns the
/// number of cells changed; the caller repeats until convergence.
fn internal_fill_pass(report: &mut Report, columns: &DbColumns) -> usize {
    let c = columns;

    // city / county / municipality keyed maps, Python-order priorities
    let city_to_province = mode_map(report, &[c.city], c.province);
    let county_to_province = mode_map(report, &[c.county], c.province);
    let municipality_to_province = mode_map(report, &[c.municipality], c.province);
    let city_to_county = mode_map(report, &[c.city], c.county);
    let city_municipality_to_county = mode_map(report, &[c.city, c.municipality], c.county);
    let city_to_municipality = mode_map(report, &[c.city], c.municipality);
    let city_county_to_municipality = mode_map(report, &[c.city, c.county], c.municipality);
    let city_to_district = mode_map(report, &[c.city], c.district);
    let city_district_to_street = mode_map(report, &[c.city, c.district], c.street);

    let mut changes = 0usize;

    for row in 0..report.row_count() {
        let city = cell_key(report, row, c.city);
        let county = cell_key(report, row, c.county);
        let municipality = cell_key(report, row, c.municipality);
        let district = cell_key(report, row, c.district);

        let candidate = city
            .as_ref()
            .and_then(|m| city_to_province.get(std::slice::from_ref(m)))
            .or_else(|| {
                county
                    .as_ref()
                    .and_then(|p| county_to_province.get(std::slice::from_ref(p)))
            })
            .or_else(|| {
                municipality
                    .as_ref()
                    .and_then(|g| municipality_to_province.get(std::slice::from_ref(g)))
            });
        if fill_missing(report, row, c.province, candidate) {
            changes += 1;
        }

        let candidate = city
            .as_ref()
            .and_then(|m| city_to_county.get(std::slice::from_ref(m)))
            .or_else(|| match (&city, &municipality) {
                (Some(m), Some(g)) => {
                    city_municipality_to_county.get([m.clone(), g.clone()].as_slice())
                }
                _ => None,
            });
        if fill_missing(report, row, c.county, candidate) {
            changes += 1;
        }

        let candidate = city
            .as_ref()
            .and_then(|m| city_to_municipality.get(std::slice::from_ref(m)))
            .or_else(|| match (&city, &county) {
                (Some(m), Some(p)) => {
                    city_county_to_municipality.get([m.clone(), p.clone()].as_slice())
                }
                _ => None,
            });
        if fill_missing(report, row, c.municipality, candidate) {
            changes += 1;
        }

        let candidate = city
            .as_ref()
            .and_then(|m| city_to_district.get(std::slice::from_ref(m)));
        if fill_missing(report, row, c.district, candidate) {
            changes += 1;
        }

        let candidate = match (&city, &district) {
            (Some(m), Some(d)) => city_district_to_street.get([m.clone(), d.clone()].as_slice()),
            _ => None,
        };
        if fill_missing(report, row, c.street, candidate) {
            changes += 1;
        }
    }

    changes
}

/// Normalized key of a cell, `None` when the cell holds no value
fn cell_key(report: &Report, row: usize, column: usize) -> Option<String> {
    let cell = report.cell(row, column);
    if is_missing_value(cell) {
        None
    } else {
        Some(normalize(cell))
    }
}

/// Fill a cell with the candidate only when the cell is currently empty
fn fill_missing(report: &mut Report, row: usize, column: usize, candidate: Option<&String>) -> bool {
    if let Some(value) = candidate {
        if is_missing_value(report.cell(row, column)) {
            report.set_cell(row, column, value.clone());
            return true;
        }
    }
    false
}

// =============================================================================
// Gazetteer fill
// =============================================================================

/// Resolve remaining address gaps against the gazetteer, row by row.
/// Returns the number of cells filled.
fn gazetteer_fill(
    report: &mut Report,
    columns: &DbColumns,
    gazetteer: &Gazetteer,
    config: &MatchingConfig,
) -> usize {
    let schema = ReportSchema {
        kw: None,
        province: Some(columns.province),
        county: Some(columns.county),
        municipality: Some(columns.municipality),
        city: Some(columns.city),
        district: Some(columns.district),
        street: Some(columns.street),
        area: Some(columns.area),
    };
    let options = ResolverOptions::from(config);

    let mut filled_cells = 0usize;
    for row in 0..report.row_count() {
        let mut address = schema.address_of(report, row);
        if address.is_complete() {
            continue;
        }

        let filled = resolve(&mut address, gazetteer, None, &options);
        for level in filled {
            if let Some(value) = address.get(level) {
                report.set_cell(row, columns.level_index(level), value.to_string());
                filled_cells += 1;
            }
        }
    }
    filled_cells
}

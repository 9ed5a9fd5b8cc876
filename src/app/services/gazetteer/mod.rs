//! Reference geography service for hierarchical address resolution
//!
//! A gazetteer is a flat table of canonical administrative addresses
//! (province / county / municipality / city / district) loaded once per run
//! and used read-only to back-fill missing report fields. Two sources are
//! supported: the primary canonical table and an optional secondary
//! court-district table consulted only for fields the primary leaves open.

use crate::app::models::AddressLevel;
use crate::app::services::normalizer::{base_key, normalize};

pub mod loader;
pub mod resolver;

#[cfg(test)]
pub mod tests;

// Re-export key operations for convenience
pub use loader::{load_gazetteer, load_optional_gazetteer};
pub use resolver::{ResolverOptions, resolve};

/// One canonical address record with precomputed match keys
#[derive(Debug, Clone)]
pub struct GeoRecord {
    pub province: String,
    pub county: String,
    pub municipality: String,
    pub city: String,
    pub district: String,

    // Normalized keys, computed once at load time
    pub(crate) province_key: String,
    pub(crate) county_key: String,
    pub(crate) municipality_key: String,
    pub(crate) city_key: String,
    pub(crate) district_key: String,

    // Base keys with generic qualifier words removed, used as a fallback
    // when the exact city/municipality match comes up empty
    pub(crate) city_base: String,
    pub(crate) municipality_base: String,
}

impl GeoRecord {
    /// Build a record and its match keys from raw cell values
    pub fn new(
        province: &str,
        county: &str,
        municipality: &str,
        city: &str,
        district: &str,
    ) -> Self {
        Self {
            province: province.trim().to_string(),
            county: county.trim().to_string(),
            municipality: municipality.trim().to_string(),
            city: city.trim().to_string(),
            district: district.trim().to_string(),
            province_key: normalize(province),
            county_key: normalize(county),
            municipality_key: normalize(municipality),
            city_key: normalize(city),
            district_key: normalize(district),
            city_base: base_key(city),
            municipality_base: base_key(municipality),
        }
    }

    /// Raw value at a resolvable hierarchy level (street has no gazetteer column)
    pub fn value(&self, level: AddressLevel) -> &str {
        match level {
            AddressLevel::Province => &self.province,
            AddressLevel::County => &self.county,
            AddressLevel::Municipality => &self.municipality,
            AddressLevel::City => &self.city,
            AddressLevel::District => &self.district,
            AddressLevel::Street => "",
        }
    }
}

/// A loaded reference geography table
#[derive(Debug, Clone)]
pub struct Gazetteer {
    records: Vec<GeoRecord>,

    /// Source description for log and error messages
    source: String,
}

impl Gazetteer {
    /// Create a gazetteer from preloaded records
    pub fn new(records: Vec<GeoRecord>, source: impl Into<String>) -> Self {
        Self {
            records,
            source: source.into(),
        }
    }

    /// All records, in file order
    pub fn records(&self) -> &[GeoRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Source description (file path or fixture name)
    pub fn source(&self) -> &str {
        &self.source
    }
}

//! Comparable-listing database and valuation
//!
//! The comparables database is the merged scraped-listings table. Each run
//! loads it once into typed rows with precomputed match keys, then every
//! report row is valued by selecting comparables (area window plus a
//! location cascade), fencing price outliers, and averaging what survives.

use crate::app::models::AddressLevel;
use crate::app::services::normalizer::normalize;
use crate::app::services::numeric::parse_decimal;

pub mod estimator;
pub mod loader;
pub mod outliers;
pub mod selector;

#[cfg(test)]
pub mod tests;

pub use estimator::{Estimate, estimate_row};
pub use loader::load_database;
pub use selector::{MatchTier, select_comparables};

/// One scraped listing with parsed numerics and normalized location keys
#[derive(Debug, Clone)]
pub struct Listing {
    /// Price per m², `None` when the cell did not parse
    pub price_per_m2: Option<f64>,

    /// Listing area in m², `None` when the cell did not parse
    pub area: Option<f64>,

    // Normalized location keys, empty when the source cell was blank
    pub(crate) keys: [String; 6],
}

impl Listing {
    /// Build a listing from raw cells
    pub fn from_raw(
        price_per_m2: &str,
        area: &str,
        province: &str,
        county: &str,
        municipality: &str,
        city: &str,
        district: &str,
        street: &str,
    ) -> Self {
        Self {
            price_per_m2: parse_decimal(price_per_m2),
            area: parse_decimal(area),
            keys: [
                normalize(province),
                normalize(county),
                normalize(municipality),
                normalize(city),
                normalize(district),
                normalize(street),
            ],
        }
    }

    /// Normalized key at an address level, empty when unknown
    pub fn key(&self, level: AddressLevel) -> &str {
        &self.keys[level.index()]
    }
}

/// The loaded comparables database
#[derive(Debug, Clone)]
pub struct ComparablesDb {
    listings: Vec<Listing>,
    source: String,
}

impl ComparablesDb {
    /// Create a database from preloaded listings
    pub fn new(listings: Vec<Listing>, source: impl Into<String>) -> Self {
        Self {
            listings,
            source: source.into(),
        }
    }

    /// All listings, in file order
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Number of listings
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// True when the database holds no listings
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Source description (file path or fixture name)
    pub fn source(&self) -> &str {
        &self.source
    }
}

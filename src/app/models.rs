//! Data models for report cleaning and valuation
//!
//! This module contains the hierarchical address representation shared by the
//! resolver, the comparable selector, and the price-table cleaner, plus the
//! valuation result written back into report rows.

use crate::constants::MISSING_SENTINEL;
use serde::{Deserialize, Serialize};

// =============================================================================
// Address hierarchy
// =============================================================================

/// One level of the administrative hierarchy, ordered coarse to fine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressLevel {
    Province,
    County,
    Municipality,
    City,
    District,
    Street,
}

impl AddressLevel {
    /// All levels, coarse to fine
    pub const ALL: [AddressLevel; 6] = [
        AddressLevel::Province,
        AddressLevel::County,
        AddressLevel::Municipality,
        AddressLevel::City,
        AddressLevel::District,
        AddressLevel::Street,
    ];

    /// Levels the resolver may back-fill. Street is used for matching but is
    /// never filled from a gazetteer.
    pub const RESOLVED: [AddressLevel; 5] = [
        AddressLevel::Province,
        AddressLevel::County,
        AddressLevel::Municipality,
        AddressLevel::City,
        AddressLevel::District,
    ];

    /// Array index of this level within an [`Address`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label for log output
    pub fn label(self) -> &'static str {
        match self {
            AddressLevel::Province => "province",
            AddressLevel::County => "county",
            AddressLevel::Municipality => "municipality",
            AddressLevel::City => "city",
            AddressLevel::District => "district",
            AddressLevel::Street => "street",
        }
    }
}

/// Check whether a raw cell value counts as "no value".
///
/// Missing = empty after trimming, or the literal three-dash marker.
pub fn is_missing_value(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == MISSING_SENTINEL
}

/// A partially known hierarchical address.
///
/// Each level is either a present, non-empty string or missing. The hierarchy
/// is nominally a containment chain but input data may be locally
/// inconsistent; nothing here enforces containment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    fields: [Option<String>; 6],
}

impl Address {
    /// Build an address from raw cell values, treating the missing sentinel
    /// and empty strings as absent
    pub fn from_raw(
        province: &str,
        county: &str,
        municipality: &str,
        city: &str,
        district: &str,
        street: &str,
    ) -> Self {
        let clean = |raw: &str| -> Option<String> {
            if is_missing_value(raw) {
                None
            } else {
                Some(raw.trim().to_string())
            }
        };

        Self {
            fields: [
                clean(province),
                clean(county),
                clean(municipality),
                clean(city),
                clean(district),
                clean(street),
            ],
        }
    }

    /// Get the value at a level, if present
    pub fn get(&self, level: AddressLevel) -> Option<&str> {
        self.fields[level.index()].as_deref()
    }

    /// True if the level holds no value
    pub fn is_missing(&self, level: AddressLevel) -> bool {
        self.fields[level.index()].is_none()
    }

    /// Fill a level only when it is currently missing.
    ///
    /// Present values are never overwritten; resolution is fill-only.
    /// Returns true when the field changed.
    pub fn set_if_missing(&mut self, level: AddressLevel, value: &str) -> bool {
        if !self.is_missing(level) || is_missing_value(value) {
            return false;
        }
        self.fields[level.index()] = Some(value.trim().to_string());
        true
    }

    /// True when every resolvable level (street excluded) holds a value
    pub fn is_complete(&self) -> bool {
        AddressLevel::RESOLVED
            .iter()
            .all(|level| !self.is_missing(*level))
    }

    /// Resolvable levels still missing a value
    pub fn missing_levels(&self) -> Vec<AddressLevel> {
        AddressLevel::RESOLVED
            .iter()
            .copied()
            .filter(|level| self.is_missing(*level))
            .collect()
    }

    /// Count of present values across all six levels
    pub fn present_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_some()).count()
    }
}

// =============================================================================
// Valuation result
// =============================================================================

/// Per-row valuation output.
///
/// `None` means "no data": the corresponding report cell stays empty.
/// An unparsable or absent input is never coerced to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Valuation {
    /// Arithmetic mean price per m² of the surviving comparables
    pub average: Option<f64>,

    /// Average after the configured percentage discount
    pub adjusted: Option<f64>,

    /// Area times the adjusted average
    pub value: Option<f64>,
}

impl Valuation {
    /// A valuation with no data in any field
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no field carries a value
    pub fn is_empty(&self) -> bool {
        self.average.is_none() && self.adjusted.is_none() && self.value.is_none()
    }
}

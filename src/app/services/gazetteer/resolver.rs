//! Hierarchical address resolution against a gazetteer
//!
//! Resolution narrows the candidate record set level by level using the
//! fields the row already has, then back-fills each originally missing field
//! when the surviving candidates agree on exactly one value. Filling is
//! strictly additive: a present field is never overwritten, so resolution is
//! idempotent.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::app::models::{Address, AddressLevel};
use crate::app::services::normalizer::{base_key, normalize};
use crate::config::MatchingConfig;

use super::{Gazetteer, GeoRecord};

/// Behavioral toggles for a resolution run
#[derive(Debug, Clone, Copy)]
pub struct ResolverOptions {
    /// Fill a missing city with the most common city of the narrowed subset
    /// when the municipality is known. The only non-unique fill in the
    /// resolver; see [`MatchingConfig::mode_city_backfill`].
    pub mode_city_backfill: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            mode_city_backfill: true,
        }
    }
}

impl From<&MatchingConfig> for ResolverOptions {
    fn from(config: &MatchingConfig) -> Self {
        Self {
            mode_city_backfill: config.mode_city_backfill,
        }
    }
}

/// Resolve an address against a primary gazetteer, then (for whatever is
/// still missing) against an optional secondary one.
///
/// Returns the levels that were filled, in hierarchy order.
pub fn resolve(
    address: &mut Address,
    primary: &Gazetteer,
    secondary: Option<&Gazetteer>,
    options: &ResolverOptions,
) -> Vec<AddressLevel> {
    let mut filled = fill_from_source(address, primary, options);

    if !address.is_complete() {
        if let Some(fallback) = secondary {
            let extra = fill_from_source(address, fallback, options);
            filled.extend(extra);
        }
    }

    filled.sort_by_key(|level| level.index());
    filled
}

/// One narrowing-and-filling pass over a single gazetteer
fn fill_from_source(
    address: &mut Address,
    source: &Gazetteer,
    options: &ResolverOptions,
) -> Vec<AddressLevel> {
    if source.is_empty() {
        return Vec::new();
    }

    let originally_missing = address.missing_levels();
    if originally_missing.is_empty() {
        return Vec::new();
    }

    let mut subset: Vec<&GeoRecord> = source.records().iter().collect();

    // Narrow coarse to fine. Each step keeps the previous subset when it
    // would otherwise go empty, so one inconsistent field cannot wipe out
    // the evidence supplied by the others.
    if let Some(province) = address.get(AddressLevel::Province) {
        let key = normalize(province);
        narrow(&mut subset, |r| r.province_key == key);
    }
    if let Some(county) = address.get(AddressLevel::County) {
        let key = normalize(county);
        narrow(&mut subset, |r| r.county_key == key);
    }
    if let Some(district) = address.get(AddressLevel::District) {
        let key = normalize(district);
        narrow(&mut subset, |r| r.district_key == key);
    }
    if let Some(city) = address.get(AddressLevel::City) {
        narrow_with_base(
            &mut subset,
            &normalize(city),
            &base_key(city),
            |r| (&r.city_key, &r.city_base),
        );
    }
    if let Some(municipality) = address.get(AddressLevel::Municipality) {
        narrow_with_base(
            &mut subset,
            &normalize(municipality),
            &base_key(municipality),
            |r| (&r.municipality_key, &r.municipality_base),
        );
    }

    trace!(
        source = source.source(),
        candidates = subset.len(),
        "narrowed gazetteer subset"
    );

    let mut filled = Vec::new();

    // City back-fill by mode: the municipality pins the subset down well
    // enough that the dominant city is usually the right one, but it is a
    // heuristic and can be switched off.
    if options.mode_city_backfill
        && address.is_missing(AddressLevel::City)
        && !address.is_missing(AddressLevel::Municipality)
    {
        if let Some(city) = mode_value(&subset, AddressLevel::City) {
            if address.set_if_missing(AddressLevel::City, &city) {
                debug!(city = %city, "filled city from subset mode");
                filled.push(AddressLevel::City);
            }
        }
    }

    // Unique-value back-fill for everything else: a field is filled only
    // when the surviving candidates carry exactly one distinct non-empty
    // value for it.
    for level in originally_missing {
        if !address.is_missing(level) {
            continue;
        }
        if let Some(value) = unique_value(&subset, level) {
            if address.set_if_missing(level, &value) {
                debug!(level = level.label(), value = %value, "filled from gazetteer");
                filled.push(level);
            }
        }
    }

    filled
}

/// Keep only records matching the predicate, unless that leaves nothing
fn narrow<F>(subset: &mut Vec<&GeoRecord>, predicate: F)
where
    F: Fn(&GeoRecord) -> bool,
{
    let refined: Vec<&GeoRecord> = subset.iter().copied().filter(|r| predicate(r)).collect();
    if !refined.is_empty() {
        *subset = refined;
    }
}

/// Narrow by exact key, falling back to the generic-word-stripped base key
/// when the exact match comes up empty. Keeps the subset on a double miss.
fn narrow_with_base<'a, F>(subset: &mut Vec<&'a GeoRecord>, key: &str, base: &str, keys_of: F)
where
    F: Fn(&GeoRecord) -> (&String, &String),
{
    let exact: Vec<&GeoRecord> = subset
        .iter()
        .copied()
        .filter(|r| keys_of(r).0 == key)
        .collect();

    let refined = if exact.is_empty() && !base.is_empty() {
        subset
            .iter()
            .copied()
            .filter(|r| {
                let record_base = keys_of(r).1;
                !record_base.is_empty() && record_base == base
            })
            .collect()
    } else {
        exact
    };

    if !refined.is_empty() {
        *subset = refined;
    }
}

/// The single distinct non-empty value at a level, or None when the subset
/// is empty, all-blank, or ambiguous
fn unique_value(subset: &[&GeoRecord], level: AddressLevel) -> Option<String> {
    let mut found: Option<&str> = None;
    for record in subset {
        let value = record.value(level).trim();
        if value.is_empty() {
            continue;
        }
        match found {
            None => found = Some(value),
            Some(existing) if normalize(existing) == normalize(value) => {}
            Some(_) => return None,
        }
    }
    found.map(str::to_string)
}

/// The most common non-empty value at a level. Ties go to the value seen
/// first in file order.
fn mode_value(subset: &[&GeoRecord], level: AddressLevel) -> Option<String> {
    let mut counts: HashMap<String, (usize, usize, &str)> = HashMap::new();
    for (position, record) in subset.iter().enumerate() {
        let value = record.value(level).trim();
        if value.is_empty() {
            continue;
        }
        let entry = counts
            .entry(normalize(value))
            .or_insert((0, position, value));
        entry.0 += 1;
    }

    counts
        .into_values()
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, _, value)| value.to_string())
}

//! Comparable selection: area window plus location cascade
//!
//! Selection first restricts the database to listings whose area lies within
//! a window around the subject area, then tries progressively looser
//! location matches until one yields results. The city is the anchor: with
//! no city on either side there is nothing to match against.

use tracing::debug;

use crate::app::models::{Address, AddressLevel};
use crate::app::services::normalizer::normalize;
use crate::config::MatchingConfig;

use super::{ComparablesDb, Listing};

/// How precisely the selected comparables match the subject location,
/// strictest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Every known address level matched
    FullAddress,
    /// City, district and street matched
    CityDistrictStreet,
    /// City and district matched
    CityDistrict,
    /// Only the city matched
    CityOnly,
    /// No tier produced a match
    None,
}

impl MatchTier {
    /// Short label for log output
    pub fn label(self) -> &'static str {
        match self {
            MatchTier::FullAddress => "full address",
            MatchTier::CityDistrictStreet => "city+district+street",
            MatchTier::CityDistrict => "city+district",
            MatchTier::CityOnly => "city only",
            MatchTier::None => "no match",
        }
    }
}

/// The outcome of one selection: matched listings and how loose the match was
#[derive(Debug)]
pub struct Selection<'a> {
    pub listings: Vec<&'a Listing>,
    pub tier: MatchTier,
}

/// Select comparables for a subject with the given area.
///
/// The area window is `[max(0, area - margin), area + margin]`. Location
/// tiers are tried in order; the first tier with at least one listing wins.
pub fn select_comparables<'a>(
    db: &'a ComparablesDb,
    address: &Address,
    area: f64,
    config: &MatchingConfig,
) -> Selection<'a> {
    let low = (area - config.area_margin_m2).max(0.0);
    let high = area + config.area_margin_m2;

    let in_window: Vec<&Listing> = db
        .listings()
        .iter()
        .filter(|listing| {
            listing
                .area
                .map(|a| a >= low && a <= high)
                .unwrap_or(false)
        })
        .collect();

    if in_window.is_empty() {
        return Selection {
            listings: Vec::new(),
            tier: MatchTier::None,
        };
    }

    // Precompute the subject keys once per row
    let keys: [Option<String>; 6] = AddressLevel::ALL
        .map(|level| address.get(level).map(normalize));

    // The city anchors every tier; without one a same-named district or
    // street in another city would slip through
    if keys[AddressLevel::City.index()].is_none() {
        return Selection {
            listings: Vec::new(),
            tier: MatchTier::None,
        };
    }

    let tiers: [(MatchTier, &[AddressLevel]); 4] = [
        (MatchTier::FullAddress, &AddressLevel::ALL),
        (
            MatchTier::CityDistrictStreet,
            &[
                AddressLevel::City,
                AddressLevel::District,
                AddressLevel::Street,
            ],
        ),
        (
            MatchTier::CityDistrict,
            &[AddressLevel::City, AddressLevel::District],
        ),
        (MatchTier::CityOnly, &[AddressLevel::City]),
    ];

    // Levels actually known on the subject, per tier. The sets are nested
    // strict-to-loose, so equal lengths mean equal sets.
    let known_sets: Vec<(MatchTier, Vec<AddressLevel>)> = tiers
        .iter()
        .map(|(tier, levels)| {
            let known = levels
                .iter()
                .copied()
                .filter(|level| keys[level.index()].is_some())
                .collect();
            (*tier, known)
        })
        .collect();

    for (index, (tier, known)) in known_sets.iter().enumerate() {
        let tier = *tier;
        if known.is_empty() {
            continue;
        }
        // A tier that collapses to the next looser tier's known levels would
        // select the same listings under a stricter label; let the looser
        // tier report the match
        if let Some((_, next_known)) = known_sets.get(index + 1) {
            if known.len() == next_known.len() {
                continue;
            }
        }

        let matched: Vec<&Listing> = in_window
            .iter()
            .copied()
            .filter(|listing| {
                known.iter().all(|level| {
                    keys[level.index()]
                        .as_deref()
                        .is_some_and(|key| listing.key(*level) == key)
                })
            })
            .collect();

        if !matched.is_empty() {
            debug!(
                tier = tier.label(),
                matched = matched.len(),
                window = format!("[{low:.1}, {high:.1}]"),
                "selected comparables"
            );
            return Selection {
                listings: matched,
                tier,
            };
        }
    }

    Selection {
        listings: Vec::new(),
        tier: MatchTier::None,
    }
}

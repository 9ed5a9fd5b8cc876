//! Per-row valuation
//!
//! Ties selection and outlier fencing together: select comparables for the
//! subject, fence the prices, average what survives, apply the discount and
//! multiply by the subject area. Every step that can come up empty yields
//! "no data" rather than zero.

use tracing::debug;

use crate::app::models::{Address, Valuation};
use crate::app::services::numeric::round2;
use crate::config::MatchingConfig;

use super::selector::{MatchTier, select_comparables};
use super::ComparablesDb;
use super::outliers::iqr_filter;

/// A valuation together with how it was obtained
#[derive(Debug)]
pub struct Estimate {
    pub valuation: Valuation,

    /// Location tier the comparables came from
    pub tier: MatchTier,

    /// Comparables matched before outlier fencing
    pub matched: usize,

    /// Prices that survived the fence and entered the average
    pub used: usize,
}

impl Estimate {
    /// An estimate carrying no data
    pub fn empty() -> Self {
        Self {
            valuation: Valuation::empty(),
            tier: MatchTier::None,
            matched: 0,
            used: 0,
        }
    }
}

/// Value one subject row against the database.
///
/// A subject without a parsable area cannot be valued at all. A subject with
/// no surviving comparables gets an empty valuation; zeros are never written.
pub fn estimate_row(
    db: &ComparablesDb,
    address: &Address,
    area: Option<f64>,
    config: &MatchingConfig,
) -> Estimate {
    let Some(area) = area.filter(|a| a.is_finite() && *a > 0.0) else {
        return Estimate::empty();
    };

    let selection = select_comparables(db, address, area, config);
    if selection.listings.is_empty() {
        return Estimate::empty();
    }

    let prices: Vec<f64> = selection
        .listings
        .iter()
        .filter_map(|listing| listing.price_per_m2)
        .collect();

    let kept = iqr_filter(&prices, config.min_outlier_samples);
    if kept.is_empty() {
        return Estimate {
            valuation: Valuation::empty(),
            tier: selection.tier,
            matched: selection.listings.len(),
            used: 0,
        };
    }

    let average = kept.iter().sum::<f64>() / kept.len() as f64;
    let adjusted = average * (1.0 - config.discount_pct / 100.0);
    let value = area * adjusted;

    debug!(
        tier = selection.tier.label(),
        matched = selection.listings.len(),
        used = kept.len(),
        average = round2(average),
        "valued row"
    );

    Estimate {
        valuation: Valuation {
            average: Some(round2(average)),
            adjusted: Some(round2(adjusted)),
            value: Some(round2(value)),
        },
        tier: selection.tier,
        matched: selection.listings.len(),
        used: kept.len(),
    }
}

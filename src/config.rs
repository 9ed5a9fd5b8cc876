//! Configuration for matching and estimation runs.
//!
//! Collects the numeric tuning parameters and behavioral toggles shared by
//! the resolve and estimate commands.

use crate::constants::{
    DEFAULT_AREA_MARGIN_M2, DEFAULT_DISCOUNT_PCT, MIN_IQR_SAMPLES, SOFT_STOP_EXTRA_ROWS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tuning parameters for comparable selection and valuation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Area window half-width in m²: comparables must lie within
    /// [max(0, area - margin), area + margin]
    pub area_margin_m2: f64,

    /// Percentage discount applied to the average price per m², in [0, 100]
    pub discount_pct: f64,

    /// Minimum sample count before the IQR outlier fence is applied
    pub min_outlier_samples: usize,

    /// When a row has a municipality but no city, fill the city with the most
    /// common city of the narrowed gazetteer subset. This is the only fill
    /// that accepts a non-unique answer; disable for strict resolution.
    pub mode_city_backfill: bool,

    /// Rows a batch finishes after a stop request before writing out
    pub soft_stop_extra_rows: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            area_margin_m2: DEFAULT_AREA_MARGIN_M2,
            discount_pct: DEFAULT_DISCOUNT_PCT,
            min_outlier_samples: MIN_IQR_SAMPLES,
            mode_city_backfill: true,
            soft_stop_extra_rows: SOFT_STOP_EXTRA_ROWS,
        }
    }
}

impl MatchingConfig {
    /// Create configuration with a custom area window
    pub fn with_area_margin(mut self, margin_m2: f64) -> Self {
        self.area_margin_m2 = margin_m2;
        self
    }

    /// Create configuration with a custom price discount
    pub fn with_discount(mut self, discount_pct: f64) -> Self {
        self.discount_pct = discount_pct;
        self
    }

    /// Disable the mode-city back-fill heuristic
    pub fn without_mode_city_backfill(mut self) -> Self {
        self.mode_city_backfill = false;
        self
    }

    /// Validate parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !self.area_margin_m2.is_finite() || self.area_margin_m2 < 0.0 {
            return Err(Error::configuration(format!(
                "Area margin must be a non-negative number of m², got {}",
                self.area_margin_m2
            )));
        }

        if !self.discount_pct.is_finite() || !(0.0..=100.0).contains(&self.discount_pct) {
            return Err(Error::configuration(format!(
                "Discount must be a percentage in [0, 100], got {}",
                self.discount_pct
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MatchingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.area_margin_m2, DEFAULT_AREA_MARGIN_M2);
        assert!(config.mode_city_backfill);
    }

    #[test]
    fn test_builders() {
        let config = MatchingConfig::default()
            .with_area_margin(10.0)
            .with_discount(5.0)
            .without_mode_city_backfill();
        assert_eq!(config.area_margin_m2, 10.0);
        assert_eq!(config.discount_pct, 5.0);
        assert!(!config.mode_city_backfill);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_ranges() {
        assert!(
            MatchingConfig::default()
                .with_area_margin(-1.0)
                .validate()
                .is_err()
        );
        assert!(
            MatchingConfig::default()
                .with_discount(101.0)
                .validate()
                .is_err()
        );
        assert!(
            MatchingConfig::default()
                .with_discount(f64::NAN)
                .validate()
                .is_err()
        );
    }
}

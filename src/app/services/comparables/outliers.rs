//! Interquartile-range outlier fencing
//!
//! Scraped prices contain typos and luxury listings that would skew a plain
//! average. With enough samples, prices outside
//! `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]` are dropped; small samples pass through
//! untouched because quartiles of three prices mean nothing.

use tracing::trace;

use crate::constants::IQR_FENCE_MULTIPLIER;

/// Drop prices outside the IQR fence.
///
/// With fewer than `min_samples` values the input is returned unchanged.
/// NaN values are removed up front and never reach the fence.
pub fn iqr_filter(prices: &[f64], min_samples: usize) -> Vec<f64> {
    let mut values: Vec<f64> = prices.iter().copied().filter(|v| v.is_finite()).collect();

    if values.len() < min_samples {
        return values;
    }

    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = percentile(&sorted, 0.25);
    let q3 = percentile(&sorted, 0.75);
    let fence = IQR_FENCE_MULTIPLIER * (q3 - q1);
    let low = q1 - fence;
    let high = q3 + fence;

    let before = values.len();
    values.retain(|v| *v >= low && *v <= high);
    trace!(
        before,
        after = values.len(),
        low,
        high,
        "applied outlier fence"
    );

    values
}

/// Percentile by linear interpolation between closest ranks.
///
/// `sorted` must be non-empty and ascending; `p` is a fraction in [0, 1].
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let rank = p * last as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    if below == above {
        return sorted[below];
    }
    let weight = rank - below as f64;
    sorted[below] * (1.0 - weight) + sorted[above] * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_samples_pass_through() {
        let prices = [100.0, 9000.0, 250.0];
        assert_eq!(iqr_filter(&prices, 4), prices.to_vec());
    }

    #[test]
    fn test_fence_drops_extremes() {
        // Q1 = 9083.5, Q3 = 9875, fence = [7896.25, 11062.25]
        let prices = [9000.0, 9500.0, 9334.0, 10000.0, 25000.0, 100.0];
        let kept = iqr_filter(&prices, 4);
        assert_eq!(kept, vec![9000.0, 9500.0, 9334.0, 10000.0]);
    }

    #[test]
    fn test_uniform_prices_all_survive() {
        let prices = [8000.0; 6];
        assert_eq!(iqr_filter(&prices, 4).len(), 6);
    }

    #[test]
    fn test_nan_removed_before_counting() {
        let prices = [9000.0, f64::NAN, 9500.0];
        assert_eq!(iqr_filter(&prices, 4), vec![9000.0, 9500.0]);
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 1.0), 4.0);
        assert_eq!(percentile(&sorted, 0.25), 1.75);
        assert_eq!(percentile(&sorted, 0.5), 2.5);
    }
}

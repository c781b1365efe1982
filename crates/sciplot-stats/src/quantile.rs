//! Percentiles with linear interpolation between closest ranks
//!
//! For sorted values `v[0..n]` the p-th percentile sits at fractional
//! index `p / 100 * (n - 1)` and is interpolated between its neighbours.
//! Non-finite values are ignored.

use crate::error::{validation, StatsResult};
use crate::range::lerp;

/// Collect the finite values of `data` in ascending order
pub fn finite_sorted(data: &[f64]) -> Vec<f64> {
    let mut values: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    values.sort_by(f64::total_cmp);
    values
}

/// Percentile of already sorted finite data
///
/// Returns `None` for an empty slice. `p` is clamped to [0, 100].
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let pos = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;

    Some(lerp(sorted[lo], sorted[hi], frac))
}

/// Percentile of a sample, ignoring non-finite values
///
/// `Ok(None)` when the sample has no finite values.
pub fn percentile(data: &[f64], p: f64) -> StatsResult<Option<f64>> {
    validation::validate_percentile(p)?;
    Ok(percentile_sorted(&finite_sorted(data), p))
}

/// Several percentiles from one sort
///
/// Returns an empty vector when the sample has no finite values.
pub fn percentiles(data: &[f64], ps: &[f64]) -> StatsResult<Vec<f64>> {
    for &p in ps {
        validation::validate_percentile(p)?;
    }
    let sorted = finite_sorted(data);
    Ok(ps
        .iter()
        .filter_map(|&p| percentile_sorted(&sorted, p))
        .collect())
}

/// Median of the finite values
pub fn median(data: &[f64]) -> Option<f64> {
    percentile_sorted(&finite_sorted(data), 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_across_float_range() {
        let sorted = [-1e308, 1e308];
        assert_eq!(percentile_sorted(&sorted, 50.0), Some(0.0));
        let p95 = percentile_sorted(&sorted, 95.0).unwrap();
        assert!(p95.is_finite() && p95 > 8e307);
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        // idx = 0.95 * 5 = 4.75 -> 5 + 0.75 * 95
        let p95 = percentile(&data, 95.0).unwrap().unwrap();
        assert!((p95 - 76.25).abs() < 1e-12);
        // idx = 0.05 * 5 = 0.25 -> 1 + 0.25 * 1
        let p5 = percentile(&data, 5.0).unwrap().unwrap();
        assert!((p5 - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_extremes() {
        let data = [3.0, 1.0, 2.0];
        assert_eq!(percentile(&data, 0.0).unwrap(), Some(1.0));
        assert_eq!(percentile(&data, 100.0).unwrap(), Some(3.0));
    }

    #[test]
    fn test_percentile_ignores_non_finite() {
        let data = [f64::NAN, 1.0, f64::INFINITY, 3.0];
        assert_eq!(percentile(&data, 50.0).unwrap(), Some(2.0));
    }

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50.0).unwrap(), None);
        assert_eq!(percentile(&[f64::NAN], 50.0).unwrap(), None);
    }

    #[test]
    fn test_percentile_invalid() {
        assert!(percentile(&[1.0], 101.0).is_err());
        assert!(percentiles(&[1.0], &[25.0, -5.0]).is_err());
    }

    #[test]
    fn test_percentiles_batch() {
        let data: Vec<f64> = (0..=100).map(|x| x as f64).collect();
        let qs = percentiles(&data, &[25.0, 50.0, 75.0]).unwrap();
        assert_eq!(qs, vec![25.0, 50.0, 75.0]);
    }

    #[test]
    fn test_median_even() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }
}

//! Mean, spread and span of finite samples
//!
//! Every mean and population standard deviation in the workspace goes
//! through [`mean_std`]. Values are divided by a power of two before they
//! are accumulated, which is exact, so samples reaching `±f64::MAX` still
//! give finite results. A constant sample returns its value and zero
//! spread without any arithmetic.

use serde::{Deserialize, Serialize};

use crate::quantile::{finite_sorted, percentile_sorted};
use crate::range::Range;

/// Location and spread of the finite values of a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of finite values
    pub count: usize,
    /// Number of NaN or infinite values
    pub missing: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub median: f64,
}

impl SummaryStats {
    /// Statistics over the finite values of `data`
    pub fn from_data(data: &[f64]) -> Self {
        let sorted = finite_sorted(data);
        Self::from_sorted(&sorted, data.len() - sorted.len())
    }

    /// Statistics over values already filtered to finite and sorted
    pub fn from_sorted(sorted: &[f64], missing: usize) -> Self {
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Self {
                count: 0,
                missing,
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                std_dev: f64::NAN,
                median: f64::NAN,
            };
        };
        let (mean, std_dev) = mean_std(sorted);

        Self {
            count: sorted.len(),
            missing,
            min,
            max,
            mean,
            std_dev,
            median: percentile_sorted(sorted, 50.0).unwrap_or(f64::NAN),
        }
    }

    /// Span of the finite values, `None` when there are none
    pub fn span(&self) -> Option<Range> {
        (self.count > 0).then(|| Range::new(self.min, self.max))
    }
}

/// Mean and population standard deviation of finite values
///
/// NaN for an empty slice. The mean always lies within the values' span.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    let Some(&first) = values.first() else {
        return (f64::NAN, f64::NAN);
    };
    if values.iter().all(|&x| x == first) {
        return (first, 0.0);
    }

    let (low, high) = values
        .iter()
        .fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    let scale = power_of_two_scale(low.abs().max(high.abs()));

    // Welford's update on the rescaled values
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (k, &x) in values.iter().enumerate() {
        let x = x / scale;
        let delta = x - mean;
        mean += delta / (k + 1) as f64;
        m2 += delta * (x - mean);
    }
    let std_dev = (m2.max(0.0) / values.len() as f64).sqrt() * scale;

    ((mean * scale).clamp(low, high), std_dev.min(f64::MAX))
}

/// Power of two at or just above `largest`, so rescaled values stay near one
fn power_of_two_scale(largest: f64) -> f64 {
    let exponent = largest.log2().ceil().clamp(-1000.0, 1023.0) as i32;
    2f64.powi(exponent)
}

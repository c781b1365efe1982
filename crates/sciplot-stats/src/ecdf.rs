//! Empirical Cumulative Distribution Function (ECDF)
//!
//! The ECDF is a step function that estimates the underlying CDF of a sample.
//! For a sample of n values, ECDF(x) = (number of values <= x) / n.
//! The two-sample Kolmogorov-Smirnov statistic is the largest gap between
//! two ECDFs.

use serde::{Deserialize, Serialize};

/// Empirical Cumulative Distribution Function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ecdf {
    /// Sorted finite values
    values: Vec<f64>,
}

impl Ecdf {
    /// Build an ECDF from data, dropping non-finite values
    ///
    /// Time complexity: O(n log n) for sorting
    pub fn from_data(data: &[f64]) -> Self {
        Self {
            values: crate::quantile::finite_sorted(data),
        }
    }

    /// Evaluate the ECDF at a point
    ///
    /// Returns the proportion of values <= x
    /// Time complexity: O(log n)
    pub fn evaluate(&self, x: f64) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let at_or_below = self.values.partition_point(|&v| v <= x);
        at_or_below as f64 / self.values.len() as f64
    }

    /// Get the quantile (inverse CDF)
    ///
    /// Returns the smallest value x such that ECDF(x) >= p
    pub fn quantile(&self, p: f64) -> Option<f64> {
        if self.values.is_empty() || !(0.0..=1.0).contains(&p) {
            return None;
        }
        let n = self.values.len();
        let rank = (p * n as f64).ceil() as usize;
        Some(self.values[rank.saturating_sub(1).min(n - 1)])
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the ECDF is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the sorted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecdf_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ecdf = Ecdf::from_data(&data);

        assert_eq!(ecdf.len(), 5);
        assert_eq!(ecdf.evaluate(0.0), 0.0);
        assert_eq!(ecdf.evaluate(1.0), 0.2);
        assert_eq!(ecdf.evaluate(3.0), 0.6);
        assert_eq!(ecdf.evaluate(5.0), 1.0);
        assert_eq!(ecdf.evaluate(6.0), 1.0);
    }

    #[test]
    fn test_ecdf_quantiles() {
        let data: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let ecdf = Ecdf::from_data(&data);

        assert_eq!(ecdf.quantile(0.0), Some(1.0));
        assert_eq!(ecdf.quantile(0.5), Some(50.0));
        assert_eq!(ecdf.quantile(1.0), Some(100.0));
        assert_eq!(ecdf.quantile(1.5), None);
    }

    #[test]
    fn test_ecdf_empty() {
        let ecdf = Ecdf::from_data(&[]);
        assert!(ecdf.is_empty());
        assert_eq!(ecdf.evaluate(0.0), 0.0);
        assert!(ecdf.quantile(0.5).is_none());
    }

    #[test]
    fn test_ecdf_drops_nan() {
        let ecdf = Ecdf::from_data(&[1.0, f64::NAN, 2.0]);
        assert_eq!(ecdf.len(), 2);
        assert_eq!(ecdf.evaluate(1.5), 0.5);
    }

    #[test]
    fn test_ecdf_duplicates() {
        let data = vec![1.0, 1.0, 2.0, 2.0, 2.0, 3.0];
        let ecdf = Ecdf::from_data(&data);

        // With 6 values, after sorting: [1,1,2,2,2,3]
        assert!((ecdf.evaluate(1.0) - 2.0 / 6.0).abs() < 1e-10);
        assert!((ecdf.evaluate(2.0) - 5.0 / 6.0).abs() < 1e-10);
    }
}

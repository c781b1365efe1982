//! Box-plot statistics computed up front
//!
//! Figures draw boxes from these precomputed values rather than handing
//! raw samples to a renderer.

use serde::{Deserialize, Serialize};

use crate::error::{validation, StatsResult};
use crate::outliers::OutlierSummary;
use crate::quantile::{finite_sorted, percentile_sorted};
use crate::range::Range;
use crate::summary::mean_std;

/// Precomputed box-plot values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub median: f64,
    /// 25th percentile
    pub q1: f64,
    /// 75th percentile
    pub q3: f64,
    /// Whisker ends
    pub whiskers: Range,
    pub mean: Option<f64>,
    /// Values drawn individually beyond the whiskers
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Box with whiskers at the given percentiles
    ///
    /// `Ok(None)` when the sample has no finite values.
    pub fn from_data(data: &[f64], whisker_percentiles: (f64, f64)) -> StatsResult<Option<Self>> {
        validation::validate_percentile(whisker_percentiles.0)?;
        validation::validate_percentile(whisker_percentiles.1)?;

        let sorted = finite_sorted(data);
        if sorted.is_empty() {
            return Ok(None);
        }
        let pct = |p| percentile_sorted(&sorted, p).unwrap_or(f64::NAN);
        let whiskers = Range::new(pct(whisker_percentiles.0), pct(whisker_percentiles.1));

        Ok(Some(Self {
            median: pct(50.0),
            q1: pct(25.0),
            q3: pct(75.0),
            whiskers,
            mean: Some(mean_std(&sorted).0),
            outliers: Vec::new(),
        }))
    }

    /// Box whose whiskers span a summary's display range
    ///
    /// Quartiles come from `data`; centre and outliers from the summary.
    pub fn from_summary(data: &[f64], summary: &OutlierSummary) -> Option<Self> {
        let sorted = finite_sorted(data);
        if sorted.is_empty() || summary.is_empty() {
            return None;
        }
        let pct = |p| percentile_sorted(&sorted, p).unwrap_or(f64::NAN);

        Some(Self {
            median: summary.stats.median,
            q1: pct(25.0),
            q3: pct(75.0),
            whiskers: summary.range,
            mean: Some(summary.stats.mean),
            outliers: summary.outliers.clone(),
        })
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Quartiles as a range
    pub fn quartiles(&self) -> Range {
        Range::new(self.q1, self.q3)
    }

    /// Hover text listing the box values
    pub fn describe(&self) -> String {
        let mut text = format!("Median={:.3e}", self.median);
        if let Some(mean) = self.mean {
            text.push_str(&format!(" <br> Mean={:.3e}", mean));
        }
        text.push_str(&format!(
            " <br> [Q1,Q3]=[{:.3e},{:.3e}] <br> [min, max]=[{:.3e},{:.3e}]",
            self.q1, self.q3, self.whiskers.low, self.whiskers.high
        ));
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outliers::{summarize, OutlierOptions};

    #[test]
    fn test_from_data() {
        let data: Vec<f64> = (0..=100).map(|x| x as f64).collect();
        let stats = BoxStats::from_data(&data, (5.0, 95.0)).unwrap().unwrap();

        assert_eq!(stats.median, 50.0);
        assert_eq!(stats.q1, 25.0);
        assert_eq!(stats.q3, 75.0);
        assert_eq!(stats.whiskers, Range::new(5.0, 95.0));
        assert_eq!(stats.mean, Some(50.0));
        assert_eq!(stats.iqr(), 50.0);
    }

    #[test]
    fn test_from_data_empty() {
        assert!(BoxStats::from_data(&[f64::NAN], (5.0, 95.0))
            .unwrap()
            .is_none());
        assert!(BoxStats::from_data(&[1.0], (5.0, 195.0)).is_err());
    }

    #[test]
    fn test_from_summary_carries_outliers() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = summarize(&data, &OutlierOptions::removing()).unwrap();
        let stats = BoxStats::from_summary(&data, &summary).unwrap();

        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.whiskers, summary.range);
        assert_eq!(stats.median, 3.5);
    }

    #[test]
    fn test_describe_mentions_values() {
        let stats = BoxStats::from_data(&[1.0, 2.0, 3.0], (0.0, 100.0))
            .unwrap()
            .unwrap();
        let text = stats.describe();
        assert!(text.contains("Median=2.000e0"));
        assert!(text.contains("Mean="));
    }
}

//! Outlier-aware distribution summary
//!
//! Every histogram, box and bar figure starts here. A sample is reduced to
//! its centre and spread, split into inliers and outliers, and given an
//! axis range.
//!
//! Two bounds are kept apart on purpose:
//!
//! - the **clip** bound flags outliers. It is the intersection of
//!   `mean ± k·σ` and the (padded) percentile span, and only exists when
//!   removal is requested.
//! - the **display** range always covers the raw min/max (plus padding), so
//!   an axis never hides data even when statistics de-weight it.
//!
//! Non-finite values are treated as missing. Empty or all-missing samples
//! produce NaN statistics and an [`Range::EMPTY`] range instead of an error.

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};
use crate::quantile::percentile_sorted;
use crate::range::{Range, DEFAULT_PADDING};
use crate::summary::SummaryStats;

/// Parameters for [`summarize`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierOptions {
    /// Standard deviations from the mean beyond which a value is extreme
    pub sigma_bound: f64,
    /// Low/high percentiles of the shape-robust bound
    pub percentile_clip: (f64, f64),
    /// Whether to flag values outside the clip bound as outliers
    pub remove: bool,
}

impl Default for OutlierOptions {
    fn default() -> Self {
        Self {
            sigma_bound: 6.0,
            percentile_clip: (5.0, 95.0),
            remove: false,
        }
    }
}

impl OutlierOptions {
    /// Default bounds with outlier removal switched on
    pub fn removing() -> Self {
        Self::default().with_removal(true)
    }

    pub fn with_sigma_bound(mut self, sigma_bound: f64) -> Self {
        self.sigma_bound = sigma_bound;
        self
    }

    pub fn with_percentile_clip(mut self, low: f64, high: f64) -> Self {
        self.percentile_clip = (low, high);
        self
    }

    pub fn with_removal(mut self, remove: bool) -> Self {
        self.remove = remove;
        self
    }

    /// Reject parameters that would produce a meaningless range
    ///
    /// An infinite sigma bound is accepted and disables sigma clipping.
    pub fn validate(&self) -> StatsResult<()> {
        let (low, high) = self.percentile_clip;
        let in_bounds = |p: f64| (0.0..=100.0).contains(&p);
        if !in_bounds(low) || !in_bounds(high) || low >= high {
            return Err(StatsError::InvalidPercentileClip { low, high });
        }
        if self.sigma_bound.is_nan() || self.sigma_bound <= 0.0 {
            return Err(StatsError::InvalidSigmaBound(self.sigma_bound));
        }
        Ok(())
    }
}

/// Location and spread of the finite values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl CentralStats {
    fn undefined() -> Self {
        Self {
            mean: f64::NAN,
            median: f64::NAN,
            std_dev: f64::NAN,
        }
    }
}

/// Result of [`summarize`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    /// Bound used to flag outliers; `None` when removal is off
    pub clip: Option<Range>,
    /// Finite values inside the clip bound, in sample order
    pub inliers: Vec<f64>,
    /// Finite values outside the clip bound, in sample order
    pub outliers: Vec<f64>,
    /// Sample positions of `inliers`
    pub inlier_indices: Vec<usize>,
    /// Sample positions of `outliers`
    pub outlier_indices: Vec<usize>,
    /// Padded axis range covering every finite value
    pub range: Range,
    pub stats: CentralStats,
    /// Number of non-finite values dropped
    pub missing: usize,
}

impl OutlierSummary {
    fn degenerate(missing: usize) -> Self {
        Self {
            clip: None,
            inliers: Vec::new(),
            outliers: Vec::new(),
            inlier_indices: Vec::new(),
            outlier_indices: Vec::new(),
            range: Range::EMPTY,
            stats: CentralStats::undefined(),
            missing,
        }
    }

    /// Number of finite values
    pub fn len(&self) -> usize {
        self.inliers.len() + self.outliers.len()
    }

    /// True when the sample had no finite values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any value was flagged
    pub fn has_outliers(&self) -> bool {
        !self.outliers.is_empty()
    }

    /// Span of the inliers only, `None` if there are none
    pub fn inlier_range(&self) -> Option<Range> {
        Range::of_finite(&self.inliers)
    }
}

/// Summarize a sample and partition it into inliers and outliers
pub fn summarize(sample: &[f64], options: &OutlierOptions) -> StatsResult<OutlierSummary> {
    options.validate()?;

    let finite: Vec<(usize, f64)> = sample
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, x)| x.is_finite())
        .collect();
    let missing = sample.len() - finite.len();

    if finite.is_empty() {
        return Ok(OutlierSummary::degenerate(missing));
    }

    let mut sorted: Vec<f64> = finite.iter().map(|&(_, x)| x).collect();
    sorted.sort_by(f64::total_cmp);

    let moments = SummaryStats::from_sorted(&sorted, missing);
    let raw = Range::new(moments.min, moments.max);

    let clip = options
        .remove
        .then(|| clip_bound(&sorted, moments.mean, moments.std_dev, options));

    let mut summary = OutlierSummary {
        clip,
        inliers: Vec::with_capacity(finite.len()),
        outliers: Vec::new(),
        inlier_indices: Vec::with_capacity(finite.len()),
        outlier_indices: Vec::new(),
        range: Range::EMPTY,
        stats: CentralStats {
            mean: moments.mean,
            median: moments.median,
            std_dev: moments.std_dev,
        },
        missing,
    };

    for (idx, x) in finite {
        if clip.map_or(true, |c| c.contains(x)) {
            summary.inliers.push(x);
            summary.inlier_indices.push(idx);
        } else {
            summary.outliers.push(x);
            summary.outlier_indices.push(idx);
        }
    }

    let covered = clip.map_or(raw, |c| raw.union(&c));
    summary.range = covered.extend(DEFAULT_PADDING);

    Ok(summary)
}

/// Tighter of the sigma bound and the padded percentile span
fn clip_bound(sorted: &[f64], mean: f64, std_dev: f64, options: &OutlierOptions) -> Range {
    let (p_low, p_high) = options.percentile_clip;
    let low = percentile_sorted(sorted, p_low).unwrap_or(sorted[0]);
    let high = percentile_sorted(sorted, p_high).unwrap_or(sorted[sorted.len() - 1]);
    let percentile_bound = Range::new(low, high).extend(DEFAULT_PADDING);

    // A constant sample has no sigma bound; the percentile span decides alone
    if std_dev <= 0.0 || !std_dev.is_finite() {
        return percentile_bound;
    }

    let reach = options.sigma_bound * std_dev;
    let sigma_bound = Range::new(mean - reach, mean + reach);

    percentile_bound
        .intersect(&sigma_bound)
        .unwrap_or(percentile_bound)
}

/// Summarize several samples with the same options
#[cfg(feature = "parallel")]
pub fn summarize_many(
    samples: &[Vec<f64>],
    options: &OutlierOptions,
) -> StatsResult<Vec<OutlierSummary>> {
    use rayon::prelude::*;

    options.validate()?;
    samples
        .par_iter()
        .map(|sample| summarize(sample, options))
        .collect()
}

/// Summarize several samples with the same options
#[cfg(not(feature = "parallel"))]
pub fn summarize_many(
    samples: &[Vec<f64>],
    options: &OutlierOptions,
) -> StatsResult<Vec<OutlierSummary>> {
    options.validate()?;
    samples
        .iter()
        .map(|sample| summarize(sample, options))
        .collect()
}

//! Histogram binning
//!
//! 1D histograms use `n` equal-width bins over a range (or explicit edges).
//! Every bin is half-open `[a, b)` except the last, which also includes its
//! right edge. Values outside the edges are ignored.
//!
//! 2D histograms clip each axis to a percentile span when the axis has
//! values far outside its bulk, so a handful of extreme points cannot
//! squash the heatmap into one cell.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{validation, StatsError, StatsResult};
use crate::quantile::{finite_sorted, percentile_sorted};
use crate::range::Range;
use crate::summary::mean_std;

/// How to bin a histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BinSpec {
    /// Number of equal-width bins over the range
    Count(usize),
    /// Explicit, strictly increasing bin edges
    Edges(Vec<f64>),
}

impl From<usize> for BinSpec {
    fn from(n: usize) -> Self {
        BinSpec::Count(n)
    }
}

/// A 1D histogram
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
    density: bool,
}

impl Histogram {
    /// Bin the finite values of `data`
    ///
    /// `range` applies to [`BinSpec::Count`] only; it defaults to the data's
    /// span and a zero-width span is widened by 0.5 on each side.
    /// With `density` the values integrate to one over the range.
    pub fn compute(
        data: &[f64],
        bins: &BinSpec,
        range: Option<Range>,
        density: bool,
    ) -> StatsResult<Self> {
        let edges = match bins {
            BinSpec::Count(0) => {
                return Err(StatsError::InvalidBins("bin count must be positive".into()))
            }
            BinSpec::Count(n) => {
                let range = match range {
                    Some(r) => {
                        if !r.low.is_finite() || !r.high.is_finite() || r.low > r.high {
                            return Err(StatsError::InvalidRange {
                                low: r.low,
                                high: r.high,
                            });
                        }
                        r
                    }
                    None => Range::of_finite(data).unwrap_or(Range::new(0.0, 1.0)),
                };
                let range = if range.width() == 0.0 {
                    Range::new(range.low - 0.5, range.high + 0.5)
                } else {
                    range
                };
                range.linspace(n + 1)
            }
            BinSpec::Edges(edges) => {
                validate_edges(edges)?;
                edges.clone()
            }
        };

        let mut counts = vec![0u64; edges.len() - 1];
        for x in data.iter().copied().filter(|x| x.is_finite()) {
            if let Some(idx) = bin_index(&edges, x) {
                counts[idx] += 1;
            }
        }

        Ok(Self {
            edges,
            counts,
            density,
        })
    }

    /// Bin edges (one more than the number of bins)
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Raw counts per bin
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Values inside the edges
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Bin midpoints
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| w[0] / 2.0 + w[1] / 2.0).collect()
    }

    /// Bin widths
    pub fn widths(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Plotted bar heights: probability density or counts
    pub fn values(&self) -> Vec<f64> {
        if !self.density {
            return self.counts.iter().map(|&c| c as f64).collect();
        }
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts
            .iter()
            .zip(self.widths())
            .map(|(&c, w)| c as f64 / (total as f64 * w))
            .collect()
    }

    /// Tallest bar
    pub fn max_value(&self) -> f64 {
        self.values().into_iter().fold(0.0, f64::max)
    }

    /// Whether values are densities
    pub fn is_density(&self) -> bool {
        self.density
    }
}

fn validate_edges(edges: &[f64]) -> StatsResult<()> {
    if edges.len() < 2 {
        return Err(StatsError::InvalidBins(
            "need at least two bin edges".into(),
        ));
    }
    if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[0] >= w[1]) {
        return Err(StatsError::InvalidBins(
            "bin edges must be finite and strictly increasing".into(),
        ));
    }
    Ok(())
}

/// Bin containing `x`, with the last bin closed on the right
fn bin_index(edges: &[f64], x: f64) -> Option<usize> {
    let n_bins = edges.len() - 1;
    if x < edges[0] || x > edges[n_bins] {
        return None;
    }
    let idx = edges.partition_point(|&e| e <= x).saturating_sub(1);
    Some(idx.min(n_bins - 1))
}

/// Axis clipping rule for 2D histograms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hist2dOptions {
    /// An axis is clipped when any value lies beyond `mean ± clip_sigma·σ`
    pub clip_sigma: f64,
    /// Span used for a clipped axis
    pub percentile_clip: (f64, f64),
}

impl Default for Hist2dOptions {
    fn default() -> Self {
        Self {
            clip_sigma: 8.0,
            percentile_clip: (5.0, 95.0),
        }
    }
}

/// A 2D histogram; `counts[[row, col]]` holds y bin `row`, x bin `col`
#[derive(Debug, Clone)]
pub struct Histogram2d {
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    pub counts: Array2<f64>,
}

impl Histogram2d {
    /// Bin paired samples into `bins.0` x-bins and `bins.1` y-bins
    ///
    /// Pairs with a non-finite coordinate are dropped.
    pub fn compute(
        x: &[f64],
        y: &[f64],
        bins: (usize, usize),
        options: &Hist2dOptions,
    ) -> StatsResult<Self> {
        validation::validate_paired(x.len(), y.len())?;
        if bins.0 == 0 || bins.1 == 0 {
            return Err(StatsError::InvalidBins("bin count must be positive".into()));
        }
        validation::validate_percentile(options.percentile_clip.0)?;
        validation::validate_percentile(options.percentile_clip.1)?;

        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y)
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .map(|(&a, &b)| (a, b))
            .unzip();
        validation::validate_min_len(xs.len(), 1)?;

        let x_edges = axis_range(&xs, options).linspace(bins.0 + 1);
        let y_edges = axis_range(&ys, options).linspace(bins.1 + 1);

        let mut counts = Array2::<f64>::zeros((bins.1, bins.0));
        for (&a, &b) in xs.iter().zip(&ys) {
            if let (Some(col), Some(row)) = (bin_index(&x_edges, a), bin_index(&y_edges, b)) {
                counts[[row, col]] += 1.0;
            }
        }

        Ok(Self {
            x_edges,
            y_edges,
            counts,
        })
    }

    /// log10 of the counts; empty cells become NaN
    pub fn log_counts(&self) -> Array2<f64> {
        self.counts
            .mapv(|c| if c > 0.0 { c.log10() } else { f64::NAN })
    }

    /// x bin midpoints
    pub fn x_centers(&self) -> Vec<f64> {
        self.x_edges.windows(2).map(|w| w[0] / 2.0 + w[1] / 2.0).collect()
    }

    /// y bin midpoints
    pub fn y_centers(&self) -> Vec<f64> {
        self.y_edges.windows(2).map(|w| w[0] / 2.0 + w[1] / 2.0).collect()
    }

    /// Count-weighted mean y in every x column; NaN for empty columns
    pub fn conditional_mean(&self) -> Vec<f64> {
        let y_centers = self.y_centers();
        self.counts
            .columns()
            .into_iter()
            .map(|col| {
                let total: f64 = col.sum();
                if total == 0.0 {
                    return f64::NAN;
                }
                col.iter().zip(&y_centers).map(|(c, y)| c * y).sum::<f64>() / total
            })
            .collect()
    }
}

/// Full span, or the percentile span when the axis has far outliers
fn axis_range(values: &[f64], options: &Hist2dOptions) -> Range {
    let sorted = finite_sorted(values);
    let (mean, std_dev) = mean_std(&sorted);
    let full = Range::new(sorted[0], sorted[sorted.len() - 1]);

    let reach = options.clip_sigma * std_dev;
    let far_outliers = mean + reach < full.high || mean - reach > full.low;

    let range = if far_outliers {
        let (lo, hi) = options.percentile_clip;
        Range::new(
            percentile_sorted(&sorted, lo).unwrap_or(full.low),
            percentile_sorted(&sorted, hi).unwrap_or(full.high),
        )
    } else {
        full
    };

    if range.width() == 0.0 {
        Range::new(range.low - 0.5, range.high + 0.5)
    } else {
        range
    }
}

//! sciplot-stats - Statistical primitives for scientific plotting
//!
//! The centerpiece is [`outliers::summarize`], which partitions a sample
//! into inliers and outliers using a percentile clip combined with a sigma
//! bound, and reports a padded display range for the axis.
//!
//! - **Outliers**: inlier/outlier partition, clip bounds, display range
//! - **Summary**: overflow-safe mean and standard deviation
//! - **Quantiles**: linear-interpolated percentiles over finite values
//! - **Box stats**: quartiles and whiskers for box plots
//! - **Histograms**: 1D and 2D binning with density normalization
//! - **Correlation**: Pearson, Spearman, least-squares line fits
//! - **Hypothesis tests**: t-tests, Mann-Whitney U, Wilcoxon, Kolmogorov-Smirnov
//! - **Classification**: ROC and precision-recall curves, confusion matrices
//!
//! # Missing values
//!
//! NaN and infinite values are treated as missing throughout. They never
//! count as outliers and never move a range or a percentile.

pub mod box_stats;
pub mod classify;
pub mod correlation;
pub mod ecdf;
pub mod error;
pub mod histogram;
pub mod hypothesis;
pub mod normalize;
pub mod outliers;
pub mod quantile;
pub mod range;
pub mod special;
pub mod summary;

pub use box_stats::BoxStats;
pub use classify::{
    auc, precision_recall_curve, roc_curve, threshold_metrics, ConfusionMatrix, NormAxis, PrCurve,
    RocCurve, ThresholdMetrics,
};
pub use correlation::{linregress, pearson, spearman, Correlation, LinearFit};
pub use ecdf::Ecdf;
pub use error::{StatsError, StatsResult};
pub use histogram::{BinSpec, Hist2dOptions, Histogram, Histogram2d};
pub use hypothesis::{
    ks_2samp, mann_whitney_u, ttest_1samp, ttest_ind, wilcoxon, Alternative, TestResult,
};
pub use normalize::{normalize_rows, NormMethod};
pub use outliers::{summarize, summarize_many, CentralStats, OutlierOptions, OutlierSummary};
pub use quantile::{median, percentile, percentiles};
pub use range::{Range, DEFAULT_PADDING};
pub use summary::{mean_std, SummaryStats};

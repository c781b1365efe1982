//! Classifier evaluation: ROC and precision-recall curves, confusion matrices
//!
//! Curves are computed from binary labels and real-valued scores. A sample
//! is predicted positive when its score is at or above the threshold for
//! curve points, and strictly above it for [`threshold_metrics`].

use ndarray::{array, s, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{validation, StatsError, StatsResult};

/// Receiver operating characteristic curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    /// Score threshold of each point; the first is +inf
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Area under the curve
    pub fn auc(&self) -> f64 {
        trapezoid(&self.fpr, &self.tpr)
    }

    /// Resample onto `n_points` evenly spaced TPR targets
    ///
    /// Each target takes the first point reaching that TPR. The result
    /// gains explicit (0, 0) and (1, 1) end points.
    pub fn resample(&self, n_points: usize) -> RocCurve {
        let last = self.tpr.len().saturating_sub(1);
        let mut out = RocCurve {
            fpr: vec![0.0],
            tpr: vec![0.0],
            thresholds: vec![f64::INFINITY],
        };
        for i in 0..n_points {
            let target = if n_points > 1 {
                i as f64 / (n_points - 1) as f64
            } else {
                0.0
            };
            let idx = self.tpr.partition_point(|&t| t < target).min(last);
            out.fpr.push(self.fpr[idx]);
            out.tpr.push(self.tpr[idx]);
            out.thresholds.push(self.thresholds[idx]);
        }
        out.fpr.push(1.0);
        out.tpr.push(1.0);
        out.thresholds.push(f64::NEG_INFINITY);
        out
    }

    /// Index of the point whose threshold is closest to `threshold`
    pub fn nearest_threshold(&self, threshold: f64) -> Option<usize> {
        self.thresholds
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_finite())
            .min_by(|(_, a), (_, b)| (*a - threshold).abs().total_cmp(&(*b - threshold).abs()))
            .map(|(i, _)| i)
    }
}

/// Precision-recall curve, ordered by increasing threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrCurve {
    /// One longer than `thresholds`; ends at 1
    pub precision: Vec<f64>,
    /// One longer than `thresholds`; ends at 0
    pub recall: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl PrCurve {
    /// Average precision: precision weighted by each recall increment
    pub fn average_precision(&self) -> f64 {
        let mut previous_recall = 0.0;
        let mut ap = 0.0;
        for (p, r) in self.precision.iter().zip(&self.recall).rev() {
            ap += (r - previous_recall) * p;
            previous_recall = *r;
        }
        ap
    }
}

/// Accuracy and F1 at a single threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdMetrics {
    pub threshold: f64,
    pub accuracy: f64,
    pub f1: f64,
}

/// Cumulative (fp, tp, threshold) at each distinct score, highest first,
/// plus the positive and negative totals
type CurvePoints = (Vec<(f64, f64, f64)>, f64, f64);

fn cumulative_counts(y_true: &[bool], scores: &[f64]) -> StatsResult<CurvePoints> {
    validation::validate_paired(y_true.len(), scores.len())?;

    let mut pairs: Vec<(f64, bool)> = scores
        .iter()
        .zip(y_true)
        .filter(|(s, _)| s.is_finite())
        .map(|(&s, &y)| (s, y))
        .collect();
    let positives = pairs.iter().filter(|(_, y)| *y).count() as f64;
    let negatives = pairs.len() as f64 - positives;
    if positives == 0.0 || negatives == 0.0 {
        return Err(StatsError::SingleClass);
    }

    pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut points = Vec::new();
    let (mut tp, mut fp) = (0.0, 0.0);
    for (i, &(score, label)) in pairs.iter().enumerate() {
        if label {
            tp += 1.0;
        } else {
            fp += 1.0;
        }
        let group_ends = pairs.get(i + 1).map_or(true, |next| next.0 != score);
        if group_ends {
            points.push((fp, tp, score));
        }
    }
    Ok((points, positives, negatives))
}

/// ROC curve from binary labels and scores
pub fn roc_curve(y_true: &[bool], scores: &[f64]) -> StatsResult<RocCurve> {
    let (points, positives, negatives) = cumulative_counts(y_true, scores)?;

    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };
    for (fp, tp, threshold) in points {
        curve.fpr.push(fp / negatives);
        curve.tpr.push(tp / positives);
        curve.thresholds.push(threshold);
    }
    Ok(curve)
}

/// Precision-recall curve from binary labels and scores
///
/// Thresholds below the one first reaching full recall are dropped.
pub fn precision_recall_curve(y_true: &[bool], scores: &[f64]) -> StatsResult<PrCurve> {
    let (points, positives, _) = cumulative_counts(y_true, scores)?;

    let mut precision = Vec::new();
    let mut recall = Vec::new();
    let mut thresholds = Vec::new();
    for (fp, tp, threshold) in points {
        precision.push(tp / (tp + fp));
        recall.push(tp / positives);
        thresholds.push(threshold);
        if tp == positives {
            break;
        }
    }

    precision.reverse();
    recall.reverse();
    thresholds.reverse();
    precision.push(1.0);
    recall.push(0.0);

    Ok(PrCurve {
        precision,
        recall,
        thresholds,
    })
}

/// Accuracy and F1 when predicting positive for `score > threshold`
pub fn threshold_metrics(
    y_true: &[bool],
    scores: &[f64],
    threshold: f64,
) -> StatsResult<ThresholdMetrics> {
    validation::validate_paired(y_true.len(), scores.len())?;
    validation::validate_min_len(y_true.len(), 1)?;

    let (mut tp, mut fp, mut fn_, mut tn) = (0.0, 0.0, 0.0, 0.0);
    for (&y, &s) in y_true.iter().zip(scores) {
        match (y, s > threshold) {
            (true, true) => tp += 1.0,
            (false, true) => fp += 1.0,
            (true, false) => fn_ += 1.0,
            (false, false) => tn += 1.0,
        }
    }
    let f1_denom = 2.0 * tp + fp + fn_;

    Ok(ThresholdMetrics {
        threshold,
        accuracy: (tp + tn) / y_true.len() as f64,
        f1: if f1_denom > 0.0 { 2.0 * tp / f1_denom } else { 0.0 },
    })
}

/// Trapezoidal area under y(x)
///
/// `x` must be monotonic; a decreasing `x` still yields a positive area.
pub fn auc(x: &[f64], y: &[f64]) -> StatsResult<f64> {
    validation::validate_paired(x.len(), y.len())?;
    validation::validate_min_len(x.len(), 2)?;

    let increasing = x.windows(2).all(|w| w[0] <= w[1]);
    let decreasing = x.windows(2).all(|w| w[0] >= w[1]);
    if !increasing && !decreasing {
        return Err(StatsError::NonMonotonic);
    }
    Ok(trapezoid(x, y).abs())
}

fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

/// Which totals a confusion matrix is normalized by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormAxis {
    /// Each row sums to one (per true class)
    #[default]
    Rows,
    /// Each column sums to one (per predicted class)
    Columns,
    /// The whole matrix sums to one
    All,
}

/// Confusion matrix; rows are true classes, columns predicted classes
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    counts: Array2<u64>,
}

impl ConfusionMatrix {
    /// Tally label pairs into an `n_classes` square matrix
    pub fn from_labels(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> StatsResult<Self> {
        validation::validate_paired(y_true.len(), y_pred.len())?;

        let mut counts = Array2::<u64>::zeros((n_classes, n_classes));
        for (&t, &p) in y_true.iter().zip(y_pred) {
            for class in [t, p] {
                if class >= n_classes {
                    return Err(StatsError::ClassOutOfRange { class, n_classes });
                }
            }
            counts[[t, p]] += 1;
        }
        Ok(Self { counts })
    }

    /// Wrap an existing square count matrix
    pub fn from_counts(counts: Array2<u64>) -> StatsResult<Self> {
        let (rows, cols) = counts.dim();
        validation::validate_paired(rows, cols)?;
        Ok(Self { counts })
    }

    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    pub fn n_classes(&self) -> usize {
        self.counts.nrows()
    }

    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    /// Fraction of samples on the diagonal; 0 for an empty matrix
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.counts.diag().sum() as f64 / total as f64
    }

    /// Collapse to class `k` against the rest: `[[tp, fn], [fp, tn]]`
    pub fn one_vs_rest(&self, k: usize) -> StatsResult<ConfusionMatrix> {
        let n_classes = self.n_classes();
        if k >= n_classes {
            return Err(StatsError::ClassOutOfRange { class: k, n_classes });
        }
        let tp = self.counts[[k, k]];
        let fn_ = self.counts.row(k).sum() - tp;
        let fp = self.counts.column(k).sum() - tp;
        let tn = self.total() - tp - fn_ - fp;
        Ok(Self {
            counts: array![[tp, fn_], [fp, tn]],
        })
    }

    /// Counts with an extra totals row and column
    pub fn with_totals(&self) -> Array2<u64> {
        let n = self.n_classes();
        let mut out = Array2::<u64>::zeros((n + 1, n + 1));
        out.slice_mut(s![..n, ..n]).assign(&self.counts);
        for i in 0..n {
            out[[i, n]] = self.counts.row(i).sum();
            out[[n, i]] = self.counts.column(i).sum();
        }
        out[[n, n]] = self.total();
        out
    }

    /// Counts scaled by row, column or grand totals; zero totals give 0
    pub fn normalized(&self, axis: NormAxis) -> Array2<f64> {
        normalize_counts(&self.counts.mapv(|c| c as f64), axis)
    }
}

/// Scale a count matrix by row, column or grand totals
pub fn normalize_counts(counts: &Array2<f64>, axis: NormAxis) -> Array2<f64> {
    let safe_div = |c: f64, total: f64| if total > 0.0 { c / total } else { 0.0 };
    let mut out = counts.clone();
    match axis {
        NormAxis::Rows => {
            for mut row in out.axis_iter_mut(Axis(0)) {
                let total = row.sum();
                row.mapv_inplace(|c| safe_div(c, total));
            }
        }
        NormAxis::Columns => {
            for mut col in out.axis_iter_mut(Axis(1)) {
                let total = col.sum();
                col.mapv_inplace(|c| safe_div(c, total));
            }
        }
        NormAxis::All => {
            let total = counts.sum();
            out.mapv_inplace(|c| safe_div(c, total));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> (Vec<bool>, Vec<f64>) {
        (
            vec![false, false, true, true],
            vec![0.1, 0.4, 0.35, 0.8],
        )
    }

    #[test]
    fn test_roc_curve_and_auc() {
        let (y, s) = labels();
        let roc = roc_curve(&y, &s).unwrap();

        assert_eq!(roc.fpr, vec![0.0, 0.0, 0.5, 0.5, 1.0]);
        assert_eq!(roc.tpr, vec![0.0, 0.5, 0.5, 1.0, 1.0]);
        assert_eq!(roc.thresholds[0], f64::INFINITY);
        assert!((roc.auc() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_roc_single_class() {
        assert_eq!(
            roc_curve(&[true, true], &[0.1, 0.2]),
            Err(StatsError::SingleClass)
        );
    }

    #[test]
    fn test_roc_tied_scores_share_point() {
        let roc = roc_curve(&[true, false, true], &[0.5, 0.5, 0.1]).unwrap();
        assert_eq!(roc.fpr.len(), 3);
        assert_eq!(roc.tpr[1], 0.5);
        assert_eq!(roc.fpr[1], 1.0);
    }

    #[test]
    fn test_roc_resample_adds_end_points() {
        let (y, s) = labels();
        let resampled = roc_curve(&y, &s).unwrap().resample(5);
        assert_eq!(resampled.fpr.len(), 7);
        assert_eq!(resampled.fpr[0], 0.0);
        assert_eq!(*resampled.tpr.last().unwrap(), 1.0);
        assert!(resampled.tpr.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_nearest_threshold() {
        let (y, s) = labels();
        let roc = roc_curve(&y, &s).unwrap();
        let idx = roc.nearest_threshold(0.38).unwrap();
        assert_eq!(roc.thresholds[idx], 0.4);
    }

    #[test]
    fn test_precision_recall_curve() {
        let (y, s) = labels();
        let pr = precision_recall_curve(&y, &s).unwrap();

        assert_eq!(pr.thresholds, vec![0.35, 0.4, 0.8]);
        assert_eq!(pr.recall, vec![1.0, 0.5, 0.5, 0.0]);
        assert!((pr.precision[0] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(*pr.precision.last().unwrap(), 1.0);
        // 0.5 * 1.0 + 0.5 * 2/3
        assert!((pr.average_precision() - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_metrics() {
        let (y, s) = labels();
        let m = threshold_metrics(&y, &s, 0.3).unwrap();
        // predicted positive: 0.4, 0.35, 0.8
        assert_eq!(m.accuracy, 0.75);
        assert!((m.f1 - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_auc_direction_and_monotonic() {
        assert_eq!(auc(&[0.0, 1.0], &[1.0, 1.0]).unwrap(), 1.0);
        assert_eq!(auc(&[1.0, 0.0], &[1.0, 1.0]).unwrap(), 1.0);
        assert_eq!(
            auc(&[0.0, 1.0, 0.5], &[1.0, 1.0, 1.0]),
            Err(StatsError::NonMonotonic)
        );
    }

    #[test]
    fn test_confusion_matrix() {
        let cm = ConfusionMatrix::from_labels(&[0, 0, 1, 2, 2], &[0, 1, 1, 2, 0], 3).unwrap();
        assert_eq!(cm.counts(), &array![[1, 1, 0], [0, 1, 0], [1, 0, 1]]);
        assert!((cm.accuracy() - 0.6).abs() < 1e-12);

        let totals = cm.with_totals();
        assert_eq!(totals.dim(), (4, 4));
        assert_eq!(totals[[0, 3]], 2);
        assert_eq!(totals[[3, 0]], 2);
        assert_eq!(totals[[3, 3]], 5);
    }

    #[test]
    fn test_confusion_out_of_range() {
        assert_eq!(
            ConfusionMatrix::from_labels(&[0, 3], &[0, 1], 3),
            Err(StatsError::ClassOutOfRange {
                class: 3,
                n_classes: 3
            })
        );
    }

    #[test]
    fn test_one_vs_rest() {
        let cm = ConfusionMatrix::from_labels(&[0, 0, 1, 2, 2], &[0, 1, 1, 2, 0], 3).unwrap();
        let binary = cm.one_vs_rest(0).unwrap();
        // tp 1, fn 1, fp 1, tn 2
        assert_eq!(binary.counts(), &array![[1, 1], [1, 2]]);
        assert!(cm.one_vs_rest(5).is_err());
    }

    #[test]
    fn test_normalized_zero_rows() {
        let cm = ConfusionMatrix::from_counts(array![[2, 2], [0, 0]]).unwrap();
        let rows = cm.normalized(NormAxis::Rows);
        assert_eq!(rows, array![[0.5, 0.5], [0.0, 0.0]]);

        let cols = cm.normalized(NormAxis::Columns);
        assert_eq!(cols, array![[1.0, 1.0], [0.0, 0.0]]);

        let all = cm.normalized(NormAxis::All);
        assert_eq!(all.sum(), 1.0);
    }
}

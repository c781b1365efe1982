//! ROC and precision-recall figures, one curve per class column
//!
//! Labels and scores are `[n_samples, n_classes]` matrices. Use
//! [`one_hot`] to expand integer class labels for a multi-class
//! classifier, or repeat one label column per trial to compare several
//! score sets against the same truth.

use ndarray::Array2;
use sciplot_stats::{precision_recall_curve, roc_curve, threshold_metrics, Range};

use super::optional_stat;
use crate::axis::AxisSpec;
use crate::error::{PlotError, PlotResult};
use crate::figure::{Dash, Figure, Layout, LineStyle, Marker, ScatterTrace};

/// Options for [`roc_figure`] and [`pr_figure`]
#[derive(Debug, Clone, PartialEq)]
pub struct RocOptions {
    /// Figure title; each figure has its own default
    pub title: Option<String>,
    /// Class labels; defaults to "C1", "C2", ...
    pub labels: Option<Vec<String>>,
    /// Resample ROC curves onto this many TPR steps
    pub n_points: Option<usize>,
    /// Mark the point of each curve nearest this threshold
    pub threshold_dot: Option<f64>,
    /// Hover text with accuracy and F1 at every threshold
    pub metrics: bool,
}

impl Default for RocOptions {
    fn default() -> Self {
        Self {
            title: None,
            labels: None,
            n_points: Some(100),
            threshold_dot: None,
            metrics: true,
        }
    }
}

/// One boolean column per class for integer labels
pub fn one_hot(labels: &[usize], n_classes: usize) -> PlotResult<Array2<bool>> {
    let mut out = Array2::from_elem((labels.len(), n_classes), false);
    for (row, &class) in labels.iter().enumerate() {
        if class >= n_classes {
            return Err(PlotError::InvalidConfig(format!(
                "class {} out of range for {} classes",
                class, n_classes
            )));
        }
        out[[row, class]] = true;
    }
    Ok(out)
}

fn check_shapes(y_true: &Array2<bool>, scores: &Array2<f64>) -> PlotResult<()> {
    if y_true.dim() != scores.dim() {
        return Err(PlotError::ShapeMismatch {
            what: "labels and scores".to_string(),
            expected: format!("{:?}", scores.dim()),
            actual: format!("{:?}", y_true.dim()),
        });
    }
    if scores.ncols() == 0 {
        return Err(PlotError::EmptyInput("no class columns".to_string()));
    }
    Ok(())
}

fn class_labels(options: &RocOptions, n_classes: usize) -> Vec<String> {
    match &options.labels {
        Some(labels) if labels.len() == n_classes => labels.clone(),
        Some(labels) => {
            tracing::warn!(
                "Have {} labels for {} classes, using default labels",
                labels.len(),
                n_classes
            );
            (1..=n_classes).map(|i| format!("C{}", i)).collect()
        }
        None => (1..=n_classes).map(|i| format!("C{}", i)).collect(),
    }
}

/// Hover text for each threshold
fn threshold_text(y: &[bool], scores: &[f64], thresholds: &[f64], metrics: bool) -> Vec<String> {
    thresholds
        .iter()
        .map(|&t| match threshold_metrics(y, scores, t) {
            Ok(m) if metrics => format!("T={:.4}. Acc={:.4}. F1={:.4}", t, m.accuracy, m.f1),
            _ => format!("T={:.4}", t),
        })
        .collect()
}

fn threshold_marker(x: f64, y: f64, group: &str) -> ScatterTrace {
    ScatterTrace::markers(vec![x], vec![y])
        .named("Threshold")
        .in_group(group)
        .with_marker(Marker::default().with_size(8.0))
}

/// ROC curve per class column with its AUC in the legend
///
/// A column with only one class present cannot form a curve; it is
/// skipped and noted on the figure.
pub fn roc_figure(
    y_true: &Array2<bool>,
    scores: &Array2<f64>,
    options: &RocOptions,
) -> PlotResult<Figure> {
    check_shapes(y_true, scores)?;
    let labels = class_labels(options, scores.ncols());
    let title = options
        .title
        .clone()
        .unwrap_or_else(|| "Multiclass ROC Plot".to_string());
    let mut figure = Figure::new(title);

    for (i, label) in labels.iter().enumerate() {
        let y = y_true.column(i).to_vec();
        let s = scores.column(i).to_vec();
        let what = format!("ROC curve for {}", label);
        let Some(curve) = optional_stat(&mut figure, &what, roc_curve(&y, &s)) else {
            continue;
        };
        let auc = curve.auc();
        let curve = match options.n_points {
            Some(n) => curve.resample(n),
            None => curve,
        };

        let group = i.to_string();
        let mut trace = ScatterTrace::line(
            curve.fpr.clone(),
            curve.tpr.clone(),
            LineStyle::new(1.0),
        )
        .named(format!("{}. AUC= {:.2}", label, auc))
        .in_group(group.clone())
        .with_legend(true);
        trace.text = Some(threshold_text(&y, &s, &curve.thresholds, options.metrics));
        figure.push(trace);

        if let Some(t) = options.threshold_dot {
            if let Some(idx) = curve.nearest_threshold(t) {
                figure.push(threshold_marker(curve.fpr[idx], curve.tpr[idx], &group));
            }
        }
    }

    figure.push(
        ScatterTrace::line(
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            LineStyle::new(1.0).with_dash(Dash::Dot),
        )
        .named("Random classifier")
        .with_legend(true),
    );

    figure.layout = Layout {
        x_axis: AxisSpec::new().with_title("FPR"),
        y_axis: AxisSpec::new().with_title("TPR"),
        ..Default::default()
    };

    Ok(figure)
}

/// Precision-recall curve per class column with its average precision
pub fn pr_figure(
    y_true: &Array2<bool>,
    scores: &Array2<f64>,
    options: &RocOptions,
) -> PlotResult<Figure> {
    check_shapes(y_true, scores)?;
    let labels = class_labels(options, scores.ncols());
    let title = options
        .title
        .clone()
        .unwrap_or_else(|| "Multiclass PR Plot".to_string());
    let mut figure = Figure::new(title);

    for (i, label) in labels.iter().enumerate() {
        let y = y_true.column(i).to_vec();
        let s = scores.column(i).to_vec();
        let what = format!("PR curve for {}", label);
        let Some(curve) = optional_stat(&mut figure, &what, precision_recall_curve(&y, &s))
        else {
            continue;
        };

        // The final (recall 0, precision 1) point has no threshold of its own
        let mut thresholds = curve.thresholds.clone();
        thresholds.push(f64::INFINITY);

        let group = i.to_string();
        let mut trace = ScatterTrace::line(
            curve.recall.clone(),
            curve.precision.clone(),
            LineStyle::new(1.0),
        )
        .named(format!("{}. AP= {:.2}", label, curve.average_precision()))
        .in_group(group.clone())
        .with_legend(true);
        trace.text = Some(threshold_text(&y, &s, &thresholds, options.metrics));
        figure.push(trace);

        if let Some(t) = options.threshold_dot {
            let nearest = thresholds
                .iter()
                .enumerate()
                .filter(|(_, th)| th.is_finite())
                .min_by(|(_, a), (_, b)| (*a - t).abs().total_cmp(&(*b - t).abs()))
                .map(|(idx, _)| idx);
            if let Some(idx) = nearest {
                figure.push(threshold_marker(curve.recall[idx], curve.precision[idx], &group));
            }
        }
    }

    let unit = Range::new(0.0, 1.0);
    figure.layout = Layout {
        x_axis: AxisSpec::new()
            .with_title("Recall = TPR = P(yp=1 | y=1)")
            .with_range(unit),
        y_axis: AxisSpec::new()
            .with_title("Precision = P(y=1 | yp=1)")
            .with_range(unit),
        ..Default::default()
    };

    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn binary() -> (Array2<bool>, Array2<f64>) {
        (
            array![[false], [false], [true], [true]],
            array![[0.1], [0.4], [0.35], [0.8]],
        )
    }

    #[test]
    fn test_roc_figure() {
        let (y, s) = binary();
        let options = RocOptions {
            threshold_dot: Some(0.4),
            ..Default::default()
        };
        let fig = roc_figure(&y, &s, &options).unwrap();

        let curve = fig.trace_named("C1. AUC= 0.75").unwrap().as_scatter().unwrap();
        // 100 resampled points plus both end points
        assert_eq!(curve.x.len(), 102);
        assert_eq!(curve.text.as_ref().unwrap().len(), 102);
        assert!(fig.trace_named("Random classifier").is_some());
        assert!(fig.trace_named("Threshold").is_some());
        assert_eq!(fig.layout.x_axis.title.as_deref(), Some("FPR"));
    }

    #[test]
    fn test_roc_threshold_text() {
        let (y, s) = binary();
        let options = RocOptions {
            n_points: None,
            ..Default::default()
        };
        let fig = roc_figure(&y, &s, &options).unwrap();
        let curve = fig.traces[0].as_scatter().unwrap();
        let text = curve.text.as_ref().unwrap();
        // Threshold 0.4 predicts only 0.8 positive
        assert_eq!(text[2], "T=0.4000. Acc=0.7500. F1=0.6667");
    }

    #[test]
    fn test_single_class_column_is_noted() {
        let y = array![[true, true], [false, true]];
        let s = array![[0.9, 0.2], [0.1, 0.7]];
        let fig = roc_figure(&y, &s, &RocOptions::default()).unwrap();

        assert!(fig.trace_named("C1. AUC= 1.00").is_some());
        assert_eq!(fig.notes.len(), 1);
        assert!(fig.notes[0].contains("C2"));
    }

    #[test]
    fn test_pr_figure() {
        let (y, s) = binary();
        let fig = pr_figure(&y, &s, &RocOptions::default()).unwrap();
        let curve = fig.traces[0].as_scatter().unwrap();
        assert_eq!(curve.name.as_deref(), Some("C1. AP= 0.83"));
        assert_eq!(fig.layout.y_axis.range, Some(Range::new(0.0, 1.0)));
    }

    #[test]
    fn test_one_hot() {
        let encoded = one_hot(&[0, 2, 1], 3).unwrap();
        assert_eq!(
            encoded,
            array![[true, false, false], [false, false, true], [false, true, false]]
        );
        assert!(one_hot(&[3], 3).is_err());
    }

    #[test]
    fn test_shape_mismatch() {
        let y = array![[true], [false]];
        let s = array![[0.5, 0.1], [0.2, 0.3]];
        assert!(matches!(
            roc_figure(&y, &s, &RocOptions::default()),
            Err(PlotError::ShapeMismatch { .. })
        ));
    }
}

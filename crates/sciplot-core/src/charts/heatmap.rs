//! Heatmaps: plain matrices, 2D histograms and confusion matrices

use ndarray::{s, Array2};
use sciplot_stats::{ConfusionMatrix, Hist2dOptions, Histogram2d, NormAxis, Range};

use crate::axis::AxisSpec;
use crate::error::{validation, PlotError, PlotResult};
use crate::figure::{Figure, HeatmapTrace, Layout, LineStyle, ScatterTrace};
use crate::palette::{blues, get_colormap, viridis, Color};

/// Options for [`hist2d`]
#[derive(Debug, Clone, PartialEq)]
pub struct Hist2dFigureOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Number of x and y bins
    pub bins: (usize, usize),
    /// Axis clipping for samples with far outliers
    pub clip: Hist2dOptions,
    /// Color by log10 of the counts
    pub log: bool,
    /// Overlay the mean y of every x column
    pub trend_line: bool,
}

impl Default for Hist2dFigureOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            bins: (15, 30),
            clip: Hist2dOptions::default(),
            log: false,
            trend_line: false,
        }
    }
}

/// Heatmap of a 2D histogram of paired samples
pub fn hist2d(x: &[f64], y: &[f64], options: &Hist2dFigureOptions) -> PlotResult<Figure> {
    let hist = Histogram2d::compute(x, y, options.bins, &options.clip)?;
    let (z, z_title) = if options.log {
        (hist.log_counts(), "log(Count)")
    } else {
        (hist.counts.clone(), "Count")
    };

    let mut figure = Figure::new(options.title.clone());
    if options.trend_line {
        figure.push(
            ScatterTrace::line(hist.x_centers(), hist.conditional_mean(), LineStyle::default())
                .named("Trendline")
                .with_legend(true),
        );
    }
    figure.push(HeatmapTrace {
        name: Some("Heatmap".to_string()),
        x: hist.x_centers().into(),
        y: hist.y_centers().into(),
        z: HeatmapTrace::rows_of(&z),
        color_scale: viridis().color_scale(11),
        z_title: Some(z_title.to_string()),
        show_scale: true,
        ..Default::default()
    });
    figure.layout = Layout {
        x_axis: AxisSpec::new().with_title(options.x_label.clone()),
        y_axis: AxisSpec::new().with_title(options.y_label.clone()),
        ..Default::default()
    };

    Ok(figure)
}

/// Options for [`basic_heatmap`]
#[derive(Debug, Clone, PartialEq)]
pub struct BasicHeatmapOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Column positions; defaults to column indices
    pub x: Option<Vec<f64>>,
    /// Row positions; defaults to row indices
    pub y: Option<Vec<f64>>,
    /// Built-in colormap name, `_r` for reversed
    pub colormap: String,
}

impl Default for BasicHeatmapOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x: None,
            y: None,
            colormap: "viridis".to_string(),
        }
    }
}

fn positions(what: &str, given: Option<&Vec<f64>>, n: usize) -> PlotResult<Vec<f64>> {
    match given {
        Some(v) => {
            validation::validate_same_len(what, n, v.len())?;
            Ok(v.clone())
        }
        None => Ok((0..n).map(|i| i as f64).collect()),
    }
}

/// Matrix drawn as is, `z[[row, col]]` at `(x[col], y[row])`
pub fn basic_heatmap(z: &Array2<f64>, options: &BasicHeatmapOptions) -> PlotResult<Figure> {
    let (rows, cols) = z.dim();
    if rows == 0 || cols == 0 {
        return Err(PlotError::EmptyInput("heatmap matrix is empty".to_string()));
    }
    let cmap = get_colormap(&options.colormap).ok_or_else(|| {
        PlotError::InvalidConfig(format!("unknown colormap {}", options.colormap))
    })?;
    let x = positions("heatmap x positions", options.x.as_ref(), cols)?;
    let y = positions("heatmap y positions", options.y.as_ref(), rows)?;

    let mut figure = Figure::new(options.title.clone());
    figure.push(HeatmapTrace {
        name: Some("Heatmap".to_string()),
        x: x.into(),
        y: y.into(),
        z: HeatmapTrace::rows_of(z),
        color_scale: cmap.color_scale(11),
        show_scale: true,
        ..Default::default()
    });
    figure.layout = Layout {
        x_axis: AxisSpec::new().with_title(options.x_label.clone()),
        y_axis: AxisSpec::new().with_title(options.y_label.clone()),
        ..Default::default()
    };

    Ok(figure)
}

/// Options for [`confusion_figure`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionOptions {
    pub title: String,
    /// Class labels; defaults to "C1", "C2", ...
    pub labels: Option<Vec<String>>,
    /// Collapse to this class against the rest
    pub one_vs_rest: Option<usize>,
    /// Add a totals row and column
    pub add_totals: bool,
    /// Totals the cell colors are normalized by
    pub norm: NormAxis,
}

impl Default for ConfusionOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            labels: None,
            one_vs_rest: None,
            add_totals: true,
            norm: NormAxis::Rows,
        }
    }
}

fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Annotated heatmap of a confusion matrix
///
/// Cells show counts and are colored by the normalized matrix. The totals
/// row and column are shaded with the lightest normalized value. The
/// title of the x axis carries the overall accuracy of the full matrix.
pub fn confusion_figure(
    matrix: &ConfusionMatrix,
    options: &ConfusionOptions,
) -> PlotResult<Figure> {
    let accuracy = matrix.accuracy() * 100.0;

    let (matrix, labels) = match options.one_vs_rest {
        Some(k) => (
            matrix.one_vs_rest(k)?,
            vec!["T".to_string(), "F".to_string()],
        ),
        None => {
            let labels = match &options.labels {
                Some(labels) => {
                    let n = matrix.n_classes();
                    validation::validate_same_len("class labels", n, labels.len())?;
                    labels.clone()
                }
                None => (1..=matrix.n_classes()).map(|i| format!("C{}", i)).collect(),
            };
            (matrix.clone(), labels)
        }
    };
    let n = matrix.n_classes();
    let counts = matrix.counts();
    let row_norm = matrix.normalized(NormAxis::Rows);
    let col_norm = matrix.normalized(NormAxis::Columns);
    let normalized = match options.norm {
        NormAxis::Rows => row_norm.clone(),
        NormAxis::Columns => col_norm.clone(),
        NormAxis::All => matrix.normalized(NormAxis::All),
    };

    let mut hover: Vec<Vec<String>> = (0..n)
        .map(|r| {
            (0..n)
                .map(|c| {
                    format!(
                        "{}<br><b>Pred:</b> {} <br><b>True:</b> {} <br><b>Row norm:</b> {:.3}% <br><b>Col norm:</b> {:.3}%",
                        counts[[r, c]],
                        labels[c],
                        labels[r],
                        row_norm[[r, c]] * 100.0,
                        col_norm[[r, c]] * 100.0
                    )
                })
                .collect()
        })
        .collect();

    let mut axis_labels: Vec<String> = labels
        .iter()
        .map(|l| l.chars().take(10).collect())
        .collect();
    let (colors, shown_counts) = if options.add_totals {
        let totals = matrix.with_totals();
        let total = matrix.total();
        let shade = normalized.iter().copied().fold(f64::INFINITY, f64::min);

        let mut colors = Array2::<f64>::from_elem((n + 1, n + 1), shade);
        colors.slice_mut(s![..n, ..n]).assign(&normalized);

        for (r, row) in hover.iter_mut().enumerate() {
            row.push(format!(
                "<b>% of True Data:</b> {:.2}%",
                percent_of(totals[[r, n]], total)
            ));
        }
        let mut last: Vec<String> = (0..n)
            .map(|c| {
                format!(
                    "<b>% of Predictions:</b> {:.2}%",
                    percent_of(totals[[n, c]], total)
                )
            })
            .collect();
        last.push("Total Samples".to_string());
        hover.push(last);
        axis_labels.push("TOTAL".to_string());

        (colors, totals)
    } else {
        (normalized, counts.clone())
    };

    let size = axis_labels.len();
    let positions: Vec<f64> = (0..size).map(|i| i as f64).collect();
    let mut figure = Figure::new(options.title.clone());
    figure.push(HeatmapTrace {
        name: Some("Confusion".to_string()),
        x: positions.clone().into(),
        y: positions.into(),
        z: HeatmapTrace::rows_of(&colors),
        color_scale: blues().color_scale(11),
        cell_text: Some(
            shown_counts
                .rows()
                .into_iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        ),
        hover_text: Some(hover),
        show_scale: false,
        ..Default::default()
    });

    if options.add_totals {
        let edge = n as f64 - 0.5;
        let span = vec![-0.5, n as f64 + 0.5];
        let border = LineStyle::new(4.0).with_color(Color::RED);
        figure.push(ScatterTrace::line(vec![edge, edge], span.clone(), border.clone()));
        figure.push(ScatterTrace::line(span, vec![edge, edge], border));
    }

    let extent = Range::new(-0.5, size as f64 - 0.5);
    figure.layout = Layout {
        x_axis: AxisSpec::new()
            .with_title(format!("Predicted (Total accuracy = {:.3}%)", accuracy))
            .with_categories(axis_labels.clone())
            .with_range(extent),
        y_axis: AxisSpec::new()
            .with_title("True")
            .with_categories(axis_labels)
            .with_suggested_range(extent)
            .reversed(),
        show_legend: false,
        ..Default::default()
    };

    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AutoRange;
    use ndarray::array;

    #[test]
    fn test_basic_heatmap() {
        let z = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let options = BasicHeatmapOptions {
            y: Some(vec![0.5, 1.5]),
            colormap: "Blues_r".to_string(),
            ..Default::default()
        };
        let fig = basic_heatmap(&z, &options).unwrap();
        let heatmap = fig.traces[0].as_heatmap().unwrap();

        assert_eq!(heatmap.z[1], vec![4.0, 5.0, 6.0]);
        assert_eq!(heatmap.x.as_numbers(), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(heatmap.y.as_numbers(), Some(&[0.5, 1.5][..]));
        assert_eq!(Some(heatmap.color_scale[0].1), Color::from_hex("#08306b"));
        assert!(heatmap.contours.is_none());
    }

    #[test]
    fn test_basic_heatmap_rejects_bad_input() {
        let z = array![[1.0, 2.0]];
        let options = BasicHeatmapOptions {
            x: Some(vec![0.0]),
            ..Default::default()
        };
        assert!(matches!(
            basic_heatmap(&z, &options),
            Err(PlotError::ShapeMismatch { .. })
        ));
        let options = BasicHeatmapOptions {
            colormap: "jet".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            basic_heatmap(&z, &options),
            Err(PlotError::InvalidConfig(_))
        ));
        assert!(matches!(
            basic_heatmap(&Array2::zeros((0, 0)), &BasicHeatmapOptions::default()),
            Err(PlotError::EmptyInput(_))
        ));
    }

    fn matrix() -> ConfusionMatrix {
        ConfusionMatrix::from_counts(array![[5, 1, 0], [2, 3, 1], [0, 0, 4]]).unwrap()
    }

    #[test]
    fn test_confusion_with_totals() {
        let fig = confusion_figure(&matrix(), &ConfusionOptions::default()).unwrap();
        let heatmap = fig.traces[0].as_heatmap().unwrap();

        assert_eq!(heatmap.z.len(), 4);
        assert!((heatmap.z[0][0] - 5.0 / 6.0).abs() < 1e-12);
        let text = heatmap.cell_text.as_ref().unwrap();
        assert_eq!(text[3][3], "16");
        assert_eq!(text[1][3], "6");

        let hover = heatmap.hover_text.as_ref().unwrap();
        assert!(hover[0][1].starts_with("1<br><b>Pred:</b> C2 <br><b>True:</b> C1"));
        assert_eq!(hover[3][3], "Total Samples");

        // 12 of 16 on the diagonal
        assert_eq!(
            fig.layout.x_axis.title.as_deref(),
            Some("Predicted (Total accuracy = 75.000%)")
        );
        assert_eq!(
            fig.layout.x_axis.tick_labels.as_ref().unwrap().last().map(String::as_str),
            Some("TOTAL")
        );
        assert_eq!(fig.layout.y_axis.autorange, AutoRange::Reversed);
        // Heatmap plus two border lines
        assert_eq!(fig.traces.len(), 3);
    }

    #[test]
    fn test_confusion_one_vs_rest() {
        let options = ConfusionOptions {
            one_vs_rest: Some(0),
            add_totals: false,
            ..Default::default()
        };
        let fig = confusion_figure(&matrix(), &options).unwrap();
        let heatmap = fig.traces[0].as_heatmap().unwrap();

        let text = heatmap.cell_text.as_ref().unwrap();
        assert_eq!(text, &vec![vec!["5", "1"], vec!["2", "8"]]);
        assert_eq!(
            fig.layout.x_axis.tick_labels,
            Some(vec!["T".to_string(), "F".to_string()])
        );
        assert_eq!(fig.traces.len(), 1);
    }

    #[test]
    fn test_confusion_label_mismatch() {
        let options = ConfusionOptions {
            labels: Some(vec!["a".to_string()]),
            ..Default::default()
        };
        assert!(confusion_figure(&matrix(), &options).is_err());
    }

    #[test]
    fn test_hist2d_log_counts() {
        let x: Vec<f64> = (0..100).map(|i| (i % 10) as f64).collect();
        let y: Vec<f64> = (0..100).map(|i| (i / 10) as f64).collect();
        let options = Hist2dFigureOptions {
            bins: (5, 5),
            log: true,
            trend_line: true,
            ..Default::default()
        };
        let fig = hist2d(&x, &y, &options).unwrap();

        assert!(fig.trace_named("Trendline").is_some());
        let heatmap = fig.trace_named("Heatmap").unwrap().as_heatmap().unwrap();
        assert_eq!(heatmap.z.len(), 5);
        assert_eq!(heatmap.z[0].len(), 5);
        // Four points per cell
        assert!((heatmap.z[0][0] - 4.0f64.log10()).abs() < 1e-12);
        assert_eq!(heatmap.z_title.as_deref(), Some("log(Count)"));
    }
}

//! Correlation scatter plots
//!
//! One scatter per series, annotated with its Pearson and Spearman
//! correlations and linear fit. A series whose fit cannot be computed
//! (too few pairs, constant x) keeps its points but loses the annotation
//! and fit line; the omission is logged and noted on the figure.

use sciplot_stats::{linregress, spearman, Range};

use super::optional_stat;
use crate::axis::AxisSpec;
use crate::config::PlotConfig;
use crate::error::{validation, PlotResult};
use crate::figure::{Annotation, Figure, Layout, LineStyle, Marker, ScatterTrace};
use crate::palette::{Color, SET1};
use crate::sampling::{marker_size_for, subsample_indices, SeededRng};

/// One paired sample
#[derive(Debug, Clone, PartialEq)]
pub struct XySeries {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl XySeries {
    pub fn new(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    /// Pairs where both coordinates are finite
    fn finite_pairs(&self) -> (Vec<f64>, Vec<f64>) {
        self.x
            .iter()
            .zip(&self.y)
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .map(|(&a, &b)| (a, b))
            .unzip()
    }
}

/// Options for [`corr_plot`]
#[derive(Debug, Clone, PartialEq)]
pub struct CorrOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Maximum points drawn per series
    pub max_points: usize,
    /// Annotate each series with its correlation statistics
    pub add_stats: bool,
    /// Draw each series' least-squares line
    pub add_fit_line: bool,
    /// Draw the `y = x` line
    pub add_identity_line: bool,
    /// Line inset from the x extremes, as a fraction of the span
    pub edge_shift: f64,
    /// Fixed marker size; chosen from the point count when unset
    pub marker_size: Option<f64>,
    pub seed: u64,
}

impl CorrOptions {
    pub fn from_config(config: &PlotConfig) -> Self {
        Self {
            title: "Correlation".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            max_points: config.correlation.max_points,
            add_stats: true,
            add_fit_line: true,
            add_identity_line: false,
            edge_shift: config.correlation.edge_shift,
            marker_size: None,
            seed: config.correlation.seed,
        }
    }

    pub fn with_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn with_identity_line(mut self, show: bool) -> Self {
        self.add_identity_line = show;
        self
    }
}

impl Default for CorrOptions {
    fn default() -> Self {
        Self::from_config(&PlotConfig::default())
    }
}

/// Endpoints of a line over `range` inset by `shift` of its width
pub(super) fn inset(range: Range, shift: f64) -> Vec<f64> {
    let dx = range.width() * shift;
    vec![range.low + dx, range.high - dx]
}

/// Scatter of each series with correlation annotations and fit lines
pub fn corr_plot(series: &[XySeries], options: &CorrOptions) -> PlotResult<Figure> {
    validation::validate_not_empty("correlation series", series)?;
    for s in series {
        validation::validate_same_len(&format!("{} y values", s.name), s.x.len(), s.y.len())?;
    }

    let n = series.len();
    let colors: Vec<Color> = if n > 1 {
        SET1.iter()
            .cycle()
            .take(n)
            .map(|&(r, g, b)| Color::from_rgb8(r, g, b))
            .collect()
    } else {
        vec![Color::BLUE]
    };
    let pairs: Vec<(Vec<f64>, Vec<f64>)> = series.iter().map(XySeries::finite_pairs).collect();
    let largest = pairs.iter().map(|(x, _)| x.len()).max().unwrap_or(0);
    let marker_size = options
        .marker_size
        .unwrap_or_else(|| marker_size_for(largest.min(options.max_points)));

    let mut figure = Figure::new(options.title.clone());
    let mut rng = SeededRng::new(options.seed);

    for (s, ((x, y), color)) in series.iter().zip(pairs.iter().zip(&colors)) {
        let keep = subsample_indices(x.len(), options.max_points, &mut rng);
        let mut scatter = ScatterTrace::markers(
            keep.iter().map(|&i| x[i]).collect(),
            keep.iter().map(|&i| y[i]).collect(),
        )
        .named(s.name.clone())
        .with_marker(Marker::colored(*color).with_size(marker_size))
        .with_opacity(0.5)
        .with_legend(true);
        if n > 1 {
            scatter = scatter.in_group(s.name.clone());
        }
        figure.push(scatter);
    }

    if options.add_stats {
        for (i, (s, ((x, y), color))) in series
            .iter()
            .zip(pairs.iter().zip(&colors))
            .enumerate()
        {
            let what = format!("correlation fit for {}", s.name);
            let Some(fit) = optional_stat(&mut figure, &what, linregress(x, y)) else {
                continue;
            };
            let Some(rank) = optional_stat(&mut figure, &what, spearman(x, y)) else {
                continue;
            };

            let text = format!(
                "Pearson [R2, P]=[{:.2},{:.2}] <br> Spearman [R2, P]=[{:.2},{:.2}] <br> y={:.2}x+{:.2}. N={}",
                fit.r, fit.p_value, rank.r, rank.p_value, fit.slope, fit.intercept, fit.n
            );
            figure
                .layout
                .annotations
                .push(Annotation::paper(text.clone(), 0.05, 0.95 - 0.1 * i as f64));

            if options.add_fit_line {
                if let Some(range) = Range::of_finite(x) {
                    let xs = inset(range, options.edge_shift);
                    let ys = xs.iter().map(|&v| fit.predict(v)).collect();
                    let style = LineStyle::default().with_color(*color);
                    let mut line = ScatterTrace::line(xs, ys, style)
                        .named(format!("{} corr", s.name))
                        .with_hover_text(text)
                        .with_legend(n == 1);
                    if n > 1 {
                        line = line.in_group(s.name.clone());
                    }
                    figure.push(line);
                }
            }
        }
    }

    if options.add_identity_line {
        let span = pairs
            .iter()
            .filter_map(|(x, _)| Range::of_finite(x))
            .reduce(|a, b| a.union(&b));
        if let Some(span) = span {
            let xs = inset(span, options.edge_shift);
            figure.push(
                ScatterTrace::line(xs.clone(), xs, LineStyle::default().with_color(Color::BLACK))
                    .named("X=Y")
                    .with_legend(true),
            );
        }
    }

    let annotations = std::mem::take(&mut figure.layout.annotations);
    figure.layout = Layout {
        x_axis: AxisSpec::new().with_title(options.x_label.clone()),
        y_axis: AxisSpec::new().with_title(options.y_label.clone()),
        show_legend: n > 1,
        annotations,
        ..Default::default()
    };

    Ok(figure)
}

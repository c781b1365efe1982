//! Scatter plot framed by marginal histograms
//!
//! The scatter fills the lower-left `ratio` of the figure. The x marginal
//! sits above it on a secondary y axis and the y marginal to its right on a
//! secondary x axis, so each histogram shares one axis with the points.

use sciplot_stats::{BinSpec, Hist2dOptions, Histogram, Histogram2d, Range};

use super::corr::inset;
use super::optional_stat;
use crate::axis::AxisSpec;
use crate::error::{validation, PlotError, PlotResult};
use crate::figure::{
    AxisPair, BarTrace, Figure, HeatmapTrace, Layout, LineStyle, Marker, Orientation,
    ScatterTrace,
};
use crate::palette::{hot, Color};

/// Options for [`scatter_histo`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterHistoOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Overlay filled density contours
    pub contour: bool,
    pub contour_levels: usize,
    /// Bins per marginal histogram; 0 picks Sturges' rule
    pub bins: usize,
    pub marker_size: f64,
    /// Draw `y = x` over the span both axes share
    pub identity_line: bool,
    /// Fraction of the figure taken by the scatter in each direction
    pub ratio: f64,
}

impl Default for ScatterHistoOptions {
    fn default() -> Self {
        Self {
            title: "2D Density Plot".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            contour: true,
            contour_levels: 20,
            bins: 0,
            marker_size: 2.0,
            identity_line: false,
            ratio: 0.85,
        }
    }
}

impl ScatterHistoOptions {
    pub fn with_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }
}

/// ceil(log2 n) + 1
fn sturges_bins(n: usize) -> usize {
    (n.max(1) as f64).log2().ceil() as usize + 1
}

fn marginal(name: &str, hist: &Histogram, color: Color, axes: AxisPair) -> BarTrace {
    let (x, y, orientation) = match axes {
        AxisPair::SecondaryX => (hist.values(), hist.centers(), Orientation::Horizontal),
        _ => (hist.centers(), hist.values(), Orientation::Vertical),
    };
    BarTrace {
        name: Some(name.to_string()),
        x: x.into(),
        y: y.into(),
        orientation,
        marker: Marker::colored(color),
        axes,
        ..Default::default()
    }
}

/// Points of paired samples with a histogram of each coordinate
///
/// Pairs with a non-finite coordinate are dropped. Density contours are
/// decoration: when they cannot be computed the figure keeps the points
/// and notes the omission.
pub fn scatter_histo(x: &[f64], y: &[f64], options: &ScatterHistoOptions) -> PlotResult<Figure> {
    validation::validate_same_len("y values", x.len(), y.len())?;
    if !(options.ratio > 0.0 && options.ratio < 1.0) {
        return Err(PlotError::InvalidConfig(format!(
            "scatter ratio must lie in (0, 1), got {}",
            options.ratio
        )));
    }
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .unzip();
    if xs.is_empty() {
        return Err(PlotError::EmptyInput("scatter has no finite pairs".to_string()));
    }

    let color = Color::from_rgb8(102, 0, 0);
    let bins = match options.bins {
        0 => sturges_bins(xs.len()),
        n => n,
    };
    tracing::debug!("Scatter of {} pairs with {} marginal bins", xs.len(), bins);

    let mut figure = Figure::new(options.title.clone());
    figure.push(
        ScatterTrace::markers(xs.clone(), ys.clone())
            .named("points")
            .with_marker(Marker::colored(color).with_size(options.marker_size))
            .with_opacity(0.4),
    );

    if options.contour {
        let density = Histogram2d::compute(&xs, &ys, (bins, bins), &Hist2dOptions::default());
        if let Some(density) = optional_stat(&mut figure, "density contours", density) {
            figure.push(HeatmapTrace {
                name: Some("density".to_string()),
                x: density.x_centers().into(),
                y: density.y_centers().into(),
                z: HeatmapTrace::rows_of(&density.counts),
                color_scale: hot().reversed().color_scale(11),
                contours: Some(options.contour_levels),
                ..Default::default()
            });
        }
    }

    let x_hist = Histogram::compute(&xs, &BinSpec::Count(bins), None, false)?;
    let y_hist = Histogram::compute(&ys, &BinSpec::Count(bins), None, false)?;
    figure.push(marginal("x density", &x_hist, color, AxisPair::SecondaryY));
    figure.push(marginal("y density", &y_hist, color, AxisPair::SecondaryX));

    if options.identity_line {
        let span_x = Range::of_finite(&xs);
        let span_y = Range::of_finite(&ys);
        match span_x.zip(span_y).and_then(|(a, b)| a.intersect(&b)) {
            Some(shared) => {
                let ends = inset(shared, 0.03);
                figure.push(
                    ScatterTrace::line(
                        ends.clone(),
                        ends,
                        LineStyle::default().with_color(Color::BLACK),
                    )
                    .named("X=Y")
                    .with_legend(true),
                );
            }
            None => tracing::debug!("x and y spans are disjoint, skipping the X=Y line"),
        }
    }

    let ratio = options.ratio;
    figure.layout = Layout {
        x_axis: AxisSpec::new()
            .with_title(options.x_label.clone())
            .with_domain(0.0, ratio),
        y_axis: AxisSpec::new()
            .with_title(options.y_label.clone())
            .with_domain(0.0, ratio),
        x_axis2: Some(AxisSpec::new().with_domain(ratio, 1.0)),
        y_axis2: Some(AxisSpec::new().with_domain(ratio, 1.0)),
        bar_gap: Some(0.0),
        show_legend: false,
        width: Some(600),
        ..Default::default()
    };

    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Trace;

    fn bar<'a>(fig: &'a Figure, name: &str) -> &'a BarTrace {
        fig.trace_named(name).and_then(Trace::as_bar).unwrap()
    }

    #[test]
    fn test_marginals_count_every_pair() {
        let x: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| (v / 10.0).sin()).collect();
        let fig = scatter_histo(&x, &y, &ScatterHistoOptions::default()).unwrap();

        let top = bar(&fig, "x density");
        assert_eq!(top.axes, AxisPair::SecondaryY);
        assert_eq!(top.orientation, Orientation::Vertical);
        // Sturges: ceil(log2 100) + 1
        assert_eq!(top.x.len(), 8);
        assert_eq!(top.y.as_numbers().unwrap().iter().sum::<f64>(), 100.0);

        let side = bar(&fig, "y density");
        assert_eq!(side.axes, AxisPair::SecondaryX);
        assert_eq!(side.orientation, Orientation::Horizontal);
        assert_eq!(side.x.as_numbers().unwrap().iter().sum::<f64>(), 100.0);

        let density = fig.trace_named("density").and_then(Trace::as_heatmap).unwrap();
        assert_eq!(density.contours, Some(20));
        assert!(!density.show_scale);
    }

    #[test]
    fn test_layout_domains() {
        let fig = scatter_histo(&[1.0, 2.0], &[3.0, 4.0], &ScatterHistoOptions::default()).unwrap();
        assert_eq!(fig.layout.x_axis.domain, Some((0.0, 0.85)));
        assert_eq!(fig.layout.y_axis.domain, Some((0.0, 0.85)));
        assert_eq!(fig.layout.x_axis2.as_ref().and_then(|a| a.domain), Some((0.85, 1.0)));
        assert_eq!(fig.layout.y_axis2.as_ref().and_then(|a| a.domain), Some((0.85, 1.0)));
        assert!(!fig.layout.show_legend);
    }

    #[test]
    fn test_identity_line_over_shared_span() {
        let x: Vec<f64> = (0..=100).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v + 50.0).collect();
        let options = ScatterHistoOptions {
            identity_line: true,
            contour: false,
            ..Default::default()
        };
        let fig = scatter_histo(&x, &y, &options).unwrap();

        let line = fig.trace_named("X=Y").and_then(Trace::as_scatter).unwrap();
        // Shared span [50, 100] inset by 3%
        assert_eq!(line.x.as_numbers(), Some(&[51.5, 98.5][..]));
        assert_eq!(line.x, line.y);
    }

    #[test]
    fn test_disjoint_spans_skip_identity_line() {
        let options = ScatterHistoOptions {
            identity_line: true,
            ..Default::default()
        };
        let fig = scatter_histo(&[0.0, 1.0], &[5.0, 6.0], &options).unwrap();
        assert!(fig.trace_named("X=Y").is_none());
    }

    #[test]
    fn test_non_finite_pairs_dropped() {
        let x = [1.0, f64::NAN, 3.0];
        let y = [1.0, 2.0, f64::INFINITY];
        let fig = scatter_histo(&x, &y, &ScatterHistoOptions::default()).unwrap();
        let points = fig.trace_named("points").and_then(Trace::as_scatter).unwrap();
        assert_eq!(points.x.as_numbers(), Some(&[1.0][..]));

        let err = scatter_histo(&[f64::NAN], &[1.0], &ScatterHistoOptions::default());
        assert!(matches!(err, Err(PlotError::EmptyInput(_))));
    }

    #[test]
    fn test_bad_input_rejected() {
        let options = ScatterHistoOptions::default();
        assert!(matches!(
            scatter_histo(&[1.0, 2.0], &[1.0], &options),
            Err(PlotError::ShapeMismatch { .. })
        ));
        let options = ScatterHistoOptions {
            ratio: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            scatter_histo(&[1.0], &[1.0], &options),
            Err(PlotError::InvalidConfig(_))
        ));
    }
}

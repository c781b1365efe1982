//! Histograms with a data strip and box overlay
//!
//! Bars are binned over the outlier summary's display range, so a few
//! extreme values widen the axis without flattening the bulk of the
//! distribution. Above the bars sit a jittered strip of (subsampled) data
//! points and a box plot of the sample.

use sciplot_stats::{
    ks_2samp, mann_whitney_u, summarize, ttest_1samp, ttest_ind, wilcoxon, Alternative, BinSpec,
    BoxStats, Histogram, OutlierOptions, OutlierSummary,
};

use super::box_plot::{box_traces, BoxStyle};
use super::{finite_values, optional_stat};
use crate::axis::AxisSpec;
use crate::config::PlotConfig;
use crate::error::{PlotError, PlotResult};
use crate::figure::{BarMode, BarTrace, Dash, Figure, Layout, LineStyle, Marker, ScatterTrace};
use crate::palette::Color;
use crate::sampling::{gaussian_jitter, subsample, SeededRng};

/// Options for [`histogram`]
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramOptions {
    pub title: String,
    pub x_label: String,
    pub bins: usize,
    /// Probability density rather than counts
    pub density: bool,
    pub outliers: OutlierOptions,
    /// Draw a box plot above the bars
    pub box_plot: bool,
    /// Draw a jittered strip of data points above the bars
    pub scatter: bool,
    pub max_scatter_points: usize,
    /// Strip jitter as a fraction of the tallest bar
    pub jitter: f64,
    pub seed: u64,
    /// Test the sample for a difference from zero and mark `x = 0`
    pub diff_test: bool,
}

impl HistogramOptions {
    pub fn from_config(config: &PlotConfig) -> Self {
        Self {
            title: "Distribution".to_string(),
            x_label: String::new(),
            bins: config.histogram.bins,
            density: config.histogram.density,
            outliers: config.outliers,
            box_plot: true,
            scatter: true,
            max_scatter_points: config.histogram.max_scatter_points,
            jitter: config.histogram.jitter,
            seed: config.histogram.seed,
            diff_test: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    pub fn with_diff_test(mut self, diff_test: bool) -> Self {
        self.diff_test = diff_test;
        self
    }
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self::from_config(&PlotConfig::default())
    }
}

/// Options for [`two_histograms`]
#[derive(Debug, Clone, PartialEq)]
pub struct TwoHistogramOptions {
    pub title: String,
    pub x_label: String,
    /// Legend names of the two samples
    pub names: (String, String),
    pub bins: usize,
    pub density: bool,
    /// Bin both samples on shared edges over their joint range
    pub same_bins: bool,
    pub outliers: OutlierOptions,
    pub box_plot: bool,
    /// Maximum strip points per sample
    pub max_points: usize,
    pub jitter: f64,
    pub seed: u64,
    /// Mann-Whitney U test in the title
    pub mann_whitney: bool,
    /// Equal-variance t-test in the title
    pub t_test: bool,
    /// Two-sample Kolmogorov-Smirnov test in the title
    pub ks: bool,
    /// Alternative for the Mann-Whitney test
    pub alternative: Alternative,
    pub range_padding: f64,
}

impl TwoHistogramOptions {
    pub fn from_config(config: &PlotConfig) -> Self {
        Self {
            title: "Data Distribution".to_string(),
            x_label: String::new(),
            names: ("A".to_string(), "B".to_string()),
            bins: config.histogram.bins,
            density: config.histogram.density,
            same_bins: true,
            outliers: config.outliers,
            box_plot: true,
            max_points: config.histogram.pair_max_scatter_points,
            jitter: config.histogram.pair_jitter,
            seed: config.histogram.seed,
            mann_whitney: false,
            t_test: false,
            ks: false,
            alternative: Alternative::TwoSided,
            range_padding: config.range_padding.0,
        }
    }

    pub fn with_names(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.names = (a.into(), b.into());
        self
    }

    /// Enable the Mann-Whitney, t and KS tests
    pub fn with_tests(mut self, mann_whitney: bool, t_test: bool, ks: bool) -> Self {
        self.mann_whitney = mann_whitney;
        self.t_test = t_test;
        self.ks = ks;
        self
    }
}

impl Default for TwoHistogramOptions {
    fn default() -> Self {
        Self::from_config(&PlotConfig::default())
    }
}

fn bar_trace(name: &str, hist: &Histogram, color: Color) -> BarTrace {
    BarTrace {
        name: Some(name.to_string()),
        x: hist.centers().into(),
        y: hist.values().into(),
        marker: Marker::colored(color).with_outline(LineStyle::new(2.0).with_color(Color::BLACK)),
        opacity: Some(0.5),
        legend_group: Some(name.to_string()),
        show_legend: true,
        ..Default::default()
    }
}

/// Jittered strip of at most `max` points centred on height `level`
fn data_strip(
    name: &str,
    data: &[f64],
    max: usize,
    level: f64,
    spread: f64,
    color: Color,
    rng: &mut SeededRng,
) -> ScatterTrace {
    let points = subsample(data, max, rng);
    let heights = gaussian_jitter(points.len(), level, spread, rng);
    ScatterTrace::markers(points, heights)
        .named(name)
        .in_group(name)
        .with_marker(Marker::colored(color).with_size(2.0))
}

fn summarize_sample(
    what: &str,
    data: &[f64],
    options: &OutlierOptions,
) -> PlotResult<OutlierSummary> {
    let summary = summarize(data, options)?;
    if summary.is_empty() {
        return Err(PlotError::EmptyInput(format!("{} has no finite values", what)));
    }
    Ok(summary)
}

/// Histogram of one sample
pub fn histogram(data: &[f64], options: &HistogramOptions) -> PlotResult<Figure> {
    let summary = summarize_sample("histogram sample", data, &options.outliers)?;
    let values = finite_values(data);
    let hist = Histogram::compute(
        &values,
        &BinSpec::Count(options.bins),
        Some(summary.range),
        options.density,
    )?;
    let top = hist.max_value() * 1.1;

    tracing::debug!(
        "Histogram of {} values over [{}, {}], {} flagged",
        values.len(),
        summary.range.low,
        summary.range.high,
        summary.outliers.len()
    );

    let mut figure = Figure::new(options.title.clone());
    figure.push(bar_trace("Hist", &hist, Color::RED));

    if options.scatter {
        let mut rng = SeededRng::new(options.seed);
        let strip = data_strip(
            "data",
            &values,
            options.max_scatter_points,
            top,
            top * options.jitter,
            Color::BLACK,
            &mut rng,
        );
        figure.push(strip.with_legend(true));
    }

    if options.box_plot {
        if let Some(stats) = BoxStats::from_summary(&values, &summary) {
            let style = BoxStyle::default()
                .with_color(Color::RED)
                .at(top * 1.2)
                .with_legend(true);
            figure.extend(box_traces(&stats, &style));
        }
    }

    if options.diff_test {
        figure.push(
            ScatterTrace::line(
                vec![0.0, 0.0],
                vec![0.0, top * 1.1],
                LineStyle::new(2.0).with_color(Color::BLACK).with_dash(Dash::Dot),
            )
            .named("x=0")
            .with_legend(true),
        );

        let mut stats = Vec::new();
        let t = ttest_1samp(&values, 0.0, Alternative::TwoSided);
        if let Some(t) = optional_stat(&mut figure, "t-test", t) {
            stats.push(("t", t.p_value));
        }
        let w = wilcoxon(&values, Alternative::TwoSided);
        if let Some(w) = optional_stat(&mut figure, "Wilcoxon test", w) {
            stats.push(("w", w.p_value));
        }
        figure.append_title_stats(&stats);
    }

    let y_title = if options.density {
        "Probability Density"
    } else {
        "Count"
    };
    figure.layout = Layout {
        x_axis: AxisSpec::new()
            .with_title(options.x_label.clone())
            .with_range(summary.range),
        y_axis: AxisSpec::new().with_title(y_title),
        bar_gap: Some(0.0),
        ..Default::default()
    };

    Ok(figure)
}

/// Two overlaid histograms with strips, boxes and optional tests
pub fn two_histograms(a: &[f64], b: &[f64], options: &TwoHistogramOptions) -> PlotResult<Figure> {
    let (name_a, name_b) = (&options.names.0, &options.names.1);
    let summary_a = summarize_sample(name_a, a, &options.outliers)?;
    let summary_b = summarize_sample(name_b, b, &options.outliers)?;
    let (values_a, values_b) = (finite_values(a), finite_values(b));

    let joint = summary_a.range.union(&summary_b.range);
    let (hist_a, hist_b) = if options.same_bins {
        let edges = BinSpec::Edges(joint.extend(options.range_padding).linspace(options.bins + 1));
        (
            Histogram::compute(&values_a, &edges, None, options.density)?,
            Histogram::compute(&values_b, &edges, None, options.density)?,
        )
    } else {
        let bins = BinSpec::Count(options.bins);
        (
            Histogram::compute(&values_a, &bins, Some(summary_a.range), options.density)?,
            Histogram::compute(&values_b, &bins, Some(summary_b.range), options.density)?,
        )
    };
    let top = hist_a.max_value().max(hist_b.max_value()) * 1.1;

    let mut figure = Figure::new(options.title.clone());
    figure.push(bar_trace(name_a, &hist_a, Color::RED));
    figure.push(bar_trace(name_b, &hist_b, Color::BLUE));

    let mut rng = SeededRng::new(options.seed);
    let spread = top * options.jitter;
    figure.push(data_strip(
        name_a,
        &values_a,
        options.max_points,
        top * 1.2,
        spread,
        Color::RED,
        &mut rng,
    ));
    figure.push(data_strip(
        name_b,
        &values_b,
        options.max_points,
        top,
        spread,
        Color::BLUE,
        &mut rng,
    ));

    if options.box_plot {
        for (name, values, summary, color, level) in [
            (name_a, &values_a, &summary_a, Color::RED, top * 1.3),
            (name_b, &values_b, &summary_b, Color::BLUE, top * 1.1),
        ] {
            if let Some(stats) = BoxStats::from_summary(values, summary) {
                let style = BoxStyle::named(name.clone())
                    .with_color(color)
                    .at(level)
                    .in_group(name.clone());
                figure.extend(box_traces(&stats, &style));
            }
        }
    }

    let mut stats = Vec::new();
    if options.mann_whitney {
        let mw = mann_whitney_u(&values_a, &values_b, options.alternative);
        if let Some(mw) = optional_stat(&mut figure, "Mann-Whitney test", mw) {
            stats.push(("MW", mw.p_value));
        }
    }
    if options.t_test {
        let t = ttest_ind(&values_a, &values_b, true, Alternative::TwoSided);
        if let Some(t) = optional_stat(&mut figure, "t-test", t) {
            stats.push(("T", t.p_value));
        }
    }
    if options.ks {
        let ks = ks_2samp(&values_a, &values_b);
        if let Some(ks) = optional_stat(&mut figure, "KS test", ks) {
            stats.push(("KS", ks.p_value));
        }
    }
    figure.append_title_stats(&stats);

    let y_title = if options.density { "Density" } else { "Count" };
    figure.layout = Layout {
        x_axis: AxisSpec::new()
            .with_title(options.x_label.clone())
            .with_range(joint.extend(options.range_padding)),
        y_axis: AxisSpec::new().with_title(y_title),
        bar_mode: BarMode::Overlay,
        bar_gap: Some(0.0),
        ..Default::default()
    };

    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Trace;

    fn sample() -> Vec<f64> {
        (0..200).map(|i| ((i * 37) % 101) as f64 / 10.0).collect()
    }

    #[test]
    fn test_histogram_traces() {
        let fig = histogram(&sample(), &HistogramOptions::default()).unwrap();

        let bars = fig.trace_named("Hist").unwrap().as_bar().unwrap();
        assert_eq!(bars.y.len(), 40);
        let strip = fig.trace_named("data").unwrap().as_scatter().unwrap();
        assert_eq!(strip.x.len(), 200);
        // bars, strip, four box traces
        assert_eq!(fig.traces.len(), 6);
        assert_eq!(fig.layout.bar_gap, Some(0.0));
        assert_eq!(fig.layout.y_axis.title.as_deref(), Some("Probability Density"));
        assert!(fig.notes.is_empty());
    }

    #[test]
    fn test_histogram_subsamples_strip() {
        let data: Vec<f64> = (0..5000).map(|i| (i % 97) as f64).collect();
        let fig = histogram(&data, &HistogramOptions::default()).unwrap();
        let strip = fig.trace_named("data").unwrap().as_scatter().unwrap();
        assert_eq!(strip.x.len(), 1000);
    }

    #[test]
    fn test_histogram_diff_test() {
        let options = HistogramOptions::default()
            .with_title("Shift")
            .with_diff_test(true);
        let data: Vec<f64> = sample().iter().map(|x| x + 1.0).collect();
        let fig = histogram(&data, &options).unwrap();

        assert!(fig.title.starts_with("Shift P_t="));
        assert!(fig.title.contains(" P_w="));
        assert!(fig.trace_named("x=0").is_some());
    }

    #[test]
    fn test_histogram_counts_mode() {
        let mut options = HistogramOptions::default();
        options.density = false;
        options.scatter = false;
        options.box_plot = false;
        let fig = histogram(&sample(), &options).unwrap();

        assert_eq!(fig.traces.len(), 1);
        let total: f64 = fig.traces[0].as_bar().unwrap().y.as_numbers().unwrap().iter().sum();
        assert_eq!(total, 200.0);
    }

    #[test]
    fn test_histogram_empty_is_error() {
        let err = histogram(&[f64::NAN], &HistogramOptions::default()).unwrap_err();
        assert!(matches!(err, PlotError::EmptyInput(_)));
    }

    #[test]
    fn test_two_histograms() {
        let a = sample();
        let b: Vec<f64> = a.iter().map(|x| x + 5.0).collect();
        let options = TwoHistogramOptions::default()
            .with_names("before", "after")
            .with_tests(true, true, true);
        let fig = two_histograms(&a, &b, &options).unwrap();

        let bars: Vec<_> = fig.traces.iter().filter_map(Trace::as_bar).collect();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].x, bars[1].x);
        assert_eq!(fig.layout.bar_mode, BarMode::Overlay);
        assert!(fig.title.contains("P_MW="));
        assert!(fig.title.contains("P_T="));
        assert!(fig.title.contains("P_KS="));

        let x_range = fig.layout.x_axis.range.unwrap();
        assert!(x_range.low < 0.0 && x_range.high > 15.0);
    }
}

//! Bar plots
//!
//! - [`bar_plot`]: mean ± std per group (or boxes) with the raw points beside
//! - [`prop_bar_plot`]: proportion of `true` per group with binomial error
//! - [`basic_bar_plot`]: values drawn as given, no aggregation

use sciplot_stats::{
    mann_whitney_u, mean_std, median, ttest_ind, Alternative, BoxStats, Range,
};

use super::box_plot::{box_traces, BoxStyle};
use super::{finite_values, optional_stat};
use crate::axis::AxisSpec;
use crate::config::PlotConfig;
use crate::error::{validation, PlotError, PlotResult};
use crate::figure::{
    BarTrace, Dash, Figure, Layout, LineStyle, Marker, ScatterTrace, Shape, Values,
};
use crate::palette::{series_colors, Color, SERIES_BLUE, SET3};
use crate::sampling::{gaussian_jitter, marker_size_for, subsample, SeededRng};

/// Options for [`bar_plot`]
#[derive(Debug, Clone, PartialEq)]
pub struct BarOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Group names; defaults to "1", "2", ...
    pub names: Option<Vec<String>>,
    /// Draw boxes (whiskers at the 5th/95th percentiles) instead of bars
    pub box_mode: bool,
    /// Maximum points drawn beside each group
    pub max_points: usize,
    /// Horizontal jitter of the points
    pub jitter: f64,
    pub seed: u64,
    /// Mann-Whitney U test in the title (two groups only)
    pub mann_whitney: bool,
    /// t-test in the title (two groups only)
    pub t_test: bool,
}

impl BarOptions {
    pub fn from_config(config: &PlotConfig) -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: "Mean".to_string(),
            names: None,
            box_mode: false,
            max_points: config.bar.max_points,
            jitter: config.bar.jitter,
            seed: config.bar.seed,
            mann_whitney: false,
            t_test: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_box_mode(mut self, box_mode: bool) -> Self {
        self.box_mode = box_mode;
        self
    }

    pub fn with_tests(mut self, mann_whitney: bool, t_test: bool) -> Self {
        self.mann_whitney = mann_whitney;
        self.t_test = t_test;
        self
    }
}

impl Default for BarOptions {
    fn default() -> Self {
        Self::from_config(&PlotConfig::default())
    }
}

/// Text drawn on basic bars
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BarText {
    #[default]
    None,
    /// Each bar's value to three decimals
    Values,
    /// Explicit text, one list per series
    Custom(Vec<Vec<String>>),
}

/// Options for [`basic_bar_plot`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicBarOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Bar positions or labels shared by every series
    pub x: Option<Values>,
    /// Series names; defaults to "1", "2", ...
    pub names: Option<Vec<String>>,
    /// Error bar half-lengths, one list per series
    pub errors: Option<Vec<Vec<f64>>>,
    pub text: BarText,
    /// Order bars from largest to smallest (single series only)
    pub sort: bool,
    /// Heights of horizontal reference lines
    pub lines: Vec<f64>,
    pub color: Option<Color>,
    /// Figure width in pixels
    pub width: Option<u32>,
}

fn default_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| i.to_string()).collect()
}

/// Mean ± std bars (or boxes) per group with the data points beside them
///
/// Non-finite values are dropped, then groups left empty are dropped with
/// their names.
pub fn bar_plot(groups: &[Vec<f64>], options: &BarOptions) -> PlotResult<Figure> {
    let names = match &options.names {
        Some(names) => {
            validation::validate_same_len("group names", groups.len(), names.len())?;
            names.clone()
        }
        None => default_names(groups.len()),
    };

    let (names, groups): (Vec<String>, Vec<Vec<f64>>) = names
        .into_iter()
        .zip(groups.iter().map(|g| finite_values(g)))
        .filter(|(name, group)| {
            if group.is_empty() {
                tracing::debug!("Dropping empty bar group {}", name);
            }
            !group.is_empty()
        })
        .unzip();
    validation::validate_not_empty("bar plot groups", &groups)?;

    let n = groups.len();
    let colors = series_colors(n);
    let (means, stds): (Vec<f64>, Vec<f64>) = groups.iter().map(|g| mean_std(g)).unzip();

    let mut figure = Figure::new(options.title.clone());

    if options.box_mode {
        for (i, group) in groups.iter().enumerate() {
            if let Some(stats) = BoxStats::from_data(group, (5.0, 95.0))? {
                let style = BoxStyle::named(names[i].clone())
                    .with_color(colors[i])
                    .vertical()
                    .at(i as f64)
                    .with_width(50.0)
                    .in_group("boxplot");
                figure.extend(box_traces(&stats, &style));
            }
        }
    } else {
        let text = groups
            .iter()
            .map(|g| format!("median= {:.4}", median(g).unwrap_or(f64::NAN)))
            .collect();
        figure.push(BarTrace {
            name: Some("BAR".to_string()),
            x: (0..n).map(|i| i as f64).collect::<Vec<_>>().into(),
            y: means.clone().into(),
            marker: Marker {
                colors: Some(colors.clone()),
                ..Default::default()
            },
            error: Some(stds.clone()),
            text: Some(text),
            ..Default::default()
        });
    }

    let largest = groups.iter().map(Vec::len).max().unwrap_or(0);
    let marker_size = marker_size_for(largest.min(options.max_points)).min(7.0);
    let mut rng = SeededRng::new(options.seed);
    let mut plotted_max = f64::NEG_INFINITY;
    for (i, group) in groups.iter().enumerate() {
        let points = subsample(group, options.max_points, &mut rng);
        plotted_max = points.iter().copied().fold(plotted_max, f64::max);
        let xs = gaussian_jitter(points.len(), i as f64 + 0.5, options.jitter, &mut rng);
        figure.push(
            ScatterTrace::markers(xs, points)
                .named(names[i].clone())
                .with_marker(Marker::colored(colors[i]).with_size(marker_size)),
        );
    }

    if n == 2 {
        let mut stats = Vec::new();
        if options.mann_whitney {
            let mw = mann_whitney_u(&groups[0], &groups[1], Alternative::TwoSided);
            if let Some(mw) = optional_stat(&mut figure, "Mann-Whitney test", mw) {
                stats.push(format!("P(MW)={:.3}", mw.p_value));
            }
        }
        if options.t_test {
            let t = ttest_ind(&groups[0], &groups[1], true, Alternative::TwoSided);
            if let Some(t) = optional_stat(&mut figure, "t-test", t) {
                stats.push(format!("P(T-test)={:.3}", t.p_value));
            }
        }
        if !stats.is_empty() {
            figure.title = format!("{}. {}", figure.title, stats.join(". "));
        }
    }

    let upper = means
        .iter()
        .zip(&stds)
        .map(|(m, s)| m + s)
        .fold(f64::NEG_INFINITY, f64::max);
    let lower = means
        .iter()
        .zip(&stds)
        .map(|(m, s)| m - s)
        .fold(f64::INFINITY, f64::min);
    let y_range = Range::new((2.0 * lower).min(0.0), 2.0 * upper);
    // Far outliers among the points: pin the axis to the bars
    let y_axis = AxisSpec::new().with_title(options.y_label.clone());
    let y_axis = if plotted_max < 2.0 * upper {
        y_axis.with_suggested_range(y_range)
    } else {
        y_axis.with_range(y_range)
    };

    figure.layout = Layout {
        x_axis: AxisSpec::new()
            .with_title(options.x_label.clone())
            .with_categories(names),
        y_axis,
        bar_gap: Some(0.5),
        show_legend: false,
        ..Default::default()
    };

    Ok(figure)
}

/// Proportion of `true` per group, with error `sqrt(p(1-p)/n)`
///
/// Empty groups are dropped with their names.
pub fn prop_bar_plot(
    groups: &[Vec<bool>],
    names: Option<&[String]>,
    title: &str,
) -> PlotResult<Figure> {
    let names = match names {
        Some(names) => {
            validation::validate_same_len("group names", groups.len(), names.len())?;
            names.to_vec()
        }
        None => default_names(groups.len()),
    };
    let (names, groups): (Vec<String>, Vec<&Vec<bool>>) = names
        .into_iter()
        .zip(groups)
        .filter(|(_, g)| !g.is_empty())
        .unzip();
    validation::validate_not_empty("proportion groups", &groups)?;

    let n = groups.len();
    let props: Vec<f64> = groups
        .iter()
        .map(|g| g.iter().filter(|&&v| v).count() as f64 / g.len() as f64)
        .collect();
    let errors = groups
        .iter()
        .zip(&props)
        .map(|(g, p)| (p * (1.0 - p) / g.len() as f64).sqrt())
        .collect();
    let colors = if n <= SET3.len() {
        SET3.iter()
            .take(n)
            .map(|&(r, g, b)| Color::from_rgb8(r, g, b))
            .collect()
    } else {
        let (r, g, b) = SERIES_BLUE;
        vec![Color::from_rgb8(r, g, b); n]
    };

    let mut figure = Figure::new(title);
    figure.push(BarTrace {
        name: Some("BAR".to_string()),
        x: (0..n).map(|i| i as f64).collect::<Vec<_>>().into(),
        y: props.into(),
        marker: Marker {
            colors: Some(colors),
            ..Default::default()
        },
        error: Some(errors),
        text: Some(groups.iter().map(|g| format!("N = {}", g.len())).collect()),
        ..Default::default()
    });
    figure.layout = Layout {
        x_axis: AxisSpec::new().with_categories(names),
        y_axis: AxisSpec::new().with_title("Proportion"),
        bar_gap: Some(0.5),
        show_legend: false,
        ..Default::default()
    };

    Ok(figure)
}

/// Bars drawn exactly as given, one trace per series
pub fn basic_bar_plot(series: &[Vec<f64>], options: &BasicBarOptions) -> PlotResult<Figure> {
    validation::validate_not_empty("bar series", series)?;
    let len = series[0].len();
    for s in series {
        validation::validate_same_len("bar series", len, s.len())?;
    }
    if let Some(x) = &options.x {
        validation::validate_same_len("bar positions", len, x.len())?;
    }
    let names = match &options.names {
        Some(names) => {
            validation::validate_same_len("series names", series.len(), names.len())?;
            names.clone()
        }
        None => default_names(series.len()),
    };
    let mut texts: Vec<Option<Vec<String>>> = match &options.text {
        BarText::None => vec![None; series.len()],
        BarText::Values => series
            .iter()
            .map(|s| Some(s.iter().map(|v| format!("{:.3}", v)).collect()))
            .collect(),
        BarText::Custom(text) => {
            validation::validate_same_len("bar text", series.len(), text.len())?;
            text.iter().cloned().map(Some).collect()
        }
    };
    let mut errors: Vec<Option<Vec<f64>>> = match &options.errors {
        Some(errors) => {
            validation::validate_same_len("error bars", series.len(), errors.len())?;
            errors.iter().cloned().map(Some).collect()
        }
        None => vec![None; series.len()],
    };

    let mut series = series.to_vec();
    let mut x = options
        .x
        .clone()
        .unwrap_or_else(|| Values::Numbers((0..len).map(|i| i as f64).collect()));

    if options.sort {
        if series.len() != 1 {
            return Err(PlotError::InvalidConfig(
                "sorting bars needs a single series".to_string(),
            ));
        }
        let mut order: Vec<usize> = (0..len).collect();
        order.sort_by(|&a, &b| series[0][b].total_cmp(&series[0][a]));

        let permute = |v: &[f64]| -> Vec<f64> { order.iter().map(|&i| v[i]).collect() };
        series[0] = permute(&series[0]);
        x = match x {
            Values::Numbers(v) => Values::Numbers(permute(&v)),
            Values::Labels(v) => Values::Labels(order.iter().map(|&i| v[i].clone()).collect()),
        };
        if let Some(text) = texts[0].take() {
            texts[0] = Some(order.iter().map(|&i| text[i].clone()).collect());
        }
        if let Some(error) = errors[0].take() {
            errors[0] = Some(permute(&error));
        }
    }

    let color = options
        .color
        .or_else(|| (series.len() == 1).then(|| Color::from_rgb8(8, 48, 107)));

    let mut figure = Figure::new(options.title.clone());
    for (((values, name), text), error) in series.into_iter().zip(names).zip(texts).zip(errors) {
        figure.push(BarTrace {
            name: Some(name),
            x: x.clone(),
            y: values.into(),
            marker: Marker {
                color,
                ..Default::default()
            },
            error,
            text,
            opacity: Some(0.6),
            show_legend: true,
            ..Default::default()
        });
    }

    figure.layout = Layout {
        x_axis: AxisSpec::new().with_title(options.x_label.clone()),
        y_axis: AxisSpec::new().with_title(options.y_label.clone()),
        shapes: options
            .lines
            .iter()
            .map(|&y| Shape::HLine {
                y,
                style: LineStyle::new(2.0)
                    .with_color(Color::BLACK)
                    .with_dash(Dash::Dash),
            })
            .collect(),
        width: options.width,
        ..Default::default()
    };

    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Trace;

    #[test]
    fn test_bar_plot_means_and_errors() {
        let groups = vec![vec![1.0, 2.0, 3.0], vec![4.0, 6.0]];
        let fig = bar_plot(&groups, &BarOptions::default().with_names(["a", "b"])).unwrap();

        let bars = fig.trace_named("BAR").unwrap().as_bar().unwrap();
        assert_eq!(bars.y.as_numbers(), Some(&[2.0, 5.0][..]));
        let error = bars.error.as_ref().unwrap();
        assert!((error[0] - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(error[1], 1.0);
        assert_eq!(bars.text.as_ref().unwrap()[0], "median= 2.0000");

        let points = fig.trace_named("b").unwrap().as_scatter().unwrap();
        assert_eq!(points.y.len(), 2);
        assert_eq!(fig.layout.bar_gap, Some(0.5));
        assert!(!fig.layout.show_legend);

        let y = fig.layout.y_axis.range.unwrap();
        assert_eq!(y, Range::new(0.0, 12.0));
    }

    #[test]
    fn test_bar_plot_drops_empty_groups() {
        let groups = vec![vec![1.0], vec![f64::NAN], vec![3.0]];
        let fig = bar_plot(&groups, &BarOptions::default()).unwrap();
        assert_eq!(
            fig.layout.x_axis.tick_labels,
            Some(vec!["1".to_string(), "3".to_string()])
        );
    }

    #[test]
    fn test_bar_plot_all_empty_is_error() {
        let err = bar_plot(&[vec![], vec![f64::NAN]], &BarOptions::default()).unwrap_err();
        assert!(matches!(err, PlotError::EmptyInput(_)));
    }

    #[test]
    fn test_bar_plot_two_group_stats() {
        let groups = vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![6.0, 7.0, 8.0, 9.0, 10.0],
        ];
        let options = BarOptions::default()
            .with_title("Groups")
            .with_tests(true, true);
        let fig = bar_plot(&groups, &options).unwrap();
        assert!(fig.title.starts_with("Groups. P(MW)="));
        assert!(fig.title.contains(". P(T-test)="));
    }

    #[test]
    fn test_bar_plot_box_mode() {
        let groups = vec![(0..=100).map(|x| x as f64).collect::<Vec<_>>()];
        let fig = bar_plot(&groups, &BarOptions::default().with_box_mode(true)).unwrap();

        assert!(fig.traces.iter().all(|t| t.as_bar().is_none()));
        let whiskers = fig.traces[1].as_scatter().unwrap();
        assert_eq!(whiskers.y.as_numbers(), Some(&[5.0, 95.0][..]));
        assert_eq!(whiskers.x.as_numbers(), Some(&[0.0, 0.0][..]));
    }

    #[test]
    fn test_prop_bar_plot() {
        let groups = vec![vec![true, true, false, false], vec![true]];
        let fig = prop_bar_plot(&groups, None, "Rates").unwrap();

        let bars = fig.traces[0].as_bar().unwrap();
        assert_eq!(bars.y.as_numbers(), Some(&[0.5, 1.0][..]));
        assert_eq!(bars.error.as_ref().unwrap(), &vec![0.25, 0.0]);
        assert_eq!(bars.text.as_ref().unwrap()[0], "N = 4");
    }

    #[test]
    fn test_basic_bar_plot_sorted() {
        let options = BasicBarOptions {
            x: Some(Values::Labels(vec!["a".into(), "b".into(), "c".into()])),
            text: BarText::Values,
            sort: true,
            lines: vec![1.5],
            ..Default::default()
        };
        let fig = basic_bar_plot(&[vec![1.0, 3.0, 2.0]], &options).unwrap();

        let Trace::Bar(bars) = &fig.traces[0] else {
            panic!("expected a bar trace");
        };
        assert_eq!(bars.y.as_numbers(), Some(&[3.0, 2.0, 1.0][..]));
        assert_eq!(
            bars.x,
            Values::Labels(vec!["b".into(), "c".into(), "a".into()])
        );
        assert_eq!(bars.text.as_ref().unwrap()[0], "3.000");
        assert_eq!(bars.marker.color, Some(Color::from_rgb8(8, 48, 107)));
        assert_eq!(fig.layout.shapes.len(), 1);
    }

    #[test]
    fn test_basic_bar_plot_sort_needs_single_series() {
        let options = BasicBarOptions {
            sort: true,
            ..Default::default()
        };
        let err = basic_bar_plot(&[vec![1.0], vec![2.0]], &options).unwrap_err();
        assert!(matches!(err, PlotError::InvalidConfig(_)));
    }
}

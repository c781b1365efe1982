//! Line bundles and mean lines with standard-deviation bands
//!
//! - [`multi_line`]: every row of a matrix as a line, optionally with the
//!   column mean ± std drawn beneath
//! - [`multi_mean`]: one mean line with a band per group of rows

use ndarray::{Array2, Axis};
use sciplot_stats::{mean_std, normalize_rows, NormMethod, Range};

use crate::axis::AxisSpec;
use crate::error::{validation, PlotError, PlotResult};
use crate::figure::{Dash, Figure, Fill, Layout, LineStyle, Marker, ScatterMode, ScatterTrace};
use crate::palette::{viridis, Color, SET1};

/// Options for [`multi_line`]
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLineOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Shared x positions; defaults to column indices
    pub x: Option<Vec<f64>>,
    /// Line names; defaults to "S_1", "S_2", ...
    pub names: Option<Vec<String>>,
    /// Color the points of a single line by these values
    pub z: Option<Vec<f64>>,
    /// Text over each point
    pub text: Option<Vec<String>>,
    /// Draw every row
    pub lines: bool,
    /// Draw the column mean with a ±std band
    pub mean: bool,
    /// Rescale every row first
    pub norm: Option<NormMethod>,
    pub mode: ScatterMode,
}

impl Default for MultiLineOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x: None,
            names: None,
            z: None,
            text: None,
            lines: true,
            mean: false,
            norm: None,
            mode: ScatterMode::Lines,
        }
    }
}

impl MultiLineOptions {
    pub fn with_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn with_mean(mut self, mean: bool) -> Self {
        self.mean = mean;
        self
    }
}

fn shared_x(x: Option<&Vec<f64>>, width: usize) -> PlotResult<Vec<f64>> {
    match x {
        Some(x) => {
            validation::validate_same_len("x positions", width, x.len())?;
            Ok(x.clone())
        }
        None => Ok((0..width).map(|i| i as f64).collect()),
    }
}

/// Map `z` onto viridis over its finite span
fn z_colors(z: &[f64]) -> Vec<Color> {
    let cmap = viridis();
    let span = Range::of_finite(z).unwrap_or(Range::EMPTY);
    z.iter()
        .map(|&v| {
            let t = if span.width() > 0.0 {
                (v - span.low) / span.width()
            } else {
                0.5
            };
            cmap.sample(t as f32)
        })
        .collect()
}

/// Column mean and population std over the finite values of each column
fn column_mean_std(data: &Array2<f64>) -> (Vec<f64>, Vec<f64>) {
    data.columns()
        .into_iter()
        .map(|col| {
            let finite: Vec<f64> = col.iter().copied().filter(|v| v.is_finite()).collect();
            mean_std(&finite)
        })
        .unzip()
}

/// Every row of `data` as a line
///
/// One line is drawn in blue with a legend entry; several lines take
/// palette colors and stay out of the legend. Coloring by `z` needs a
/// single row and switches to lines with markers.
pub fn multi_line(data: &Array2<f64>, options: &MultiLineOptions) -> PlotResult<Figure> {
    let (n_lines, width) = data.dim();
    if n_lines == 0 || width == 0 {
        return Err(PlotError::EmptyInput("line data has no rows or columns".to_string()));
    }
    let x = shared_x(options.x.as_ref(), width)?;
    let names = match &options.names {
        Some(names) => {
            validation::validate_same_len("line names", n_lines, names.len())?;
            names.clone()
        }
        None => (1..=n_lines).map(|i| format!("S_{}", i)).collect(),
    };
    let data = match options.norm {
        Some(method) => normalize_rows(data, method),
        None => data.clone(),
    };

    let mut mode = options.mode;
    let mut text = options.text.clone();
    let mut marker = Marker::default().with_size(6.0);
    let colors: Vec<Color> = match &options.z {
        Some(z) => {
            if n_lines != 1 {
                return Err(PlotError::InvalidConfig(format!(
                    "coloring by z needs a single line, got {}",
                    n_lines
                )));
            }
            validation::validate_same_len("z values", width, z.len())?;
            mode = ScatterMode::LinesMarkers;
            marker = marker.with_size(2.0);
            marker.colors = Some(z_colors(z));
            text.get_or_insert_with(|| (0..width).map(|i| format!("z={}", i)).collect());
            vec![Color::BLUE]
        }
        None if n_lines > 1 => SET1
            .iter()
            .cycle()
            .take(n_lines)
            .map(|&(r, g, b)| Color::from_rgb8(r, g, b))
            .collect(),
        None => vec![Color::BLUE],
    };
    if let Some(text) = &text {
        validation::validate_same_len("point text", width, text.len())?;
    }

    let mut figure = Figure::new(options.title.clone());

    if options.mean {
        let (mean, std) = column_mean_std(&data);
        let band = Color::from_rgb8(0, 100, 80).with_alpha(0.2);
        let upper = mean.iter().zip(&std).map(|(m, s)| m + s).collect();
        let lower = mean.iter().zip(&std).map(|(m, s)| m - s).collect();

        figure.push(
            ScatterTrace::line(x.clone(), mean, LineStyle::new(6.0))
                .named("Mean")
                .in_group("mean")
                .with_legend(true),
        );
        figure.push(
            ScatterTrace::line(x.clone(), upper, LineStyle::new(0.0).with_color(band))
                .named("upper bound")
                .in_group("mean")
                .with_opacity(0.7),
        );
        let mut lower = ScatterTrace::line(x.clone(), lower, LineStyle::new(0.0).with_color(band))
            .named("lower bound")
            .in_group("mean")
            .with_opacity(0.7);
        lower.fill = Fill::ToNextY { color: band };
        figure.push(lower);
    }

    if options.lines {
        for ((row, name), color) in data.rows().into_iter().zip(&names).zip(&colors) {
            let mut point_marker = marker.clone();
            point_marker.color = Some(*color);
            let mut trace =
                ScatterTrace::line(x.clone(), row.to_vec(), LineStyle::new(1.0).with_color(*color))
                    .named(name.clone())
                    .with_marker(point_marker)
                    .with_legend(n_lines == 1 && options.z.is_none());
            trace.mode = mode;
            trace.text = text.clone();
            figure.push(trace);
        }
    }

    figure.layout = Layout {
        x_axis: AxisSpec::new().with_title(options.x_label.clone()),
        y_axis: AxisSpec::new().with_title(options.y_label.clone()),
        ..Default::default()
    };

    Ok(figure)
}

/// Options for [`multi_mean`]
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMeanOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Shared x positions; defaults to column indices
    pub x: Option<Vec<f64>>,
    /// Group names; defaults to "#0", "#1", ...
    pub names: Option<Vec<String>>,
    /// Shade mean ± std
    pub plot_std: bool,
    /// Rescale every row before averaging
    pub norm: Option<NormMethod>,
    /// Also draw every row of each group
    pub individual: bool,
    /// Hover text of the individual rows
    pub individual_names: Option<Vec<String>>,
}

impl Default for MultiMeanOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x: None,
            names: None,
            plot_std: true,
            norm: None,
            individual: false,
            individual_names: None,
        }
    }
}

/// Column means of several row-per-observation matrices
///
/// Each group is drawn as its mean line (width 4) with a translucent
/// ±std band built from an upper trace and a lower trace filled up to it.
/// Every group must have the same number of columns.
pub fn multi_mean(groups: &[Array2<f64>], options: &MultiMeanOptions) -> PlotResult<Figure> {
    validation::validate_not_empty("mean groups", groups)?;
    let width = groups[0].ncols();
    for g in groups {
        validation::validate_same_len("group columns", width, g.ncols())?;
    }
    let names = match &options.names {
        Some(names) => {
            validation::validate_same_len("group names", groups.len(), names.len())?;
            names.clone()
        }
        None => (0..groups.len()).map(|i| format!("#{}", i)).collect(),
    };
    let x = shared_x(options.x.as_ref(), width)?;

    let mut figure = Figure::new(options.title.clone());

    for (i, (group, name)) in groups.iter().zip(&names).enumerate() {
        let data = match options.norm {
            Some(method) => normalize_rows(group, method),
            None => group.clone(),
        };
        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| PlotError::EmptyInput(format!("group {} has no rows", name)))?;
        let std = data.std_axis(Axis(0), 0.0);

        let (r, g, b) = SET1[i % SET1.len()];
        let color = Color::from_rgb8(r, g, b);
        let band = color.with_alpha(0.2);

        figure.push(
            ScatterTrace::line(x.clone(), mean.to_vec(), LineStyle::new(4.0).with_color(color))
                .named(name.clone())
                .in_group(name.clone())
                .with_legend(true),
        );

        if options.plot_std {
            let upper = (&mean + &std).to_vec();
            let lower = (&mean - &std).to_vec();
            figure.push(
                ScatterTrace::line(x.clone(), upper, LineStyle::new(0.0).with_color(band))
                    .named(format!("{} UB", name))
                    .in_group(name.clone())
                    .with_opacity(0.7),
            );
            let mut lower =
                ScatterTrace::line(x.clone(), lower, LineStyle::new(0.0).with_color(band))
                    .named(format!("{} LB", name))
                    .in_group(name.clone())
                    .with_opacity(0.7);
            lower.fill = Fill::ToNextY { color: band };
            figure.push(lower);
        }

        if options.individual && data.nrows() > 1 {
            push_individual(&mut figure, &data, &x, name, color, options);
        }
    }

    figure.layout = Layout {
        x_axis: AxisSpec::new().with_title(options.x_label.clone()),
        y_axis: AxisSpec::new().with_title(options.y_label.clone()),
        ..Default::default()
    };

    Ok(figure)
}

fn push_individual(
    figure: &mut Figure,
    data: &Array2<f64>,
    x: &[f64],
    name: &str,
    color: Color,
    options: &MultiMeanOptions,
) {
    let group = format!("{} |", name);
    for (row_idx, row) in data.rows().into_iter().enumerate() {
        let mut trace = ScatterTrace::line(
            x.to_vec(),
            row.to_vec(),
            LineStyle::new(1.0).with_color(color).with_dash(Dash::Dot),
        )
        .named(group.clone())
        .in_group(group.clone())
        .with_opacity(0.3)
        .with_legend(row_idx == 0);
        if let Some(label) = options
            .individual_names
            .as_ref()
            .and_then(|names| names.get(row_idx))
        {
            trace = trace.with_hover_text(label.clone());
        }
        figure.push(trace);
    }
}

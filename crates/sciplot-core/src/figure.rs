//! Figure model
//!
//! A [`Figure`] is a renderer-neutral description: traces plus a layout.
//! Chart builders in [`crate::charts`] assemble these from statistics; a
//! front end serializes them (serde) and draws them however it likes.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::axis::AxisSpec;
use crate::error::PlotResult;
use crate::palette::Color;

/// Coordinates along one trace dimension
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Values {
    Numbers(Vec<f64>),
    Labels(Vec<String>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Numbers(v) => v.len(),
            Values::Labels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric coordinates, `None` for labels
    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            Values::Numbers(v) => Some(v),
            Values::Labels(_) => None,
        }
    }
}

impl Default for Values {
    fn default() -> Self {
        Values::Numbers(Vec::new())
    }
}

impl From<Vec<f64>> for Values {
    fn from(v: Vec<f64>) -> Self {
        Values::Numbers(v)
    }
}

impl From<Vec<String>> for Values {
    fn from(v: Vec<String>) -> Self {
        Values::Labels(v)
    }
}

/// Bar direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Axes a trace is plotted against
///
/// Secondary axes hold marginal panels beside the main plot; their extent
/// is set by the [`AxisSpec::domain`] of `x_axis2` and `y_axis2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisPair {
    #[default]
    Primary,
    /// Shared x axis, secondary y axis (a panel above)
    SecondaryY,
    /// Secondary x axis, shared y axis (a panel to the right)
    SecondaryX,
}

/// What a scatter trace draws at its points
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScatterMode {
    #[default]
    Markers,
    Lines,
    LinesMarkers,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSymbol {
    #[default]
    Circle,
    Square,
    Diamond,
}

/// Point styling
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: Option<Color>,
    /// Per-point colors; overrides `color`
    pub colors: Option<Vec<Color>>,
    pub size: Option<f64>,
    pub symbol: MarkerSymbol,
    /// Outline around each marker or bar
    pub outline: Option<LineStyle>,
}

impl Marker {
    pub fn colored(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_symbol(mut self, symbol: MarkerSymbol) -> Self {
        self.symbol = symbol;
        self
    }

    pub fn with_outline(mut self, outline: LineStyle) -> Self {
        self.outline = Some(outline);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    #[default]
    Solid,
    Dash,
    Dot,
}

/// Line styling
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Option<Color>,
    pub width: f64,
    pub dash: Dash,
}

impl LineStyle {
    pub fn new(width: f64) -> Self {
        Self {
            color: None,
            width,
            dash: Dash::Solid,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_dash(mut self, dash: Dash) -> Self {
        self.dash = dash;
        self
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::new(2.0)
    }
}

/// Area fill below a scatter line
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    #[default]
    None,
    /// Fill down to the previous trace, drawing a band
    ToNextY { color: Color },
}

/// Bars at x positions with heights y
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub name: Option<String>,
    pub x: Values,
    pub y: Values,
    pub orientation: Orientation,
    pub marker: Marker,
    /// Symmetric error bar half-lengths
    pub error: Option<Vec<f64>>,
    /// Text drawn on each bar
    pub text: Option<Vec<String>>,
    pub opacity: Option<f64>,
    pub legend_group: Option<String>,
    pub show_legend: bool,
    #[serde(default)]
    pub axes: AxisPair,
}

/// Points and/or lines
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    pub name: Option<String>,
    pub x: Values,
    pub y: Values,
    pub mode: ScatterMode,
    pub marker: Marker,
    pub line: Option<LineStyle>,
    pub fill: Fill,
    /// Per-point text
    pub text: Option<Vec<String>>,
    /// Hover text shared by every point
    pub hover_text: Option<String>,
    pub opacity: Option<f64>,
    pub legend_group: Option<String>,
    pub show_legend: bool,
}

impl ScatterTrace {
    /// Marker-only trace
    pub fn markers(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            mode: ScatterMode::Markers,
            ..Default::default()
        }
    }

    /// Line-only trace
    pub fn line(x: Vec<f64>, y: Vec<f64>, style: LineStyle) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            mode: ScatterMode::Lines,
            line: Some(style),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.legend_group = Some(group.into());
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_hover_text(mut self, text: impl Into<String>) -> Self {
        self.hover_text = Some(text.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }
}

/// Color-coded matrix
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatmapTrace {
    pub name: Option<String>,
    pub x: Values,
    pub y: Values,
    /// Row-major cells; `z[row][col]` sits at `(x[col], y[row])`
    pub z: Vec<Vec<f64>>,
    pub color_scale: Vec<(f64, Color)>,
    /// Title of the color bar
    pub z_title: Option<String>,
    /// Text drawn in each cell
    pub cell_text: Option<Vec<Vec<String>>>,
    /// Hover text per cell
    pub hover_text: Option<Vec<Vec<String>>>,
    pub show_scale: bool,
    /// Draw as filled contours with this many levels instead of cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contours: Option<usize>,
}

impl HeatmapTrace {
    /// Convert a matrix into row-major cells
    pub fn rows_of(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
        matrix.rows().into_iter().map(|row| row.to_vec()).collect()
    }
}

/// One drawable layer of a figure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    Scatter(ScatterTrace),
    Heatmap(HeatmapTrace),
}

impl Trace {
    pub fn name(&self) -> Option<&str> {
        match self {
            Trace::Bar(t) => t.name.as_deref(),
            Trace::Scatter(t) => t.name.as_deref(),
            Trace::Heatmap(t) => t.name.as_deref(),
        }
    }

    pub fn as_scatter(&self) -> Option<&ScatterTrace> {
        match self {
            Trace::Scatter(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_bar(&self) -> Option<&BarTrace> {
        match self {
            Trace::Bar(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_heatmap(&self) -> Option<&HeatmapTrace> {
        match self {
            Trace::Heatmap(t) => Some(t),
            _ => None,
        }
    }
}

impl From<BarTrace> for Trace {
    fn from(t: BarTrace) -> Self {
        Trace::Bar(t)
    }
}

impl From<ScatterTrace> for Trace {
    fn from(t: ScatterTrace) -> Self {
        Trace::Scatter(t)
    }
}

impl From<HeatmapTrace> for Trace {
    fn from(t: HeatmapTrace) -> Self {
        Trace::Heatmap(t)
    }
}

/// How bars at the same position combine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    #[default]
    Group,
    Overlay,
}

/// Text placed on the figure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Coordinates are fractions of the plotting area rather than data units
    pub paper: bool,
    pub show_arrow: bool,
}

impl Annotation {
    /// Arrowless text at paper coordinates
    pub fn paper(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            paper: true,
            show_arrow: false,
        }
    }
}

/// Reference lines spanning the plot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    /// Horizontal line across the full width at `y`
    HLine { y: f64, style: LineStyle },
    /// Vertical line across the full height at `x`
    VLine { x: f64, style: LineStyle },
}

/// Figure-wide layout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub bar_mode: BarMode,
    /// Gap between bars as a fraction of the bar slot
    pub bar_gap: Option<f64>,
    pub show_legend: bool,
    /// Hover picks the closest point rather than the x column
    pub hover_closest: bool,
    pub annotations: Vec<Annotation>,
    pub shapes: Vec<Shape>,
    /// Width in pixels; `None` lets the front end decide
    pub width: Option<u32>,
    /// Axes of marginal panels, see [`AxisPair`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis2: Option<AxisSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis2: Option<AxisSpec>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            x_axis: AxisSpec::default(),
            y_axis: AxisSpec::default(),
            bar_mode: BarMode::Group,
            bar_gap: None,
            show_legend: true,
            hover_closest: true,
            annotations: Vec::new(),
            shapes: Vec::new(),
            width: None,
            x_axis2: None,
            y_axis2: None,
        }
    }
}

/// A complete figure
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub traces: Vec<Trace>,
    pub layout: Layout,
    /// Parts of the figure that were requested but could not be built
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn push(&mut self, trace: impl Into<Trace>) {
        self.traces.push(trace.into());
    }

    pub fn extend<T: Into<Trace>>(&mut self, traces: impl IntoIterator<Item = T>) {
        self.traces.extend(traces.into_iter().map(Into::into));
    }

    /// Record an omitted part of the figure
    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    /// Append ` P_name=value` for each test to the title
    pub fn append_title_stats(&mut self, stats: &[(&str, f64)]) {
        for (name, p) in stats {
            self.title.push_str(&format!(" P_{}={}", name, format_p_value(*p)));
        }
    }

    /// Traces of one kind, by name
    pub fn trace_named(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name() == Some(name))
    }

    pub fn to_json(&self) -> PlotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PlotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Three decimals, or scientific notation below 0.001
pub fn format_p_value(p: f64) -> String {
    if p != 0.0 && p.abs() < 1e-3 {
        format!("{:.2e}", p)
    } else {
        format!("{:.3}", p)
    }
}

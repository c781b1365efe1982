//! Lightweight box plots drawn from precomputed [`BoxStats`]

use sciplot_stats::BoxStats;

use crate::figure::{
    LineStyle, Marker, MarkerSymbol, Orientation, ScatterMode, ScatterTrace, Trace,
};
use crate::palette::Color;

/// Placement and styling of one box
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStyle {
    pub name: String,
    pub color: Color,
    /// Horizontal boxes run along x and sit at `offset` on y
    pub orientation: Orientation,
    /// Position on the axis across the box
    pub offset: f64,
    /// Width of the quartile bar
    pub width: f64,
    pub legend_group: Option<String>,
    /// Show the quartile bar in the legend
    pub show_legend: bool,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            name: "boxplot".to_string(),
            color: Color::BLUE,
            orientation: Orientation::Horizontal,
            offset: 0.0,
            width: 8.0,
            legend_group: None,
            show_legend: false,
        }
    }
}

impl BoxStyle {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn at(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn vertical(mut self) -> Self {
        self.orientation = Orientation::Vertical;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.legend_group = Some(group.into());
        self
    }

    pub fn with_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    fn trace(&self, along: Vec<f64>) -> ScatterTrace {
        let across = vec![self.offset; along.len()];
        let (x, y) = match self.orientation {
            Orientation::Horizontal => (along, across),
            Orientation::Vertical => (across, along),
        };
        let mut trace = ScatterTrace::markers(x, y).named(self.name.clone());
        trace.legend_group = Some(
            self.legend_group
                .clone()
                .unwrap_or_else(|| self.name.clone()),
        );
        trace
    }

    fn segment(&self, along: Vec<f64>, width: f64) -> ScatterTrace {
        let mut trace = self.trace(along);
        trace.mode = ScatterMode::Lines;
        trace.line = Some(LineStyle::new(width).with_color(self.color));
        trace
    }
}

/// Traces for one box
///
/// Quartile bar, whisker line, median square, then the mean diamond and
/// outlier dots when present. Every trace shares the style's legend group.
pub fn box_traces(stats: &BoxStats, style: &BoxStyle) -> Vec<Trace> {
    let hover = stats.describe();
    let mut traces = Vec::with_capacity(5);

    let quartiles = style.segment(vec![stats.q1, stats.q3], style.width);
    traces.push(
        quartiles
            .with_hover_text(hover.clone())
            .with_opacity(0.4)
            .with_legend(style.show_legend)
            .into(),
    );

    let whiskers = style.segment(vec![stats.whiskers.low, stats.whiskers.high], 2.0);
    traces.push(whiskers.with_hover_text(hover.clone()).with_opacity(0.4).into());

    traces.push(
        style
            .trace(vec![stats.median])
            .with_marker(
                Marker::colored(Color::BLACK)
                    .with_symbol(MarkerSymbol::Square)
                    .with_size(8.0),
            )
            .with_hover_text(hover.clone())
            .into(),
    );

    if let Some(mean) = stats.mean {
        traces.push(
            style
                .trace(vec![mean])
                .with_marker(
                    Marker::colored(Color::WHITE)
                        .with_symbol(MarkerSymbol::Diamond)
                        .with_size(8.0)
                        .with_outline(LineStyle::new(1.0).with_color(Color::BLACK)),
                )
                .with_hover_text(hover)
                .into(),
        );
    }

    if !stats.outliers.is_empty() {
        traces.push(
            style
                .trace(stats.outliers.clone())
                .with_marker(Marker::colored(style.color).with_size(2.0))
                .into(),
        );
    }

    traces
}

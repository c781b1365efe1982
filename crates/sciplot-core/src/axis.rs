//! Axis descriptions for figure layouts
//!
//! An axis either follows its data (`autorange`) or is pinned to an explicit
//! [`Range`]. Categorical axes carry tick values with matching labels.

use sciplot_stats::Range;
use serde::{Deserialize, Serialize};

/// Scale type for an axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    #[default]
    Linear,
    Log,
}

/// How the renderer should pick the axis limits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoRange {
    /// Fit the data
    #[default]
    Auto,
    /// Use the explicit range
    Fixed,
    /// Fit the data, high values first
    Reversed,
}

/// Configuration for one axis
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Axis title
    pub title: Option<String>,

    /// Explicit limits, used unless `autorange` is [`AutoRange::Auto`] or
    /// [`AutoRange::Reversed`]
    pub range: Option<Range>,

    pub autorange: AutoRange,

    pub scale: ScaleType,

    /// Tick positions for categorical axes
    pub tick_values: Option<Vec<f64>>,

    /// Labels drawn at `tick_values`
    pub tick_labels: Option<Vec<String>>,

    /// Fraction of the figure the axis spans, `(start, end)` in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<(f64, f64)>,
}

impl AxisSpec {
    /// Create an auto-ranged axis
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the axis title; an empty title leaves it unset
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = (!title.is_empty()).then_some(title);
        self
    }

    /// Pin the axis to a range
    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self.autorange = AutoRange::Fixed;
        self
    }

    /// Keep a suggested range but let the renderer fit the data
    pub fn with_suggested_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self.autorange = AutoRange::Auto;
        self
    }

    /// Draw high values first (top-to-bottom for a y axis)
    pub fn reversed(mut self) -> Self {
        self.autorange = AutoRange::Reversed;
        self
    }

    /// Set logarithmic scale
    pub fn with_log_scale(mut self) -> Self {
        self.scale = ScaleType::Log;
        self
    }

    /// Label integer positions `0..labels.len()`
    pub fn with_categories<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        self.tick_values = Some((0..labels.len()).map(|i| i as f64).collect());
        self.tick_labels = Some(labels);
        self
    }

    /// Confine the axis to part of the figure
    pub fn with_domain(mut self, start: f64, end: f64) -> Self {
        self.domain = Some((start.clamp(0.0, 1.0), end.clamp(0.0, 1.0)));
        self
    }

    /// Whether the renderer should compute the limits itself
    pub fn is_auto(&self) -> bool {
        self.autorange != AutoRange::Fixed
    }
}

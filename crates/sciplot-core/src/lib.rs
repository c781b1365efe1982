//! sciplot-core - Typed figure builders for scientific data
//!
//! Chart builders turn raw samples into renderer-neutral [`Figure`]s using
//! the statistics in `sciplot-stats`. Outliers are detected once per sample
//! and drive both the axis range and what is drawn.
//!
//! # Key Components
//!
//! - **Figure**: traces (bars, scatters, heatmaps) plus layout, serializable with serde
//! - **Charts**: histograms, box plots, bar plots, correlation scatters,
//!   scatters with marginal histograms, line bundles, mean-with-band lines,
//!   heatmaps, 2D histograms, confusion matrices, ROC/PR curves
//! - **Config**: chart defaults loadable from TOML or JSON
//! - **Layout**: dashboard column widths and grid placement
//! - **Sampling**: seeded subsampling and jitter for point clouds
//!
//! # Failure policy
//!
//! Invalid input returns a [`PlotError`]. A statistic that only decorates a
//! figure (a fit line, a p-value in the title) is skipped with a warning and
//! recorded in [`Figure::notes`] instead.

pub mod axis;
pub mod charts;
pub mod config;
pub mod error;
pub mod figure;
pub mod layout;
pub mod palette;
pub mod sampling;

pub use axis::{AutoRange, AxisSpec, ScaleType};
pub use charts::*;
pub use config::{BarConfig, CorrelationConfig, HistogramConfig, LayoutConfig, PlotConfig};
pub use error::{PlotError, PlotResult};
pub use figure::{
    Annotation, AxisPair, BarMode, BarTrace, Figure, HeatmapTrace, Layout, LineStyle, Marker,
    ScatterMode, ScatterTrace, Shape, Trace, Values,
};
pub use layout::{column_widths, row_widths, DashboardGrid};
pub use palette::{Color, Colormap};
pub use sampling::SeededRng;

pub use sciplot_stats::{OutlierOptions, OutlierSummary, Range};

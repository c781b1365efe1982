//! Chart builders
//!
//! Each builder takes raw samples plus a typed options struct and returns a
//! [`Figure`](crate::figure::Figure). Options default to the values in
//! [`PlotConfig`](crate::config::PlotConfig) and can be seeded from a loaded
//! config with `from_config`.
//!
//! Statistics that cannot be computed for an optional part of a figure
//! (a fit line, a p-value in the title) drop that part, log a warning and
//! leave a note on the figure. Invalid input is an error.

pub mod bar;
pub mod box_plot;
pub mod corr;
pub mod heatmap;
pub mod hist;
pub mod line;
pub mod roc;
pub mod scatter_histo;

pub use bar::{bar_plot, basic_bar_plot, prop_bar_plot, BarOptions, BarText, BasicBarOptions};
pub use box_plot::{box_traces, BoxStyle};
pub use corr::{corr_plot, CorrOptions, XySeries};
pub use heatmap::{
    basic_heatmap, confusion_figure, hist2d, BasicHeatmapOptions, ConfusionOptions,
    Hist2dFigureOptions,
};
pub use hist::{histogram, two_histograms, HistogramOptions, TwoHistogramOptions};
pub use line::{multi_line, multi_mean, MultiLineOptions, MultiMeanOptions};
pub use roc::{one_hot, pr_figure, roc_figure, RocOptions};
pub use scatter_histo::{scatter_histo, ScatterHistoOptions};

use crate::figure::Figure;

/// Run an optional statistic; on failure log it and note the omission
pub(crate) fn optional_stat<T, E: std::fmt::Display>(
    figure: &mut Figure,
    what: &str,
    result: Result<T, E>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Omitting {}: {}", what, e);
            figure.note(format!("{} omitted: {}", what, e));
            None
        }
    }
}

/// Finite values of a sample, in order
pub(crate) fn finite_values(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|x| x.is_finite()).collect()
}

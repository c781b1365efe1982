//! Configuration for sciplot-core
//!
//! Default parameters for every chart builder, loadable from JSON or TOML.
//! Chart option structs are seeded from here via their `from_config`
//! constructors.

use sciplot_stats::OutlierOptions;
use serde::{Deserialize, Serialize};

use crate::error::{validation, PlotError, PlotResult};

/// Plot-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Fraction added on each side of computed axis ranges
    pub range_padding: RangePadding,
    /// Outlier summary parameters shared by distribution plots
    pub outliers: OutlierOptions,
    /// Histogram settings
    pub histogram: HistogramConfig,
    /// Bar plot settings
    pub bar: BarConfig,
    /// Correlation plot settings
    pub correlation: CorrelationConfig,
    /// Dashboard layout settings
    pub layout: LayoutConfig,
}

/// Histogram configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Number of bins
    pub bins: usize,
    /// Plot a probability density rather than counts
    pub density: bool,
    /// Maximum points in the data strip above the bars
    pub max_scatter_points: usize,
    /// Strip jitter as a fraction of the tallest bar
    pub jitter: f64,
    /// Maximum strip points per sample when two histograms are overlaid
    pub pair_max_scatter_points: usize,
    /// Strip jitter for overlaid histograms
    pub pair_jitter: f64,
    /// Seed for subsampling and jitter
    pub seed: u64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bins: 40,
            density: true,
            max_scatter_points: 1000,
            jitter: 0.02,
            pair_max_scatter_points: 500,
            pair_jitter: 0.03,
            seed: 0,
        }
    }
}

/// Bar plot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Maximum points drawn beside each bar
    pub max_points: usize,
    /// Horizontal jitter of the points, in bar slots
    pub jitter: f64,
    /// Seed for subsampling and jitter
    pub seed: u64,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            max_points: 500,
            jitter: 0.03,
            seed: 0,
        }
    }
}

/// Correlation plot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Maximum points drawn per series
    pub max_points: usize,
    /// Fit line inset from the data's x extremes, as a fraction of the span
    pub edge_shift: f64,
    /// Seed for subsampling
    pub seed: u64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            max_points: 2000,
            edge_shift: 0.03,
            seed: 0,
        }
    }
}

/// Dashboard layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Minimum column width in percent
    pub min_column_width: u32,
    /// Maximum column width in percent
    pub max_column_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_column_width: 18,
            max_column_width: 50,
        }
    }
}

/// Axis padding fraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangePadding(pub f64);

impl Default for RangePadding {
    fn default() -> Self {
        Self(sciplot_stats::DEFAULT_PADDING)
    }
}

impl PlotConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> PlotResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> PlotResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> PlotResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> PlotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> PlotResult<()> {
        self.outliers.validate()?;

        if self.histogram.bins == 0 {
            return Err(PlotError::InvalidConfig(
                "histogram.bins must be positive".to_string(),
            ));
        }

        for (name, jitter) in [
            ("histogram.jitter", self.histogram.jitter),
            ("histogram.pair_jitter", self.histogram.pair_jitter),
            ("bar.jitter", self.bar.jitter),
        ] {
            if !jitter.is_finite() || jitter < 0.0 {
                return Err(PlotError::InvalidConfig(format!(
                    "{} must be a non-negative number",
                    name
                )));
            }
        }

        if !(0.0..0.5).contains(&self.correlation.edge_shift) {
            return Err(PlotError::InvalidConfig(
                "correlation.edge_shift must be in [0, 0.5)".to_string(),
            ));
        }

        validation::validate_percent_pair(
            "layout column width",
            self.layout.min_column_width as f64,
            self.layout.max_column_width as f64,
        )?;

        if !self.range_padding.0.is_finite() || self.range_padding.0 < 0.0 {
            return Err(PlotError::InvalidConfig(
                "range_padding must be a non-negative number".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.histogram.bins, 40);
        assert_eq!(config.range_padding.0, 0.05);
    }

    #[test]
    fn test_json_serialization() {
        let config = PlotConfig::default();
        let json = config.to_json().unwrap();
        let parsed = PlotConfig::from_json(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_toml_partial_sections() {
        let config = PlotConfig::from_toml(
            r#"
            range_padding = 0.1

            [histogram]
            bins = 20

            [outliers]
            sigma_bound = 4.0
            percentile_clip = [1.0, 99.0]
            remove = true
            "#,
        )
        .unwrap();

        assert_eq!(config.histogram.bins, 20);
        assert!(config.histogram.density);
        assert_eq!(config.outliers.sigma_bound, 4.0);
        assert!(config.outliers.remove);
        assert_eq!(config.range_padding.0, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PlotConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(PlotConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_outliers() {
        let mut config = PlotConfig::default();
        config.outliers.percentile_clip = (95.0, 5.0);
        assert!(matches!(config.validate(), Err(PlotError::Stats(_))));
    }

    #[test]
    fn test_invalid_layout() {
        let mut config = PlotConfig::default();
        config.layout.min_column_width = 60;
        assert!(matches!(config.validate(), Err(PlotError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            PlotConfig::from_json("{not json"),
            Err(PlotError::Json(_))
        ));
    }
}

//! Error types for sciplot-core
//!
//! Covers:
//! - Statistical failures bubbling up from sciplot-stats
//! - Malformed figure input (mismatched shapes, empty groups)
//! - Configuration parsing and validation

use sciplot_stats::StatsError;
use thiserror::Error;

/// Main error type for figure building
#[derive(Error, Debug)]
pub enum PlotError {
    /// Statistics could not be computed
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Inputs whose shapes must agree do not
    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: String,
        actual: String,
    },

    /// Nothing to plot
    #[error("No data to plot: {0}")]
    EmptyInput(String),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Result type alias for figure building
pub type PlotResult<T> = Result<T, PlotError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate that two paired inputs have the same length
    pub fn validate_same_len(what: &str, expected: usize, actual: usize) -> PlotResult<()> {
        if expected != actual {
            return Err(PlotError::ShapeMismatch {
                what: what.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }

    /// Validate that there is at least one series to draw
    pub fn validate_not_empty<T>(what: &str, items: &[T]) -> PlotResult<()> {
        if items.is_empty() {
            return Err(PlotError::EmptyInput(what.to_string()));
        }
        Ok(())
    }

    /// Validate a percentage bound pair (min <= max, both within 0..=100)
    pub fn validate_percent_pair(what: &str, min: f64, max: f64) -> PlotResult<()> {
        let in_bounds = |v: f64| (0.0..=100.0).contains(&v);
        if !in_bounds(min) || !in_bounds(max) || min > max {
            return Err(PlotError::InvalidConfig(format!(
                "{} must satisfy 0 <= min <= max <= 100, got {}..{}",
                what, min, max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_error_converts() {
        let err: PlotError = StatsError::SingleClass.into();
        assert!(matches!(err, PlotError::Stats(StatsError::SingleClass)));
        assert!(err.to_string().starts_with("Statistics error"));
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = PlotError::ShapeMismatch {
            what: "scores".to_string(),
            expected: "10".to_string(),
            actual: "9".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("scores"));
        assert!(text.contains("10"));
        assert!(text.contains("9"));
    }

    #[test]
    fn test_validate_same_len() {
        assert!(validation::validate_same_len("x", 3, 3).is_ok());
        assert!(validation::validate_same_len("x", 3, 4).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validation::validate_not_empty::<f64>("groups", &[]).is_err());
        assert!(validation::validate_not_empty("groups", &[1]).is_ok());
    }

    #[test]
    fn test_validate_percent_pair() {
        assert!(validation::validate_percent_pair("column width", 10.0, 50.0).is_ok());
        assert!(validation::validate_percent_pair("column width", 60.0, 50.0).is_err());
        assert!(validation::validate_percent_pair("column width", 0.0, 120.0).is_err());
    }
}

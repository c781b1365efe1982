//! Error types for sciplot-stats
//!
//! Degenerate samples (empty, all non-finite, zero variance) are not errors
//! for the summarizer; these variants cover invalid parameters and
//! statistics that are undefined for the data they were given.

use thiserror::Error;

/// Errors raised by statistical routines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Percentile clip pair must satisfy 0 <= low < high <= 100
    #[error("Invalid percentile clip [{low}, {high}]: expected 0 <= low < high <= 100")]
    InvalidPercentileClip { low: f64, high: f64 },

    /// Sigma bound must be positive
    #[error("Invalid sigma bound {0}: must be positive")]
    InvalidSigmaBound(f64),

    /// A single percentile outside [0, 100]
    #[error("Invalid percentile {0}: must be within [0, 100]")]
    InvalidPercentile(f64),

    /// Not enough finite observations for the statistic
    #[error("Insufficient data: need at least {needed} finite values, got {actual}")]
    InsufficientData { needed: usize, actual: usize },

    /// Paired inputs of different lengths
    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Statistic is undefined because the data has no spread
    #[error("Zero variance: {0} is undefined")]
    ZeroVariance(&'static str),

    /// Bad binning request
    #[error("Invalid bins: {0}")]
    InvalidBins(String),

    /// Range with low > high or non-finite ends
    #[error("Invalid range [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },

    /// Classifier curves need both positive and negative labels
    #[error("Only one class present in labels")]
    SingleClass,

    /// Class label beyond the declared number of classes
    #[error("Class {class} out of range for {n_classes} classes")]
    ClassOutOfRange { class: usize, n_classes: usize },

    /// Trapezoid integration over non-monotonic x
    #[error("x values are neither increasing nor decreasing")]
    NonMonotonic,
}

/// Result type alias for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;

/// Parameter checks shared by several modules
pub(crate) mod validation {
    use super::*;

    /// Validate a single percentile in [0, 100]
    pub fn validate_percentile(p: f64) -> StatsResult<()> {
        if !(0.0..=100.0).contains(&p) {
            return Err(StatsError::InvalidPercentile(p));
        }
        Ok(())
    }

    /// Validate that two paired inputs have the same length
    pub fn validate_paired(left: usize, right: usize) -> StatsResult<()> {
        if left != right {
            return Err(StatsError::LengthMismatch { left, right });
        }
        Ok(())
    }

    /// Validate a minimum number of observations
    pub fn validate_min_len(actual: usize, needed: usize) -> StatsResult<()> {
        if actual < needed {
            return Err(StatsError::InsufficientData { needed, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_clip_display() {
        let err = StatsError::InvalidPercentileClip {
            low: 95.0,
            high: 5.0,
        };
        assert!(err.to_string().contains("[95, 5]"));
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = StatsError::InsufficientData {
            needed: 3,
            actual: 1,
        };
        assert!(err.to_string().contains("at least 3"));
    }

    #[test]
    fn test_validate_percentile() {
        assert!(validation::validate_percentile(0.0).is_ok());
        assert!(validation::validate_percentile(100.0).is_ok());
        assert!(validation::validate_percentile(-1.0).is_err());
        assert!(validation::validate_percentile(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_paired() {
        assert!(validation::validate_paired(3, 3).is_ok());
        assert_eq!(
            validation::validate_paired(3, 4),
            Err(StatsError::LengthMismatch { left: 3, right: 4 })
        );
    }
}

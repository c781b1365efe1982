//! Row-wise rescaling of data matrices

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::summary::mean_std;

/// How each row of a matrix is rescaled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormMethod {
    /// Subtract the row mean and divide by the population standard deviation
    #[default]
    ZScore,
    /// Map the row minimum to 0 and maximum to 1
    MinMax,
    /// Divide by the largest absolute value
    MaxAbs,
}

/// Rescale each row independently
///
/// Non-finite entries are ignored when computing row statistics and are
/// passed through unchanged. Rows with no spread become all zeros.
pub fn normalize_rows(matrix: &Array2<f64>, method: NormMethod) -> Array2<f64> {
    let mut out = matrix.clone();
    for mut row in out.axis_iter_mut(Axis(0)) {
        let finite: Vec<f64> = row.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            continue;
        }

        let (shift, scale) = match method {
            NormMethod::ZScore => mean_std(&finite),
            NormMethod::MinMax => {
                let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
                let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (min, max - min)
            }
            NormMethod::MaxAbs => {
                let max_abs = finite.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
                (0.0, max_abs)
            }
        };

        row.mapv_inplace(|v| {
            if !v.is_finite() {
                v
            } else if scale > 0.0 {
                (v - shift) / scale
            } else {
                0.0
            }
        });
    }
    out
}

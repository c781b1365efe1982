//! Correlation and least-squares line fits
//!
//! Pairs where either coordinate is non-finite are dropped before any
//! statistic is computed. P-values test against zero correlation using a
//! t distribution with n - 2 degrees of freedom.

use serde::{Deserialize, Serialize};

use crate::error::{validation, StatsError, StatsResult};
use crate::special::student_t_sf;

/// Correlation coefficient with its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub r: f64,
    pub p_value: f64,
}

/// Ordinary least-squares fit of y on x
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient
    pub r: f64,
    /// Two-sided p-value for a zero slope
    pub p_value: f64,
    /// Standard error of the slope
    pub std_err: f64,
    /// Number of pairs used
    pub n: usize,
}

impl LinearFit {
    /// Fitted y at x
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ranks starting at 1; ties share the average of the ranks they span
pub fn rank_average(data: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0.0; data.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && data[order[end]] == data[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Sum of t^3 - t over groups of tied values
pub(crate) fn tie_term(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
        .chunk_by(|a, b| a == b)
        .map(|group| {
            let t = group.len() as f64;
            t * t * t - t
        })
        .sum()
}

pub(crate) fn finite_pairs(x: &[f64], y: &[f64]) -> StatsResult<(Vec<f64>, Vec<f64>)> {
    validation::validate_paired(x.len(), y.len())?;
    Ok(x.iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .unzip())
}

struct Moments {
    n: f64,
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

fn moments(x: &[f64], y: &[f64]) -> Moments {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    Moments {
        n,
        mean_x,
        mean_y,
        sxx,
        syy,
        sxy,
    }
}

fn correlation_p_value(r: f64, n: f64) -> f64 {
    let df = n - 2.0;
    let denom = (1.0 - r) * (1.0 + r);
    if denom <= 0.0 {
        return 0.0;
    }
    let t = r * (df / denom).sqrt();
    (2.0 * student_t_sf(t.abs(), df)).min(1.0)
}

fn pearson_unchecked(x: &[f64], y: &[f64]) -> StatsResult<Correlation> {
    validation::validate_min_len(x.len(), 3)?;
    let m = moments(x, y);
    if m.sxx == 0.0 || m.syy == 0.0 {
        return Err(StatsError::ZeroVariance("correlation"));
    }
    let r = (m.sxy / (m.sxx * m.syy).sqrt()).clamp(-1.0, 1.0);
    Ok(Correlation {
        r,
        p_value: correlation_p_value(r, m.n),
    })
}

/// Pearson product-moment correlation
pub fn pearson(x: &[f64], y: &[f64]) -> StatsResult<Correlation> {
    let (x, y) = finite_pairs(x, y)?;
    pearson_unchecked(&x, &y)
}

/// Spearman rank correlation
pub fn spearman(x: &[f64], y: &[f64]) -> StatsResult<Correlation> {
    let (x, y) = finite_pairs(x, y)?;
    pearson_unchecked(&rank_average(&x), &rank_average(&y))
}

/// Least-squares line through the pairs
pub fn linregress(x: &[f64], y: &[f64]) -> StatsResult<LinearFit> {
    let (x, y) = finite_pairs(x, y)?;
    validation::validate_min_len(x.len(), 3)?;
    let m = moments(&x, &y);
    if m.sxx == 0.0 {
        return Err(StatsError::ZeroVariance("slope"));
    }

    let slope = m.sxy / m.sxx;
    let intercept = m.mean_y - slope * m.mean_x;
    let r = if m.syy == 0.0 {
        0.0
    } else {
        (m.sxy / (m.sxx * m.syy).sqrt()).clamp(-1.0, 1.0)
    };
    let df = m.n - 2.0;
    let std_err = ((1.0 - r * r).max(0.0) * m.syy / m.sxx / df).sqrt();

    Ok(LinearFit {
        slope,
        intercept,
        r,
        p_value: correlation_p_value(r, m.n),
        std_err,
        n: x.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_average_ties() {
        let ranks = rank_average(&[10.0, 20.0, 10.0, 30.0]);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
    }

    #[test]
    fn test_tie_term() {
        // One pair (2^3 - 2) and one triple (3^3 - 3)
        assert_eq!(tie_term(&[1.0, 1.0, 2.0, 3.0, 3.0, 3.0]), 30.0);
        assert_eq!(tie_term(&[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_pearson_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let c = pearson(&x, &y).unwrap();
        assert!((c.r - 1.0).abs() < 1e-12);
        assert_eq!(c.p_value, 0.0);
    }

    #[test]
    fn test_pearson_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        let c = pearson(&x, &y).unwrap();
        assert!((c.r - 0.8).abs() < 1e-12);
        // t = 0.8 * sqrt(3 / 0.36) = 2.3094, df = 3
        assert!((c.p_value - 0.104_088).abs() < 1e-5);
    }

    #[test]
    fn test_spearman_monotonic() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 8.0, 27.0, 64.0, 125.0];
        let c = spearman(&x, &y).unwrap();
        assert!((c.r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linregress() {
        let x = [0.0, 1.0, 2.0, 3.0, f64::NAN];
        let y = [1.0, 3.0, 5.0, 7.0, 100.0];
        let fit = linregress(&x, &y).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert_eq!(fit.n, 4);
        assert!(fit.std_err.abs() < 1e-12);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_linregress_errors() {
        assert!(matches!(
            linregress(&[1.0, 2.0], &[1.0, 2.0]),
            Err(StatsError::InsufficientData { .. })
        ));
        assert_eq!(
            linregress(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]),
            Err(StatsError::ZeroVariance("slope"))
        );
        assert!(matches!(
            pearson(&[1.0], &[1.0, 2.0]),
            Err(StatsError::LengthMismatch { .. })
        ));
    }
}

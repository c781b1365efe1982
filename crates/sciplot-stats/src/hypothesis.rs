//! Hypothesis tests used to annotate figures
//!
//! All tests drop non-finite values first and report asymptotic p-values:
//! t distribution for the t-tests, normal approximation (with tie
//! correction) for the rank tests, Kolmogorov distribution for KS.

use serde::{Deserialize, Serialize};

use crate::correlation::{rank_average, tie_term};
use crate::ecdf::Ecdf;
use crate::error::{validation, StatsError, StatsResult};
use crate::special::{kolmogorov_sf, normal_cdf, normal_sf, student_t_cdf, student_t_sf};

/// Direction of the alternative hypothesis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    #[default]
    TwoSided,
    Less,
    Greater,
}

/// Test statistic and p-value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
}

fn finite(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|x| x.is_finite()).collect()
}

fn mean_and_sample_var(data: &[f64]) -> (f64, f64) {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var)
}

fn t_p_value(t: f64, df: f64, alternative: Alternative) -> f64 {
    match alternative {
        Alternative::TwoSided => (2.0 * student_t_sf(t.abs(), df)).min(1.0),
        Alternative::Greater => student_t_sf(t, df),
        Alternative::Less => student_t_cdf(t, df),
    }
}

/// One-sample t-test of the mean against `popmean`
pub fn ttest_1samp(
    data: &[f64],
    popmean: f64,
    alternative: Alternative,
) -> StatsResult<TestResult> {
    let data = finite(data);
    validation::validate_min_len(data.len(), 2)?;

    let n = data.len() as f64;
    let (mean, var) = mean_and_sample_var(&data);
    if var == 0.0 {
        return Err(StatsError::ZeroVariance("t statistic"));
    }
    let t = (mean - popmean) / (var / n).sqrt();

    Ok(TestResult {
        statistic: t,
        p_value: t_p_value(t, n - 1.0, alternative),
    })
}

/// Two independent samples t-test
///
/// `equal_var` selects the pooled-variance test; otherwise Welch's test.
pub fn ttest_ind(
    a: &[f64],
    b: &[f64],
    equal_var: bool,
    alternative: Alternative,
) -> StatsResult<TestResult> {
    let a = finite(a);
    let b = finite(b);
    validation::validate_min_len(a.len(), 2)?;
    validation::validate_min_len(b.len(), 2)?;

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (m1, v1) = mean_and_sample_var(&a);
    let (m2, v2) = mean_and_sample_var(&b);

    let (se, df) = if equal_var {
        let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / (n1 + n2 - 2.0);
        ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), n1 + n2 - 2.0)
    } else {
        let (q1, q2) = (v1 / n1, v2 / n2);
        let df = (q1 + q2).powi(2) / (q1 * q1 / (n1 - 1.0) + q2 * q2 / (n2 - 1.0));
        ((q1 + q2).sqrt(), df)
    };
    if se == 0.0 {
        return Err(StatsError::ZeroVariance("t statistic"));
    }
    let t = (m1 - m2) / se;

    Ok(TestResult {
        statistic: t,
        p_value: t_p_value(t, df, alternative),
    })
}

/// Mann-Whitney U test (Wilcoxon rank-sum)
///
/// The statistic is U of the first sample. P-values use the normal
/// approximation with tie and continuity correction.
pub fn mann_whitney_u(a: &[f64], b: &[f64], alternative: Alternative) -> StatsResult<TestResult> {
    let a = finite(a);
    let b = finite(b);
    validation::validate_min_len(a.len(), 1)?;
    validation::validate_min_len(b.len(), 1)?;

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let combined: Vec<f64> = a.iter().chain(&b).copied().collect();
    let ranks = rank_average(&combined);
    let rank_sum_a: f64 = ranks[..a.len()].iter().sum();

    let u1 = rank_sum_a - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;

    let n = n1 + n2;
    let mu = n1 * n2 / 2.0;
    let sigma = (n1 * n2 / 12.0 * ((n + 1.0) - tie_term(&combined) / (n * (n - 1.0)))).sqrt();
    if !(sigma > 0.0) {
        return Err(StatsError::ZeroVariance("rank-sum statistic"));
    }

    let upper_tail = |u: f64| normal_sf((u - mu - 0.5) / sigma);
    let p_value = match alternative {
        Alternative::TwoSided => 2.0 * upper_tail(u1.max(u2)),
        Alternative::Greater => upper_tail(u1),
        Alternative::Less => upper_tail(u2),
    };

    Ok(TestResult {
        statistic: u1,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

/// Wilcoxon signed-rank test of a sample against zero
///
/// Zero differences are discarded. The two-sided statistic is
/// `min(W+, W-)`; one-sided tests report `W+`.
pub fn wilcoxon(data: &[f64], alternative: Alternative) -> StatsResult<TestResult> {
    let diffs: Vec<f64> = finite(data).into_iter().filter(|&d| d != 0.0).collect();
    validation::validate_min_len(diffs.len(), 1)?;

    let magnitudes: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let ranks = rank_average(&magnitudes);
    let w_plus: f64 = diffs
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();

    let n = diffs.len() as f64;
    let total = n * (n + 1.0) / 2.0;
    let w_minus = total - w_plus;
    let mean = total / 2.0;
    let var = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - tie_term(&magnitudes) / 48.0;
    if !(var > 0.0) {
        return Err(StatsError::ZeroVariance("signed-rank statistic"));
    }
    let sd = var.sqrt();

    let (statistic, p_value) = match alternative {
        Alternative::TwoSided => {
            let t = w_plus.min(w_minus);
            (t, 2.0 * normal_cdf((t - mean) / sd))
        }
        Alternative::Greater => (w_plus, normal_sf((w_plus - mean) / sd)),
        Alternative::Less => (w_plus, normal_cdf((w_plus - mean) / sd)),
    };

    Ok(TestResult {
        statistic,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

/// Two-sample Kolmogorov-Smirnov test, two-sided
pub fn ks_2samp(a: &[f64], b: &[f64]) -> StatsResult<TestResult> {
    let ecdf_a = Ecdf::from_data(a);
    let ecdf_b = Ecdf::from_data(b);
    validation::validate_min_len(ecdf_a.len(), 1)?;
    validation::validate_min_len(ecdf_b.len(), 1)?;

    let d = ecdf_a
        .values()
        .iter()
        .chain(ecdf_b.values())
        .map(|&v| (ecdf_a.evaluate(v) - ecdf_b.evaluate(v)).abs())
        .fold(0.0, f64::max);

    let (n1, n2) = (ecdf_a.len() as f64, ecdf_b.len() as f64);
    let en = (n1 * n2 / (n1 + n2)).sqrt();
    let p_value = kolmogorov_sf((en + 0.12 + 0.11 / en) * d);

    Ok(TestResult {
        statistic: d,
        p_value,
    })
}

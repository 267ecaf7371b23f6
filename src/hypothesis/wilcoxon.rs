//! Wilcoxon signed-rank test.

use crate::core::TestResult;
use crate::error::{QuantletError, Result};
use crate::utils::distributions::normal_cdf;
use std::cmp::Ordering;
use tracing::warn;

/// Largest sample for which the exact null distribution is used automatically.
pub const EXACT_MAX_N: usize = 50;

/// How the p-value of the signed-rank statistic is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WilcoxonMethod {
    /// Exact for small samples without ties, normal approximation otherwise.
    #[default]
    Auto,
    /// Exact null distribution; requires untied ranks.
    Exact,
    /// Normal approximation with tie correction.
    Approx,
}

/// Average ranks (1-based) of `values`, plus the sizes of all tie groups.
pub fn average_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut ties = Vec::new();
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        let rank = (i + j + 1) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = rank;
        }
        if j - i > 1 {
            ties.push(j - i);
        }
        i = j;
    }
    (ranks, ties)
}

/// Two-sided Wilcoxon signed-rank test of `differences` against zero.
///
/// Zero differences are discarded. The statistic is the smaller of the
/// positive and negative rank sums.
pub fn wilcoxon(differences: &[f64]) -> Result<TestResult> {
    wilcoxon_with(differences, WilcoxonMethod::Auto)
}

/// Signed-rank test with an explicit p-value method.
pub fn wilcoxon_with(differences: &[f64], method: WilcoxonMethod) -> Result<TestResult> {
    if differences.is_empty() {
        return Err(QuantletError::EmptyData);
    }
    if differences.iter().any(|d| !d.is_finite()) {
        return Err(QuantletError::NonFinite);
    }
    let d: Vec<f64> = differences.iter().copied().filter(|&v| v != 0.0).collect();
    if d.is_empty() {
        return Err(QuantletError::ConstantData);
    }
    let n = d.len();

    let abs: Vec<f64> = d.iter().map(|v| v.abs()).collect();
    let (ranks, ties) = average_ranks(&abs);
    let r_plus: f64 = d
        .iter()
        .zip(&ranks)
        .filter(|(v, _)| **v > 0.0)
        .map(|(_, r)| r)
        .sum();
    let total = (n * (n + 1)) as f64 / 2.0;
    let statistic = r_plus.min(total - r_plus);

    let exact = match method {
        WilcoxonMethod::Auto => n <= EXACT_MAX_N && ties.is_empty(),
        WilcoxonMethod::Exact => {
            if !ties.is_empty() {
                return Err(QuantletError::InvalidParameter(
                    "exact signed-rank distribution requires untied data".to_string(),
                ));
            }
            true
        }
        WilcoxonMethod::Approx => false,
    };

    let p_value = if exact {
        (2.0 * exact_cdf(n, statistic as usize)).min(1.0)
    } else {
        if n < 10 {
            warn!(n, "sample size too small for the normal approximation");
        }
        let nf = n as f64;
        let tie_term: f64 = ties
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * (t * t - 1.0)
            })
            .sum();
        let variance = (nf * (nf + 1.0) * (2.0 * nf + 1.0) - 0.5 * tie_term) / 24.0;
        let z = (statistic - nf * (nf + 1.0) / 4.0) / variance.sqrt();
        2.0 * normal_cdf(-z.abs())
    };

    Ok(TestResult::new(statistic, p_value))
}

/// `P(T <= t)` for the signed-rank statistic of `n` untied observations.
fn exact_cdf(n: usize, t: usize) -> f64 {
    let max = n * (n + 1) / 2;
    let mut counts = vec![0.0f64; max + 1];
    counts[0] = 1.0;
    for k in 1..=n {
        for s in (k..=max).rev() {
            counts[s] += counts[s - k];
        }
    }
    let total = 2f64.powi(n as i32);
    counts[..=t.min(max)].iter().sum::<f64>() / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ranks_average_ties() {
        let (ranks, ties) = average_ranks(&[10.0, 20.0, 10.0, 30.0]);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
        assert_eq!(ties, vec![2]);
    }

    #[test]
    fn exact_distribution_small_n() {
        // n = 3: rank sums 0,1,2,3,3,4,5,6 over 8 sign patterns
        assert_relative_eq!(exact_cdf(3, 0), 1.0 / 8.0);
        assert_relative_eq!(exact_cdf(3, 3), 5.0 / 8.0);
        assert_relative_eq!(exact_cdf(3, 6), 1.0);
    }

    #[test]
    fn altman_differences_use_normal_approximation() {
        let data = [
            5260.0, 5470.0, 5640.0, 6180.0, 6390.0, 6515.0, 6805.0, 7515.0, 7515.0, 8230.0,
            8770.0,
        ];
        let diffs: Vec<f64> = data.iter().map(|x| x - 7725.0).collect();
        let result = wilcoxon(&diffs).unwrap();
        assert_relative_eq!(result.statistic, 8.0);
        assert_relative_eq!(result.p_value, 0.026157182329284708, epsilon = 1e-9);
    }

    #[test]
    fn exact_two_sided_p_value() {
        // All positive: T = 0, p = 2 / 2^6
        let diffs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let result = wilcoxon(&diffs).unwrap();
        assert_relative_eq!(result.statistic, 0.0);
        assert_relative_eq!(result.p_value, 2.0 / 64.0, epsilon = 1e-12);
    }

    #[test]
    fn zeros_are_discarded() {
        let with_zeros = wilcoxon(&[0.0, 1.0, -2.0, 3.0, 0.0, 4.0]).unwrap();
        let without = wilcoxon(&[1.0, -2.0, 3.0, 4.0]).unwrap();
        assert_eq!(with_zeros, without);
    }

    #[test]
    fn exact_method_rejects_ties() {
        assert!(wilcoxon_with(&[1.0, 1.0, 2.0], WilcoxonMethod::Exact).is_err());
        assert!(wilcoxon_with(&[1.0, 1.0, 2.0], WilcoxonMethod::Approx).is_ok());
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(wilcoxon(&[]), Err(QuantletError::EmptyData));
        assert_eq!(wilcoxon(&[0.0, 0.0]), Err(QuantletError::ConstantData));
        assert_eq!(wilcoxon(&[1.0, f64::NAN]), Err(QuantletError::NonFinite));
    }
}

//! One-sample Kolmogorov-Smirnov test against the standard normal.

use crate::core::TestResult;
use crate::error::{ensure_len, QuantletError, Result};
use crate::utils::distributions::{kolmogorov_sf, normal_cdf};
use crate::utils::stats::{mean, sorted, std_dev};

/// Two-sided KS distance between the empirical CDF of `sorted_values` and `cdf`.
pub fn ks_distance<F>(sorted_values: &[f64], cdf: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = sorted_values.len() as f64;
    sorted_values
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let p = cdf(x);
            let d_plus = (i + 1) as f64 / n - p;
            let d_minus = p - i as f64 / n;
            d_plus.max(d_minus)
        })
        .fold(0.0, f64::max)
}

/// Kolmogorov-Smirnov test of `values` against N(0, 1), exact two-sided p-value.
pub fn ks_test_standard_normal(values: &[f64]) -> Result<TestResult> {
    ensure_len(values, 1)?;
    let x = sorted(values);
    let d = ks_distance(&x, normal_cdf);
    Ok(TestResult::new(d, kolmogorov_sf(x.len(), d)))
}

/// Kolmogorov-Smirnov test of normality.
///
/// The data are standardized with their own mean and sample standard
/// deviation before being compared with the standard normal, so the p-value
/// is conservative (see [`lilliefors`](super::lilliefors) for the corrected
/// version).
pub fn kolmogorov_smirnov(values: &[f64]) -> Result<TestResult> {
    ensure_len(values, 2)?;
    let sd = std_dev(values);
    if sd <= 0.0 {
        return Err(QuantletError::ConstantData);
    }
    let m = mean(values);
    let z: Vec<f64> = values.iter().map(|v| (v - m) / sd).collect();
    ks_test_standard_normal(&z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::SeededNormal;
    use approx::assert_relative_eq;

    #[test]
    fn distance_of_single_point_at_median() {
        let d = ks_distance(&[0.0], normal_cdf);
        assert_relative_eq!(d, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn distance_against_uniform() {
        let x = [0.1, 0.4, 0.7];
        let d = ks_distance(&x, |v| v.clamp(0.0, 1.0));
        // max(1/3 - 0.1, 2/3 - 0.4, 1 - 0.7, 0.1, 0.4 - 1/3, 0.7 - 2/3)
        assert_relative_eq!(d, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn reference_sample() {
        let data = SeededNormal::new(12345).normals(0.0, 3.0, 100);
        let result = kolmogorov_smirnov(&data).unwrap();
        assert_relative_eq!(result.statistic, 0.07811087234360131, epsilon = 1e-9);
        assert_relative_eq!(result.p_value, 0.5487898613955835, epsilon = 1e-6);
    }

    #[test]
    fn shifted_data_is_rejected_without_standardization() {
        let data: Vec<f64> = SeededNormal::new(3)
            .standard_normals(200)
            .into_iter()
            .map(|v| v + 2.0)
            .collect();
        let result = ks_test_standard_normal(&data).unwrap();
        assert!(result.p_value < 1e-10);
    }

    #[test]
    fn constant_data_is_rejected() {
        assert_eq!(
            kolmogorov_smirnov(&[1.0, 1.0, 1.0]),
            Err(QuantletError::ConstantData)
        );
    }
}

//! Residual diagnostic tests for fitted time series models.
//!
//! Tests that residuals look like Gaussian white noise with constant variance.

use super::autocorrelation::autocovariance;
use crate::utils::distributions::{chi2_sf, f_sf};
use crate::utils::stats::{kurtosis, skewness};

/// Portmanteau (Ljung-Box or Box-Pierce) test result.
#[derive(Debug, Clone)]
pub struct PortmanteauResult {
    /// Test statistic Q
    pub statistic: f64,
    /// P-value from the chi-squared distribution
    pub p_value: f64,
    /// Number of lags tested
    pub lags: usize,
    /// Degrees of freedom
    pub df: usize,
}

impl PortmanteauResult {
    /// Returns true if we fail to reject the null (residuals are white noise).
    pub fn is_white_noise(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }

    fn undefined() -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags: 0,
            df: 0,
        }
    }
}

fn finite(residuals: &[f64]) -> Vec<f64> {
    residuals.iter().copied().filter(|v| v.is_finite()).collect()
}

fn default_lags(n: usize) -> usize {
    10.min(n / 5).max(1)
}

/// Shared Q computation: `weight(n, k)` scales the squared autocorrelation at lag `k`.
fn portmanteau<W>(
    residuals: &[f64],
    lags: Option<usize>,
    fitted_params: usize,
    weight: W,
) -> PortmanteauResult
where
    W: Fn(usize, usize) -> f64,
{
    let x = finite(residuals);
    let n = x.len();
    if n < 3 {
        return PortmanteauResult::undefined();
    }
    let lags = lags.unwrap_or_else(|| default_lags(n)).clamp(1, n - 1);
    let df = lags.saturating_sub(fitted_params).max(1);

    let acov = autocovariance(&x, lags, false);
    if acov[0] <= 0.0 {
        return PortmanteauResult {
            statistic: 0.0,
            p_value: 1.0,
            lags,
            df,
        };
    }
    let q: f64 = (1..=lags)
        .map(|k| {
            let r = acov[k] / acov[0];
            r * r * weight(n, k)
        })
        .sum();

    PortmanteauResult {
        statistic: q,
        p_value: chi2_sf(q, df as f64).unwrap_or(f64::NAN),
        lags,
        df,
    }
}

/// Ljung-Box test for autocorrelation in residuals.
///
/// `Q = n (n + 2) Σ r_k² / (n - k)`. `lags` defaults to `min(10, n/5)`;
/// `fitted_params` reduces the degrees of freedom. Non-finite residuals are
/// dropped first.
pub fn ljung_box(
    residuals: &[f64],
    lags: Option<usize>,
    fitted_params: usize,
) -> PortmanteauResult {
    portmanteau(residuals, lags, fitted_params, |n, k| {
        n as f64 * (n + 2) as f64 / (n - k) as f64
    })
}

/// Box-Pierce test, `Q = n Σ r_k²`.
pub fn box_pierce(residuals: &[f64], lags: Option<usize>) -> PortmanteauResult {
    portmanteau(residuals, lags, 0, |n, _| n as f64)
}

/// Durbin-Watson statistic: 0 for strong positive, 2 for no, 4 for strong
/// negative first-order autocorrelation. NaN for fewer than two values.
pub fn durbin_watson(residuals: &[f64]) -> f64 {
    let x = finite(residuals);
    if x.len() < 2 {
        return f64::NAN;
    }
    let sum_sq: f64 = x.iter().map(|r| r * r).sum();
    if sum_sq == 0.0 {
        return 2.0;
    }
    x.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum::<f64>() / sum_sq
}

/// Jarque-Bera normality test of residuals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JarqueBeraResult {
    pub statistic: f64,
    pub p_value: f64,
    /// Sample skewness.
    pub skew: f64,
    /// Sample kurtosis (3 for a normal distribution).
    pub kurtosis: f64,
}

/// Jarque-Bera test, `JB = n/6 (S² + (K - 3)² / 4)` against χ²(2).
pub fn jarque_bera(residuals: &[f64]) -> JarqueBeraResult {
    let x = finite(residuals);
    let n = x.len() as f64;
    let skew = skewness(&x);
    let kurt = kurtosis(&x);
    let statistic = n / 6.0 * (skew * skew + (kurt - 3.0).powi(2) / 4.0);
    let p_value = if statistic.is_finite() {
        chi2_sf(statistic, 2.0).unwrap_or(f64::NAN)
    } else {
        f64::NAN
    };
    JarqueBeraResult {
        statistic,
        p_value,
        skew,
        kurtosis: kurt,
    }
}

/// Heteroskedasticity test result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeteroskedasticityResult {
    /// Ratio of the sums of squares of the last and first thirds.
    pub statistic: f64,
    /// Two-sided p-value from F(h, h).
    pub p_value: f64,
    /// Observations in each third.
    pub h: usize,
}

/// Break-in-variance test: compares the sum of squared residuals in the last
/// third of the sample with that of the first third.
pub fn heteroskedasticity(residuals: &[f64]) -> HeteroskedasticityResult {
    let x = finite(residuals);
    let h = (x.len() as f64 / 3.0).round() as usize;
    if h == 0 {
        return HeteroskedasticityResult {
            statistic: f64::NAN,
            p_value: f64::NAN,
            h,
        };
    }
    let first: f64 = x[..h].iter().map(|r| r * r).sum();
    let last: f64 = x[x.len() - h..].iter().map(|r| r * r).sum();
    let statistic = last / first;
    let p_value = if statistic.is_finite() {
        let df = h as f64;
        let upper = f_sf(statistic, df, df).unwrap_or(f64::NAN);
        (2.0 * upper.min(1.0 - upper)).clamp(0.0, 1.0)
    } else {
        f64::NAN
    };
    HeteroskedasticityResult {
        statistic,
        p_value,
        h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::SeededNormal;
    use approx::assert_relative_eq;

    fn noise(n: usize) -> Vec<f64> {
        SeededNormal::new(2024).standard_normals(n)
    }

    // ==================== ljung_box ====================

    #[test]
    fn ljung_box_white_noise() {
        let result = ljung_box(&noise(200), Some(10), 0);
        assert!(result.statistic >= 0.0);
        assert!(result.is_white_noise(0.01));
        assert_eq!(result.lags, 10);
        assert_eq!(result.df, 10);
    }

    #[test]
    fn ljung_box_autocorrelated() {
        let e = noise(200);
        let mut x = vec![0.0; 200];
        for i in 1..200 {
            x[i] = 0.9 * x[i - 1] + e[i];
        }
        let result = ljung_box(&x, Some(10), 0);
        assert!(result.p_value < 1e-6);
        assert!(!result.is_white_noise(0.05));
    }

    #[test]
    fn ljung_box_single_lag_by_hand() {
        // r1 = 0.25 for [1, 2, 3, 4]; Q = 4 * 6 * 0.0625 / 3
        let result = ljung_box(&[1.0, 2.0, 3.0, 4.0], Some(1), 0);
        assert_relative_eq!(result.statistic, 0.5, epsilon = 1e-12);
        assert_relative_eq!(result.p_value, 0.4795001221869535, epsilon = 1e-9);
    }

    #[test]
    fn ljung_box_constant_and_short() {
        let result = ljung_box(&[1.0; 50], Some(5), 0);
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
        assert!(ljung_box(&[1.0, 2.0], Some(5), 0).statistic.is_nan());
        assert!(ljung_box(&[], None, 0).statistic.is_nan());
    }

    #[test]
    fn ljung_box_with_fitted_params() {
        let x = noise(100);
        assert_eq!(ljung_box(&x, Some(10), 2).df, 8);
        assert_eq!(ljung_box(&x, Some(2), 5).df, 1);
    }

    #[test]
    fn ljung_box_ignores_nan_edges() {
        let mut x = noise(120);
        let clean = ljung_box(&x, Some(5), 0);
        x.insert(0, f64::NAN);
        x.push(f64::NAN);
        let padded = ljung_box(&x, Some(5), 0);
        assert_relative_eq!(clean.statistic, padded.statistic, epsilon = 1e-12);
    }

    // ==================== box_pierce ====================

    #[test]
    fn box_pierce_is_smaller_than_ljung_box() {
        let x = noise(100);
        let bp = box_pierce(&x, Some(10));
        let lb = ljung_box(&x, Some(10), 0);
        assert!(bp.statistic > 0.0);
        assert!(lb.statistic > bp.statistic);
        assert!((0.0..=1.0).contains(&bp.p_value));
    }

    // ==================== durbin_watson ====================

    #[test]
    fn durbin_watson_extremes() {
        let alternating: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!(durbin_watson(&alternating) > 3.5);

        let mut smooth = vec![1.0; 100];
        for i in 1..100 {
            smooth[i] = 0.95 * smooth[i - 1];
        }
        assert!(durbin_watson(&smooth) < 0.5);

        let dw = durbin_watson(&noise(500));
        assert!((dw - 2.0).abs() < 0.3);
    }

    #[test]
    fn durbin_watson_degenerate() {
        assert!(durbin_watson(&[1.0]).is_nan());
        assert_eq!(durbin_watson(&[0.0; 50]), 2.0);
    }

    // ==================== jarque_bera ====================

    #[test]
    fn jarque_bera_normal_noise() {
        let result = jarque_bera(&noise(1000));
        assert!(result.p_value > 0.01);
        assert!(result.skew.abs() < 0.2);
        assert!((result.kurtosis - 3.0).abs() < 0.4);
    }

    #[test]
    fn jarque_bera_skewed() {
        let x: Vec<f64> = noise(500).iter().map(|v| v.exp()).collect();
        let result = jarque_bera(&x);
        assert!(result.p_value < 1e-10);
        assert!(result.skew > 1.0);
    }

    // ==================== heteroskedasticity ====================

    #[test]
    fn heteroskedasticity_by_hand() {
        let x = [1.0, 1.0, 0.0, 0.0, 2.0, 2.0];
        let result = heteroskedasticity(&x);
        assert_eq!(result.h, 2);
        assert_relative_eq!(result.statistic, 4.0, epsilon = 1e-12);
        // F(2, 2): sf(4) = 1 / 5
        assert_relative_eq!(result.p_value, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn heteroskedasticity_growing_variance() {
        let x: Vec<f64> = noise(300)
            .iter()
            .enumerate()
            .map(|(i, v)| v * (1.0 + i as f64 / 30.0))
            .collect();
        let result = heteroskedasticity(&x);
        assert!(result.statistic > 4.0);
        assert!(result.p_value < 1e-6);
    }
}

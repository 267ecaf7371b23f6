//! D'Agostino-Pearson omnibus test combining skewness and kurtosis.

use crate::core::TestResult;
use crate::error::{ensure_len, QuantletError, Result};
use crate::utils::distributions::{chi2_sf, normal_sf};
use crate::utils::stats::{central_moment, kurtosis, skewness};
use tracing::warn;

/// Test whether the skewness differs from that of a normal distribution.
///
/// Returns the normal z-score of the transformed sample skewness and its
/// two-sided p-value. Requires at least 8 observations.
pub fn skew_test(values: &[f64]) -> Result<TestResult> {
    ensure_len(values, 8)?;
    check_spread(values)?;
    let n = values.len() as f64;
    let b2 = skewness(values);

    let y = b2 * ((n + 1.0) * (n + 3.0) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    let z = delta * (y / alpha).asinh();

    Ok(TestResult::new(z, 2.0 * normal_sf(z.abs())))
}

/// Test whether the kurtosis differs from that of a normal distribution
/// (Anscombe-Glynn transformation).
///
/// Requires at least 5 observations; below 20 the approximation is poor.
pub fn kurtosis_test(values: &[f64]) -> Result<TestResult> {
    ensure_len(values, 5)?;
    check_spread(values)?;
    let n = values.len() as f64;
    if values.len() < 20 {
        warn!(
            n = values.len(),
            "kurtosis test is only valid for n >= 20; continuing anyway"
        );
    }
    let b2 = kurtosis(values);

    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let var_b2 = 24.0 * n * (n - 2.0) * (n - 3.0)
        / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (b2 - expected) / var_b2.sqrt();
    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * (6.0 * (n + 3.0) * (n + 5.0) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());
    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    if denom == 0.0 {
        return Err(QuantletError::ComputationError(
            "kurtosis transformation is undefined".to_string(),
        ));
    }
    let term2 = denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt();
    let z = (term1 - term2) / (2.0 / (9.0 * a)).sqrt();

    Ok(TestResult::new(z, 2.0 * normal_sf(z.abs())))
}

/// D'Agostino and Pearson's omnibus test of normality.
///
/// The statistic `K² = z_skew² + z_kurt²` is chi-squared with two degrees of
/// freedom under the null hypothesis.
///
/// # Example
/// ```
/// use stat_quantlets::normality::omnibus;
/// use stat_quantlets::utils::random::SeededNormal;
///
/// let data = SeededNormal::new(1).normals(0.0, 1.0, 200);
/// let result = omnibus(&data).unwrap();
/// assert!(result.p_value > 0.0 && result.p_value <= 1.0);
/// ```
pub fn omnibus(values: &[f64]) -> Result<TestResult> {
    let s = skew_test(values)?;
    let k = kurtosis_test(values)?;
    let k2 = s.statistic * s.statistic + k.statistic * k.statistic;
    Ok(TestResult::new(k2, chi2_sf(k2, 2.0)?))
}

fn check_spread(values: &[f64]) -> Result<()> {
    if central_moment(values, 2) <= 0.0 {
        return Err(QuantletError::ConstantData);
    }
    Ok(())
}

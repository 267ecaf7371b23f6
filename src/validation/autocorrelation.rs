//! Sample autocorrelation and partial autocorrelation functions.

use crate::error::{ensure_len, QuantletError, Result};
use crate::utils::distributions::normal_ppf;
use crate::utils::stats::mean;

/// Default number of lags, `min(10·log10(n), n - 1)`.
pub fn default_nlags(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    ((10.0 * (n as f64).log10()) as usize).min(n - 1)
}

/// Autocovariances at lags `0..=nlags`, divided by `n` or, when
/// `adjusted`, by `n - k`.
pub fn autocovariance(values: &[f64], nlags: usize, adjusted: bool) -> Vec<f64> {
    let n = values.len();
    let m = mean(values);
    let centered: Vec<f64> = values.iter().map(|v| v - m).collect();
    (0..=nlags.min(n.saturating_sub(1)))
        .map(|k| {
            let sum: f64 = centered[k..].iter().zip(&centered).map(|(a, b)| a * b).sum();
            let denom = if adjusted { n - k } else { n };
            sum / denom as f64
        })
        .collect()
}

/// Autocorrelations with optional confidence bands.
#[derive(Debug, Clone)]
pub struct CorrelogramResult {
    /// Values at lags `0..=nlags`.
    pub values: Vec<f64>,
    /// Confidence interval per lag, centered on the estimate.
    pub confint: Option<Vec<(f64, f64)>>,
}

impl CorrelogramResult {
    pub fn nlags(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    /// Lags (excluding 0) whose estimate lies outside the band around zero.
    pub fn significant_lags(&self) -> Vec<usize> {
        let Some(ci) = &self.confint else {
            return Vec::new();
        };
        self.values
            .iter()
            .zip(ci)
            .enumerate()
            .skip(1)
            .filter(|(_, (v, (lo, _)))| {
                let half_width = *v - lo;
                v.abs() > half_width
            })
            .map(|(k, _)| k)
            .collect()
    }
}

fn z_value(alpha: f64) -> Result<f64> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(QuantletError::InvalidParameter(format!(
            "alpha must be in (0, 1), got {}",
            alpha
        )));
    }
    Ok(normal_ppf(1.0 - alpha / 2.0))
}

fn check_variance(acov0: f64) -> Result<()> {
    if acov0 <= 0.0 {
        return Err(QuantletError::ConstantData);
    }
    Ok(())
}

/// Autocorrelation function.
///
/// `alpha` adds Bartlett confidence intervals: the variance at lag `k` is
/// `(1 + 2 Σ_{j<k} r_j²) / n`.
///
/// # Example
/// ```
/// use stat_quantlets::validation::acf;
///
/// let x: Vec<f64> = (0..50).map(|i| (i as f64 * 0.7).sin()).collect();
/// let result = acf(&x, Some(5), Some(0.05)).unwrap();
/// assert_eq!(result.values[0], 1.0);
/// assert_eq!(result.values.len(), 6);
/// ```
pub fn acf(values: &[f64], nlags: Option<usize>, alpha: Option<f64>) -> Result<CorrelogramResult> {
    ensure_len(values, 2)?;
    let n = values.len();
    let nlags = nlags.unwrap_or_else(|| default_nlags(n)).min(n - 1);
    let acov = autocovariance(values, nlags, false);
    check_variance(acov[0])?;
    let r: Vec<f64> = acov.iter().map(|c| c / acov[0]).collect();

    let confint = match alpha {
        None => None,
        Some(alpha) => {
            let z = z_value(alpha)?;
            let mut cumulative = 0.0;
            let ci = r
                .iter()
                .enumerate()
                .map(|(k, &rk)| {
                    let var = match k {
                        0 => 0.0,
                        1 => 1.0 / n as f64,
                        _ => {
                            cumulative += r[k - 1] * r[k - 1];
                            (1.0 + 2.0 * cumulative) / n as f64
                        }
                    };
                    let half = z * var.sqrt();
                    (rk - half, rk + half)
                })
                .collect();
            Some(ci)
        }
    };

    Ok(CorrelogramResult { values: r, confint })
}

/// Estimator behind the partial autocorrelations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacfMethod {
    /// Yule-Walker with autocovariances divided by `n - k`.
    #[default]
    YuleWalkerAdjusted,
    /// Yule-Walker with autocovariances divided by `n`.
    YuleWalkerMle,
}

/// Levinson-Durbin recursion on autocovariances `acov[0..=p]`.
///
/// Returns the order-`p` autoregressive coefficients, the partial
/// autocorrelations (element 0 is 1) and the innovation variance.
fn levinson(acov: &[f64]) -> (Vec<f64>, Vec<f64>, f64) {
    let p = acov.len().saturating_sub(1);
    let mut pacf = vec![1.0; p + 1];
    let mut phi = vec![0.0; p + 1];
    if p == 0 || acov[0] == 0.0 {
        return (Vec::new(), pacf, acov.first().copied().unwrap_or(0.0));
    }
    let mut prev = vec![0.0; p + 1];
    let mut v = acov[0];
    for k in 1..=p {
        let acc: f64 = (1..k).map(|j| prev[j] * acov[k - j]).sum();
        let kappa = (acov[k] - acc) / v;
        phi[k] = kappa;
        for j in 1..k {
            phi[j] = prev[j] - kappa * prev[k - j];
        }
        v *= 1.0 - kappa * kappa;
        pacf[k] = kappa;
        prev[..=k].copy_from_slice(&phi[..=k]);
    }
    (phi[1..].to_vec(), pacf, v)
}

/// Partial autocorrelations from autocovariances `acov[0..=p]` by the
/// Levinson-Durbin recursion. Element 0 is 1.
pub fn levinson_durbin(acov: &[f64]) -> Vec<f64> {
    levinson(acov).1
}

/// Yule-Walker estimate of AR(`order`) coefficients and innovation variance.
///
/// With biased autocovariances (`adjusted = false`) the estimate is always
/// stationary.
pub fn yule_walker(values: &[f64], order: usize, adjusted: bool) -> Result<(Vec<f64>, f64)> {
    ensure_len(values, order + 1)?;
    let acov = autocovariance(values, order, adjusted);
    check_variance(acov[0])?;
    let (phi, _, sigma2) = levinson(&acov);
    Ok((phi, sigma2))
}

/// Partial autocorrelation function.
///
/// The number of lags is limited to `n/2 - 1`. `alpha` adds the interval
/// `± z / √n`.
pub fn pacf(
    values: &[f64],
    nlags: Option<usize>,
    method: PacfMethod,
    alpha: Option<f64>,
) -> Result<CorrelogramResult> {
    ensure_len(values, 4)?;
    let n = values.len();
    let max_lags = n / 2 - 1;
    let nlags = nlags.unwrap_or_else(|| default_nlags(n)).min(max_lags);
    let acov = autocovariance(values, nlags, method == PacfMethod::YuleWalkerAdjusted);
    check_variance(acov[0])?;
    let values = levinson_durbin(&acov);

    let confint = match alpha {
        None => None,
        Some(alpha) => {
            let half = z_value(alpha)? / (n as f64).sqrt();
            Some(
                values
                    .iter()
                    .enumerate()
                    .map(|(k, &v)| if k == 0 { (1.0, 1.0) } else { (v - half, v + half) })
                    .collect(),
            )
        }
    };

    Ok(CorrelogramResult { values, confint })
}

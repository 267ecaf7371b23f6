//! Classical seasonal decomposition by moving averages.
//!
//! The series is split into
//! - Trend: centered moving average over one period
//! - Seasonal: mean detrended value at each position of the cycle
//! - Residual: what remains after removing both

use crate::error::{ensure_len, QuantletError, Result};
use crate::utils::linalg::fit_line;
use crate::utils::stats::variance;
use tracing::debug;

/// How the components combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecomposeModel {
    /// `x = trend + seasonal + resid`
    #[default]
    Additive,
    /// `x = trend * seasonal * resid`
    Multiplicative,
}

/// Treatment of the trend at the edges, where the moving average is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtrapolateTrend {
    /// Leave the edges undefined (NaN).
    Off,
    /// Extrapolate with a line through the nearest `period - 1` trend values.
    #[default]
    Freq,
    /// Extrapolate with a line through the nearest `k` trend values.
    Points(usize),
}

/// Decomposition settings.
#[derive(Debug, Clone)]
pub struct DecomposeConfig {
    /// Length of one seasonal cycle.
    pub period: usize,
    pub model: DecomposeModel,
    pub extrapolate_trend: ExtrapolateTrend,
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            period: 12,
            model: DecomposeModel::Additive,
            extrapolate_trend: ExtrapolateTrend::Freq,
        }
    }
}

impl DecomposeConfig {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: DecomposeModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_extrapolate_trend(mut self, extrapolate_trend: ExtrapolateTrend) -> Self {
        self.extrapolate_trend = extrapolate_trend;
        self
    }
}

/// Result of a seasonal decomposition. All components have the input length.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub observed: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub resid: Vec<f64>,
    pub period: usize,
    pub model: DecomposeModel,
}

impl Decomposition {
    /// Residuals with the undefined edge values removed.
    pub fn defined_resid(&self) -> Vec<f64> {
        self.resid.iter().copied().filter(|v| v.is_finite()).collect()
    }

    /// Strength of seasonality in [0, 1] (additive components).
    pub fn seasonal_strength(&self) -> f64 {
        strength(&self.seasonal, &self.resid)
    }

    /// Strength of trend in [0, 1] (additive components).
    pub fn trend_strength(&self) -> f64 {
        strength(&self.trend, &self.resid)
    }
}

fn strength(component: &[f64], resid: &[f64]) -> f64 {
    let (combined, remainder): (Vec<f64>, Vec<f64>) = component
        .iter()
        .zip(resid)
        .filter(|(c, r)| c.is_finite() && r.is_finite())
        .map(|(c, r)| (c + r, *r))
        .unzip();
    let var_combined = variance(&combined);
    if var_combined.is_nan() || var_combined < 1e-10 {
        return 0.0;
    }
    (1.0 - variance(&remainder) / var_combined).max(0.0)
}

/// Moving-average weights for one period: `[0.5, 1, …, 1, 0.5] / period` when
/// the period is even, `1 / period` repeated when it is odd.
fn trend_filter(period: usize) -> Vec<f64> {
    let p = period as f64;
    if period % 2 == 0 {
        let mut w = vec![1.0 / p; period + 1];
        w[0] = 0.5 / p;
        w[period] = 0.5 / p;
        w
    } else {
        vec![1.0 / p; period]
    }
}

/// Centered convolution; positions without a full window are NaN.
fn centered_moving_average(x: &[f64], weights: &[f64]) -> Vec<f64> {
    let n = x.len();
    let half = weights.len() / 2;
    let mut out = vec![f64::NAN; n];
    if weights.len() > n {
        return out;
    }
    for t in half..(n + half + 1 - weights.len()) {
        out[t] = weights
            .iter()
            .enumerate()
            .map(|(k, w)| w * x[t + k - half])
            .sum();
    }
    out
}

/// Replace the undefined ends of `trend` with least-squares lines through
/// the `npoints` nearest defined values.
fn extrapolate_trend(trend: &mut [f64], npoints: usize) {
    let Some(front) = trend.iter().position(|v| v.is_finite()) else {
        return;
    };
    let Some(back) = trend.iter().rposition(|v| v.is_finite()) else {
        return;
    };

    let line = |from: usize, to: usize, trend: &[f64]| {
        let xs: Vec<f64> = (from..to).map(|i| i as f64).collect();
        fit_line(&xs, &trend[from..to])
    };

    let front_last = (front + npoints).min(back);
    if let Some((slope, intercept)) = line(front, front_last, trend) {
        for (i, v) in trend.iter_mut().enumerate().take(front) {
            *v = slope * i as f64 + intercept;
        }
    }

    let back_first = back.saturating_sub(npoints).max(front);
    if let Some((slope, intercept)) = line(back_first, back, trend) {
        for (i, v) in trend.iter_mut().enumerate().skip(back + 1) {
            *v = slope * i as f64 + intercept;
        }
    }
}

/// Decompose `values` into trend, seasonal and residual components.
///
/// Requires at least two full cycles. The seasonal pattern is anchored at the
/// first observation.
///
/// # Example
/// ```
/// use stat_quantlets::seasonality::{seasonal_decompose, DecomposeConfig, ExtrapolateTrend};
///
/// let x: Vec<f64> = (0..48)
///     .map(|i| 0.5 * i as f64 + [3.0, -1.0, -2.0, 0.0][i % 4])
///     .collect();
/// let config = DecomposeConfig::new(4).with_extrapolate_trend(ExtrapolateTrend::Off);
/// let result = seasonal_decompose(&x, &config).unwrap();
/// assert!(result.resid[0].is_nan());
/// assert!((result.seasonal[0] - 3.0).abs() < 1e-9);
/// ```
pub fn seasonal_decompose(values: &[f64], config: &DecomposeConfig) -> Result<Decomposition> {
    let period = config.period;
    if period < 2 {
        return Err(QuantletError::InvalidParameter(format!(
            "period must be at least 2, got {}",
            period
        )));
    }
    ensure_len(values, 2 * period)?;
    if config.model == DecomposeModel::Multiplicative && values.iter().any(|&v| v <= 0.0) {
        return Err(QuantletError::InvalidParameter(
            "multiplicative decomposition requires strictly positive values".to_string(),
        ));
    }

    let n = values.len();
    let mut trend = centered_moving_average(values, &trend_filter(period));
    let npoints = match config.extrapolate_trend {
        ExtrapolateTrend::Off => 0,
        ExtrapolateTrend::Freq => period - 1,
        ExtrapolateTrend::Points(k) => k,
    };
    if npoints > 0 {
        extrapolate_trend(&mut trend, npoints);
    }

    let detrended: Vec<f64> = values
        .iter()
        .zip(&trend)
        .map(|(x, t)| match config.model {
            DecomposeModel::Additive => x - t,
            DecomposeModel::Multiplicative => x / t,
        })
        .collect();

    let mut averages: Vec<f64> = (0..period)
        .map(|i| {
            let cycle: Vec<f64> = detrended
                .iter()
                .skip(i)
                .step_by(period)
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            cycle.iter().sum::<f64>() / cycle.len() as f64
        })
        .collect();
    let overall = averages.iter().sum::<f64>() / period as f64;
    for a in averages.iter_mut() {
        match config.model {
            DecomposeModel::Additive => *a -= overall,
            DecomposeModel::Multiplicative => *a /= overall,
        }
    }

    let seasonal: Vec<f64> = (0..n).map(|i| averages[i % period]).collect();
    let resid: Vec<f64> = values
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((x, t), s)| match config.model {
            DecomposeModel::Additive => x - t - s,
            DecomposeModel::Multiplicative => x / s / t,
        })
        .collect();

    debug!(
        n,
        period,
        undefined = resid.iter().filter(|v| v.is_nan()).count(),
        "seasonal decomposition"
    );

    Ok(Decomposition {
        observed: values.to_vec(),
        trend,
        seasonal,
        resid,
        period,
        model: config.model,
    })
}

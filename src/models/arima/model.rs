//! ARIMA (Autoregressive Integrated Moving Average) model.
//!
//! The ARMA part of the differenced series is estimated by conditional sum of
//! squares: the first `p` observations are conditioned on and pre-sample
//! innovations are zero. Standard errors come from the numerical Hessian of
//! the Gaussian conditional negative log-likelihood.

use std::f64::consts::PI;

use tracing::{debug, warn};

use crate::error::{QuantletError, Result};
use crate::models::arima::diff::{difference, differencing_polynomial, integrate};
use crate::models::arima::process::{roots_outside_unit_circle, ArmaProcess};
use crate::models::arima::summary::{ArimaSummary, ParamEstimate};
use crate::utils::distributions::{normal_ppf, normal_sf};
use crate::utils::linalg::invert_symmetric;
use crate::utils::optimization::{nelder_mead, numerical_hessian, NelderMeadConfig};
use crate::utils::stats::mean;
use crate::validation::autocorrelation::yule_walker;

/// ARIMA model specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ARIMASpec {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ARIMASpec {
    /// Create a new ARIMA specification.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl Default for ARIMASpec {
    fn default() -> Self {
        Self::new(1, 0, 1)
    }
}

impl std::fmt::Display for ARIMASpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({}, {}, {})", self.p, self.d, self.q)
    }
}

/// Deterministic trend of the differenced series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trend {
    /// Estimate a constant mean.
    #[default]
    Constant,
    /// Zero mean.
    None,
}

/// Point forecasts with a symmetric prediction interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ArimaForecast {
    pub point: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Coverage of the interval, e.g. 0.95.
    pub level: f64,
}

/// ARIMA model.
///
/// ARIMA(p, d, q) combines:
/// - AR(p): Autoregressive component
/// - I(d): Differencing for stationarity
/// - MA(q): Moving average component
#[derive(Debug, Clone)]
pub struct ARIMA {
    spec: ARIMASpec,
    trend: Trend,
    label: String,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    /// Mean of the differenced series (zero without a trend).
    intercept: f64,
    sigma2: Option<f64>,
    /// Standard errors of the estimated parameters followed by sigma2.
    std_errors: Option<Vec<f64>>,
    original: Option<Vec<f64>>,
    differenced: Option<Vec<f64>>,
    /// Innovations on the differenced scale; pre-sample entries are zero.
    innovations: Option<Vec<f64>>,
    fitted_diff: Option<Vec<f64>>,
    llf: Option<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
    hqic: Option<f64>,
}

impl ARIMA {
    /// Create a new ARIMA model with a constant.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            spec: ARIMASpec::new(p, d, q),
            trend: Trend::Constant,
            label: "y".to_string(),
            ar_coefficients: vec![],
            ma_coefficients: vec![],
            intercept: 0.0,
            sigma2: None,
            std_errors: None,
            original: None,
            differenced: None,
            innovations: None,
            fitted_diff: None,
            llf: None,
            aic: None,
            bic: None,
            hqic: None,
        }
    }

    /// Set the trend.
    pub fn with_trend(mut self, trend: Trend) -> Self {
        self.trend = trend;
        self
    }

    /// Name of the modelled variable, shown in the summary.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn spec(&self) -> ARIMASpec {
        self.spec
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Innovation variance.
    pub fn sigma2(&self) -> Option<f64> {
        self.sigma2
    }

    /// Conditional log-likelihood.
    pub fn llf(&self) -> Option<f64> {
        self.llf
    }

    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    pub fn hqic(&self) -> Option<f64> {
        self.hqic
    }

    pub fn is_fitted(&self) -> bool {
        self.sigma2.is_some()
    }

    /// Number of observations entering the likelihood.
    pub fn nobs(&self) -> usize {
        self.differenced
            .as_ref()
            .map_or(0, |w| w.len().saturating_sub(self.spec.p))
    }

    /// Residuals of the fit, excluding the conditioned-on observations.
    pub fn residuals(&self) -> Option<&[f64]> {
        self.innovations.as_deref().map(|e| &e[self.spec.p..])
    }

    /// One-step-ahead fitted values on the differenced scale, NaN where
    /// conditioned on.
    pub fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted_diff.as_deref()
    }

    /// Parameter names in estimation order, with `sigma2` last.
    pub fn param_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.trend == Trend::Constant {
            names.push("const".to_string());
        }
        names.extend((1..=self.spec.p).map(|i| format!("ar.L{}", i)));
        names.extend((1..=self.spec.q).map(|i| format!("ma.L{}", i)));
        names.push("sigma2".to_string());
        names
    }

    /// Estimated parameters in the order of [`ARIMA::param_names`].
    pub fn params(&self) -> Result<Vec<f64>> {
        let sigma2 = self.sigma2.ok_or(QuantletError::FitRequired)?;
        let mut params = self.arma_params();
        params.push(sigma2);
        Ok(params)
    }

    /// Standard errors in the order of [`ARIMA::param_names`]; NaN when the
    /// Hessian is not positive definite.
    pub fn std_errors(&self) -> Result<&[f64]> {
        self.std_errors.as_deref().ok_or(QuantletError::FitRequired)
    }

    /// Coefficient table with z statistics, p-values and 95% intervals.
    pub fn param_estimates(&self) -> Result<Vec<ParamEstimate>> {
        let params = self.params()?;
        let std_errors = self.std_errors()?;
        let z_crit = normal_ppf(0.975);
        Ok(self
            .param_names()
            .into_iter()
            .zip(params.iter().zip(std_errors))
            .map(|(name, (&coef, &std_err))| {
                let z = coef / std_err;
                ParamEstimate {
                    name,
                    coef,
                    std_err,
                    z,
                    p_value: 2.0 * normal_sf(z.abs()),
                    ci_lower: coef - z_crit * std_err,
                    ci_upper: coef + z_crit * std_err,
                }
            })
            .collect())
    }

    /// Fit the model to `values`.
    pub fn fit(&mut self, values: &[f64]) -> Result<()> {
        if values.is_empty() {
            return Err(QuantletError::EmptyData);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(QuantletError::NonFinite);
        }
        let ARIMASpec { p, d, q } = self.spec;
        let min_len = d + p.max(q) + 2;
        if values.len() < min_len {
            return Err(QuantletError::InsufficientData {
                needed: min_len,
                got: values.len(),
            });
        }

        let w = difference(values, d);
        let has_const = self.trend == Trend::Constant;
        let initial = self.initial_params(&w)?;

        let objective = |params: &[f64]| {
            let (mu, ar, ma) = split_params(params, has_const, p);
            if !roots_outside_unit_circle(ar) {
                return f64::INFINITY;
            }
            let neg_ma: Vec<f64> = ma.iter().map(|c| -c).collect();
            if !roots_outside_unit_circle(&neg_ma) {
                return f64::INFINITY;
            }
            css(&w, mu, ar, ma).0
        };
        let config = NelderMeadConfig::default().with_max_iter(5000);
        let first = nelder_mead(objective, &initial, None, config.clone());
        let result = nelder_mead(objective, &first.optimal_point, None, config);
        if !result.converged {
            warn!(order = %self.spec, "CSS optimization did not converge");
        }
        if !result.optimal_value.is_finite() {
            return Err(QuantletError::ComputationError(format!(
                "no stationary and invertible {} fit found",
                self.spec
            )));
        }

        let estimate = result.optimal_point;
        let (mu, ar, ma) = split_params(&estimate, has_const, p);
        let (sum_sq, innovations) = css(&w, mu, ar, ma);
        let n_eff = (w.len() - p) as f64;
        let sigma2 = sum_sq / n_eff;
        if sigma2.is_nan() || sigma2 <= 0.0 {
            return Err(QuantletError::ConstantData);
        }

        self.intercept = mu;
        self.ar_coefficients = ar.to_vec();
        self.ma_coefficients = ma.to_vec();
        self.fitted_diff = Some(
            w.iter()
                .zip(&innovations)
                .enumerate()
                .map(|(t, (x, e))| if t < p { f64::NAN } else { x - e })
                .collect(),
        );

        let llf = -0.5 * n_eff * ((2.0 * PI * sigma2).ln() + 1.0);
        let k = (estimate.len() + 1) as f64;
        self.llf = Some(llf);
        self.aic = Some(-2.0 * llf + 2.0 * k);
        self.bic = Some(-2.0 * llf + k * n_eff.ln());
        self.hqic = Some(-2.0 * llf + 2.0 * k * n_eff.ln().ln());
        self.sigma2 = Some(sigma2);
        self.std_errors = Some(standard_errors(&w, &estimate, sigma2, has_const, p));

        debug!(
            order = %self.spec,
            intercept = mu,
            ar = ?self.ar_coefficients,
            ma = ?self.ma_coefficients,
            sigma2,
            llf,
            "fitted ARIMA"
        );

        self.original = Some(values.to_vec());
        self.differenced = Some(w);
        self.innovations = Some(innovations);
        Ok(())
    }

    /// Forecast `horizon` steps ahead on the scale of the fitted series.
    pub fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let original = self.original.as_ref().ok_or(QuantletError::FitRequired)?;
        let diff_series = self
            .differenced
            .as_ref()
            .ok_or(QuantletError::FitRequired)?;
        let innovations = self
            .innovations
            .as_ref()
            .ok_or(QuantletError::FitRequired)?;

        if horizon == 0 {
            return Ok(Vec::new());
        }

        let mut extended = diff_series.clone();
        let mut errors = innovations.clone();
        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = self.intercept;
            for (i, phi) in self.ar_coefficients.iter().enumerate() {
                if t > i {
                    pred += phi * (extended[t - 1 - i] - self.intercept);
                }
            }
            for (j, theta) in self.ma_coefficients.iter().enumerate() {
                if t > j {
                    pred += theta * errors[t - 1 - j];
                }
            }
            extended.push(pred);
            errors.push(0.0);
        }

        let forecast_diff = extended[diff_series.len()..].to_vec();
        Ok(integrate(&forecast_diff, original, self.spec.d))
    }

    /// Forecast with prediction intervals from the MA(∞) weights of the
    /// integrated process.
    pub fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<ArimaForecast> {
        if level.is_nan() || level <= 0.0 || level >= 1.0 {
            return Err(QuantletError::InvalidParameter(format!(
                "interval level must be in (0, 1), got {}",
                level
            )));
        }
        let point = self.predict(horizon)?;
        let sigma2 = self.sigma2.ok_or(QuantletError::FitRequired)?;

        let arma = ArmaProcess::from_coeffs(&self.ar_coefficients, &self.ma_coefficients);
        let integrated_ar = poly_mul(arma.ar(), &differencing_polynomial(self.spec.d));
        let psi = ArmaProcess::new(integrated_ar, arma.ma().to_vec())?.impulse_response(horizon);

        let z = normal_ppf(0.5 + level / 2.0);
        let mut cumulative = 0.0;
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (value, weight) in point.iter().zip(&psi) {
            cumulative += weight * weight;
            let half_width = z * (sigma2 * cumulative).sqrt();
            lower.push(value - half_width);
            upper.push(value + half_width);
        }
        Ok(ArimaForecast {
            point,
            lower,
            upper,
            level,
        })
    }

    /// Text summary with coefficient table and residual diagnostics.
    pub fn summary(&self) -> Result<ArimaSummary> {
        ArimaSummary::from_model(self)
    }

    fn arma_params(&self) -> Vec<f64> {
        let mut params = Vec::new();
        if self.trend == Trend::Constant {
            params.push(self.intercept);
        }
        params.extend_from_slice(&self.ar_coefficients);
        params.extend_from_slice(&self.ma_coefficients);
        params
    }

    /// Starting point: sample mean, Yule-Walker AR terms, small MA terms.
    fn initial_params(&self, w: &[f64]) -> Result<Vec<f64>> {
        let ARIMASpec { p, q, .. } = self.spec;
        let mut initial = Vec::with_capacity(p + q + 1);
        if self.trend == Trend::Constant {
            initial.push(mean(w));
        }
        if p > 0 {
            match yule_walker(w, p, false) {
                Ok((phi, _)) => initial.extend(phi),
                Err(QuantletError::ConstantData) => return Err(QuantletError::ConstantData),
                Err(_) => initial.extend(vec![0.0; p]),
            }
        }
        initial.extend((0..q).map(|j| 0.1 / (j + 1) as f64));
        Ok(initial)
    }
}

impl Default for ARIMA {
    fn default() -> Self {
        let spec = ARIMASpec::default();
        Self::new(spec.p, spec.d, spec.q)
    }
}

fn split_params(params: &[f64], has_const: bool, p: usize) -> (f64, &[f64], &[f64]) {
    let (mu, rest) = if has_const {
        (params[0], &params[1..])
    } else {
        (0.0, params)
    };
    let (ar, ma) = rest.split_at(p);
    (mu, ar, ma)
}

/// Conditional sum of squares and the innovations it is built from.
fn css(w: &[f64], mu: f64, ar: &[f64], ma: &[f64]) -> (f64, Vec<f64>) {
    let p = ar.len();
    let mut errors = vec![0.0; w.len()];
    let mut sum_sq = 0.0;
    for t in p..w.len() {
        let mut pred = mu;
        for (i, phi) in ar.iter().enumerate() {
            pred += phi * (w[t - 1 - i] - mu);
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                pred += theta * errors[t - 1 - j];
            }
        }
        let e = w[t] - pred;
        errors[t] = e;
        sum_sq += e * e;
    }
    (sum_sq, errors)
}

fn standard_errors(w: &[f64], estimate: &[f64], sigma2: f64, has_const: bool, p: usize) -> Vec<f64> {
    let n_eff = (w.len() - p) as f64;
    let nll = |theta: &[f64]| {
        let (params, s2) = theta.split_at(theta.len() - 1);
        let s2 = s2[0];
        if s2 <= 0.0 {
            return f64::INFINITY;
        }
        let (mu, ar, ma) = split_params(params, has_const, p);
        0.5 * n_eff * (2.0 * PI * s2).ln() + css(w, mu, ar, ma).0 / (2.0 * s2)
    };
    let mut point = estimate.to_vec();
    point.push(sigma2);
    let hessian = numerical_hessian(nll, &point);
    match invert_symmetric(&hessian) {
        Some(cov) => (0..point.len())
            .map(|i| {
                let v = cov[i][i];
                if v > 0.0 {
                    v.sqrt()
                } else {
                    f64::NAN
                }
            })
            .collect(),
        None => {
            warn!("Hessian is not positive definite; standard errors unavailable");
            vec![f64::NAN; point.len()]
        }
    }
}

fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

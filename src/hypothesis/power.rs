//! Power analysis arithmetic of a one-sample t-test report.

use crate::core::Sample;
use crate::error::{ensure_len, QuantletError, Result};
use crate::utils::distributions::{noncentral_t_cdf, noncentral_t_sf, t_isf, t_ppf, t_sf};
use std::fmt;
use tracing::debug;

/// Seeded sample and test settings shared by the power and comparison demos.
#[derive(Debug, Clone)]
pub struct PowerConfig {
    /// Number of generated observations.
    pub n: usize,
    /// Mean of the generating distribution.
    pub mean: f64,
    /// Standard deviation of the generating distribution.
    pub sd: f64,
    /// Seed of the random number generator.
    pub seed: u32,
    /// Hypothesized mean.
    pub check_value: f64,
    /// Significance level.
    pub alpha: f64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            n: 100,
            mean: 7.0,
            sd: 3.0,
            seed: 12345,
            check_value: 6.5,
            alpha: 0.05,
        }
    }
}

impl PowerConfig {
    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_distribution(mut self, mean: f64, sd: f64) -> Self {
        self.mean = mean;
        self.sd = sd;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_check_value(mut self, check_value: f64) -> Self {
        self.check_value = check_value;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// The seeded sample described by this configuration.
    pub fn sample(&self) -> Sample {
        Sample::normal(self.n, self.mean, self.sd, self.seed)
    }
}

/// Quantities of a one-sample t-test report, including its power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerReport {
    /// Degrees of freedom.
    pub dof: usize,
    /// t statistic.
    pub t_val: f64,
    /// Cohen's d effect size.
    pub d: f64,
    /// Two-sided p-value.
    pub p_val: f64,
    /// Confidence interval of the mean at level `1 - alpha`.
    pub ci: (f64, f64),
    /// Achieved power of the two-sided test.
    pub power: f64,
}

impl fmt::Display for PowerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{'ci': [{:.8}, {:.8}],", self.ci.0, self.ci.1)?;
        writeln!(f, " 'd': {},", self.d)?;
        writeln!(f, " 'dof': {},", self.dof)?;
        writeln!(f, " 'p_val': {},", self.p_val)?;
        writeln!(f, " 'power': {},", self.power)?;
        writeln!(f, " 't_val': {}}}", self.t_val)
    }
}

/// Compute the t-test report quantities for `values` against `c`.
///
/// The power uses the non-central t distribution with the observed
/// non-centrality `(mean - c) / sem`.
pub fn power_analysis(values: &[f64], c: f64, alpha: f64) -> Result<PowerReport> {
    ensure_len(values, 2)?;
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(QuantletError::InvalidParameter(format!(
            "alpha must be in (0, 1), got {}",
            alpha
        )));
    }
    let sample = Sample::new(values.to_vec());
    let mean = sample.mean();
    let sd = sample.std_dev();
    let sem = sample.sem();
    if sd <= 0.0 {
        return Err(QuantletError::ConstantData);
    }
    let dof = values.len() - 1;
    let df = dof as f64;

    let t_val = (mean - c) / sem;
    let d = (mean - c) / sd;
    let p_val = (2.0 * t_sf(t_val.abs(), df)?).min(1.0);
    let ci = (
        t_ppf(alpha / 2.0, df, mean, sem)?,
        t_ppf(1.0 - alpha / 2.0, df, mean, sem)?,
    );

    let tc = t_isf(alpha / 2.0, df)?;
    let power = noncentral_t_sf(tc, df, t_val)? + noncentral_t_cdf(-tc, df, t_val)?;
    debug!(tc, power, "power of two-sided t-test");

    Ok(PowerReport {
        dof,
        t_val,
        d,
        p_val,
        ci,
        power,
    })
}

/// Reproduce the power-analysis arithmetic for the configured seeded sample.
pub fn explain_power(config: &PowerConfig) -> Result<PowerReport> {
    let sample = config.sample();
    power_analysis(sample.values(), config.check_value, config.alpha)
}

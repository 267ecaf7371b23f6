//! Text summary of a fitted ARIMA model.

use std::fmt;

use crate::error::{QuantletError, Result};
use crate::models::arima::model::ARIMA;
use crate::validation::residual_tests::{
    heteroskedasticity, jarque_bera, ljung_box, HeteroskedasticityResult, JarqueBeraResult,
    PortmanteauResult,
};

const WIDTH: usize = 78;

/// One row of the coefficient table.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamEstimate {
    pub name: String,
    pub coef: f64,
    pub std_err: f64,
    pub z: f64,
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Fit statistics, coefficients and residual diagnostics of one model.
#[derive(Debug, Clone)]
pub struct ArimaSummary {
    pub label: String,
    pub order: String,
    pub nobs: usize,
    pub llf: f64,
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
    pub params: Vec<ParamEstimate>,
    /// Ljung-Box test at lag 1.
    pub ljung_box: PortmanteauResult,
    pub jarque_bera: JarqueBeraResult,
    pub heteroskedasticity: HeteroskedasticityResult,
}

impl ArimaSummary {
    pub fn from_model(model: &ARIMA) -> Result<Self> {
        let residuals = model.residuals().ok_or(QuantletError::FitRequired)?;
        let missing = || QuantletError::FitRequired;
        Ok(Self {
            label: model.label().to_string(),
            order: model.spec().to_string(),
            nobs: model.nobs(),
            llf: model.llf().ok_or_else(missing)?,
            aic: model.aic().ok_or_else(missing)?,
            bic: model.bic().ok_or_else(missing)?,
            hqic: model.hqic().ok_or_else(missing)?,
            params: model.param_estimates()?,
            ljung_box: ljung_box(residuals, Some(1), 0),
            jarque_bera: jarque_bera(residuals),
            heteroskedasticity: heteroskedasticity(residuals),
        })
    }

    /// Look up a parameter row by name.
    pub fn param(&self, name: &str) -> Option<&ParamEstimate> {
        self.params.iter().find(|p| p.name == name)
    }
}

fn pair(f: &mut fmt::Formatter<'_>, left: (&str, String), right: (&str, String)) -> fmt::Result {
    writeln!(
        f,
        "{:<24}{:>15}   {:<22}{:>14}",
        left.0, left.1, right.0, right.1
    )
}

impl fmt::Display for ArimaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(WIDTH);
        writeln!(f, "{:^width$}", "ARIMA Results", width = WIDTH)?;
        writeln!(f, "{}", heavy)?;
        pair(
            f,
            ("Dep. Variable:", self.label.clone()),
            ("No. Observations:", self.nobs.to_string()),
        )?;
        pair(
            f,
            ("Model:", self.order.clone()),
            ("Log Likelihood", format!("{:.3}", self.llf)),
        )?;
        pair(f, ("Method:", "css".to_string()), ("AIC", format!("{:.3}", self.aic)))?;
        pair(f, ("", String::new()), ("BIC", format!("{:.3}", self.bic)))?;
        pair(f, ("", String::new()), ("HQIC", format!("{:.3}", self.hqic)))?;
        writeln!(f, "{}", heavy)?;
        writeln!(
            f,
            "{:<10}{:>11}{:>11}{:>11}{:>11}{:>12}{:>12}",
            "", "coef", "std err", "z", "P>|z|", "[0.025", "0.975]"
        )?;
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        for p in &self.params {
            writeln!(
                f,
                "{:<10}{:>11.4}{:>11.3}{:>11.3}{:>11.3}{:>12.3}{:>12.3}",
                p.name, p.coef, p.std_err, p.z, p.p_value, p.ci_lower, p.ci_upper
            )?;
        }
        writeln!(f, "{}", heavy)?;
        pair(
            f,
            ("Ljung-Box (L1) (Q):", format!("{:.2}", self.ljung_box.statistic)),
            ("Jarque-Bera (JB):", format!("{:.2}", self.jarque_bera.statistic)),
        )?;
        pair(
            f,
            ("Prob(Q):", format!("{:.2}", self.ljung_box.p_value)),
            ("Prob(JB):", format!("{:.2}", self.jarque_bera.p_value)),
        )?;
        pair(
            f,
            (
                "Heteroskedasticity (H):",
                format!("{:.2}", self.heteroskedasticity.statistic),
            ),
            ("Skew:", format!("{:.2}", self.jarque_bera.skew)),
        )?;
        pair(
            f,
            (
                "Prob(H) (two-sided):",
                format!("{:.2}", self.heteroskedasticity.p_value),
            ),
            ("Kurtosis:", format!("{:.2}", self.jarque_bera.kurtosis)),
        )?;
        writeln!(f, "{}", heavy)
    }
}

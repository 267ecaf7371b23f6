//! CO2 time-series pipeline: load, decompose, correlograms, ARIMA fits.
//!
//! Each stage writes its report to the given writer and returns the data
//! the next stage needs.

use std::io::Write;

use tracing::{debug, info, warn};

use crate::core::MissingValuePolicy;
use crate::data::{fetch_co2_table, Co2Config, Co2Table};
use crate::error::Result;
use crate::models::arima::{ARIMASpec, ArimaSummary, ArmaProcess, Trend, ARIMA};
use crate::output::{correlogram, sparkline};
use crate::seasonality::{seasonal_decompose, DecomposeConfig, Decomposition, ExtrapolateTrend};
use crate::utils::random::SeededNormal;
use crate::validation::{acf, pacf, PacfMethod};

/// Orders fitted to the decomposition residuals.
pub const RESIDUAL_ORDERS: [ARIMASpec; 2] = [
    ARIMASpec { p: 1, d: 0, q: 1 },
    ARIMASpec { p: 0, d: 0, q: 2 },
];

/// AR coefficients of the simulated ARMA(2, 2) process.
pub const ARMA_AR: [f64; 2] = [0.75, -0.25];
/// MA coefficients of the simulated ARMA(2, 2) process.
pub const ARMA_MA: [f64; 2] = [0.65, 0.35];

/// Settings shared by the pipeline stages.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub decompose: DecomposeConfig,
    /// Lags in the correlograms; `None` uses the default rule.
    pub nlags: Option<usize>,
    /// Significance level of the correlogram bands.
    pub alpha: f64,
    /// Handling of missing monthly means before decomposition.
    pub missing: MissingValuePolicy,
    /// Seed of the simulated series.
    pub seed: u32,
    /// Steps of the simulated AR(2) series.
    pub ar2_steps: usize,
    /// Length of the simulated ARMA(2, 2) sample.
    pub arma_samples: usize,
    /// Width of terminal charts.
    pub chart_width: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            decompose: DecomposeConfig::new(12).with_extrapolate_trend(ExtrapolateTrend::Freq),
            nlags: None,
            alpha: 0.05,
            missing: MissingValuePolicy::ForwardFill,
            seed: 12345,
            ar2_steps: 200,
            arma_samples: 250,
            chart_width: 60,
        }
    }
}

impl PipelineConfig {
    pub fn with_nlags(mut self, nlags: usize) -> Self {
        self.nlags = Some(nlags);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_missing(mut self, missing: MissingValuePolicy) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_chart_width(mut self, chart_width: usize) -> Self {
        self.chart_width = chart_width;
        self
    }
}

/// Fetch the CO2 table and print its first rows.
pub fn get_co2_data<W: Write>(config: &Co2Config, out: &mut W) -> Result<Co2Table> {
    let table = fetch_co2_table(config)?;
    show_co2_data(&table, 60, out)?;
    Ok(table)
}

/// Print the first rows of the table and a sketch of the `co2` column.
pub fn show_co2_data<W: Write>(table: &Co2Table, width: usize, out: &mut W) -> Result<()> {
    writeln!(out, "{}", table.head(5))?;
    if let (Some(first), Some(last)) = (table.records.first(), table.records.last()) {
        writeln!(out, "co2 {:.2} .. {:.2}", first.time, last.time)?;
    }
    writeln!(out, "{}", sparkline(&table.co2(), width))?;
    writeln!(out)?;
    Ok(())
}

/// Decompose the `co2` series additively and print the correlograms of the
/// residuals.
pub fn acf_and_pacf<W: Write>(
    table: &Co2Table,
    config: &PipelineConfig,
    out: &mut W,
) -> Result<Decomposition> {
    let series = table.to_series()?;
    if series.has_missing_values() {
        warn!(policy = ?config.missing, "CO2 series has missing monthly means");
    }
    let series = series.sanitized(config.missing)?;
    let decomposition = seasonal_decompose(series.values(), &config.decompose)?;
    debug!(
        n = decomposition.observed.len(),
        period = decomposition.period,
        "seasonal decomposition"
    );

    let width = config.chart_width;
    writeln!(out, "Seasonal decomposition (period {})", decomposition.period)?;
    for (name, component) in [
        ("observed", &decomposition.observed),
        ("trend", &decomposition.trend),
        ("seasonal", &decomposition.seasonal),
        ("resid", &decomposition.resid),
    ] {
        writeln!(out, "{:>9} {}", name, sparkline(component, width))?;
    }
    writeln!(out)?;

    let resid = decomposition.defined_resid();
    let acf_result = acf(&resid, config.nlags, Some(config.alpha))?;
    let pacf_result = pacf(
        &resid,
        config.nlags,
        PacfMethod::default(),
        Some(config.alpha),
    )?;
    writeln!(out, "{}", correlogram(&acf_result, "Autocorrelation", width))?;
    writeln!(
        out,
        "{}",
        correlogram(&pacf_result, "Partial Autocorrelation", width)
    )?;
    Ok(decomposition)
}

/// Simulate `x_t = x_{t-1} - 0.5 x_{t-2} + e_t` from `x = [0, 0]`.
pub fn simulate_ar2(steps: usize, rng: &mut SeededNormal) -> Vec<f64> {
    let mut x = vec![0.0, 0.0];
    for _ in 0..steps {
        let n = x.len();
        let next = x[n - 1] - 0.5 * x[n - 2] + rng.standard_normal();
        x.push(next);
    }
    x
}

fn fit_and_report<W: Write>(model: &mut ARIMA, values: &[f64], out: &mut W) -> Result<ArimaSummary> {
    model.fit(values)?;
    let summary = model.summary()?;
    info!(
        order = %model.spec(),
        aic = summary.aic,
        "fitted model"
    );
    writeln!(out, "{}", summary)?;
    Ok(summary)
}

/// Fit ARIMA models to the residuals and to two simulated processes.
///
/// Returns the summaries in fitting order: the [`RESIDUAL_ORDERS`] fits,
/// the AR(2) fit, then the ARMA(2, 2) fit without trend.
pub fn fit_arima_models<W: Write>(
    decomposition: &Decomposition,
    config: &PipelineConfig,
    out: &mut W,
) -> Result<Vec<ArimaSummary>> {
    let resid = decomposition.defined_resid();
    let mut summaries = Vec::with_capacity(RESIDUAL_ORDERS.len() + 2);

    for spec in RESIDUAL_ORDERS {
        let mut model = ARIMA::new(spec.p, spec.d, spec.q).with_label("resid");
        summaries.push(fit_and_report(&mut model, &resid, out)?);
    }

    writeln!(out, "Generate a clear ARIMA model, plot it")?;
    let mut rng = SeededNormal::new(config.seed);
    let x = simulate_ar2(config.ar2_steps, &mut rng);
    writeln!(out, "{}", sparkline(&x, config.chart_width))?;
    let x_acf = acf(&x, config.nlags, Some(config.alpha))?;
    writeln!(out, "{}", correlogram(&x_acf, "Autocorrelation", config.chart_width))?;
    let mut model = ARIMA::new(2, 0, 0);
    summaries.push(fit_and_report(&mut model, &x, out)?);

    writeln!(out, "And now a simulated ARMA(2, 2) process:")?;
    let process = ArmaProcess::from_coeffs(&ARMA_AR, &ARMA_MA);
    let mut rng = SeededNormal::new(config.seed);
    let y = process.generate_sample(config.arma_samples, 1.0, 0, &mut rng);
    let mut model = ARIMA::new(2, 0, 2).with_trend(Trend::None);
    summaries.push(fit_and_report(&mut model, &y, out)?);

    Ok(summaries)
}

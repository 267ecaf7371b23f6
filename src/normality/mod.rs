//! Tests of the null hypothesis "the sample is drawn from a normal distribution".
//!
//! Four independent tests are provided:
//! - [`omnibus`]: D'Agostino-Pearson K², combining skewness and kurtosis
//! - [`shapiro_wilk`]: Shapiro-Wilk W, best for small samples
//! - [`lilliefors`]: KS distance with estimated parameters
//! - [`kolmogorov_smirnov`]: classical KS test on standardized data
//!
//! [`check_normality`] runs all four on a seeded synthetic sample.

mod kolmogorov_smirnov;
mod lilliefors;
mod omnibus;
mod shapiro_wilk;

pub use kolmogorov_smirnov::{kolmogorov_smirnov, ks_distance, ks_test_standard_normal};
pub use lilliefors::lilliefors;
pub use omnibus::{kurtosis_test, omnibus, skew_test};
pub use shapiro_wilk::shapiro_wilk;

use crate::core::{PValueTable, Sample};
use crate::error::Result;
use std::fmt;
use tracing::{debug, info};

/// Display names of the tests, in report order.
pub const OMNIBUS: &str = "Omnibus";
pub const SHAPIRO_WILK: &str = "Shapiro-Wilk";
pub const LILLIEFORS: &str = "Lilliefors";
pub const KOLMOGOROV_SMIRNOV: &str = "Kolmogorov-Smirnov";

/// Run all four normality tests and collect the results by name.
pub fn normality_tests(values: &[f64]) -> Result<PValueTable> {
    let mut table = PValueTable::new();
    table.insert(OMNIBUS, omnibus(values)?);
    table.insert(SHAPIRO_WILK, shapiro_wilk(values)?);
    table.insert(LILLIEFORS, lilliefors(values)?);
    table.insert(KOLMOGOROV_SMIRNOV, kolmogorov_smirnov(values)?);
    Ok(table)
}

/// Configuration for the normality quantlet.
#[derive(Debug, Clone)]
pub struct NormalityConfig {
    /// Number of generated observations.
    pub n: usize,
    /// Mean of the generating distribution.
    pub mean: f64,
    /// Standard deviation of the generating distribution.
    pub sd: f64,
    /// Seed of the random number generator.
    pub seed: u32,
    /// Size of the leading subsample tested separately.
    pub few: usize,
    /// Significance level for the verdict on the full sample.
    pub alpha: f64,
}

impl Default for NormalityConfig {
    fn default() -> Self {
        Self {
            n: 1000,
            mean: 0.0,
            sd: 3.0,
            seed: 12345,
            few: 100,
            alpha: 0.05,
        }
    }
}

impl NormalityConfig {
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

    pub fn with_few(mut self, few: usize) -> Self {
        self.few = few;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Outcome of the normality quantlet.
#[derive(Debug, Clone)]
pub struct NormalityReport {
    /// The generated sample.
    pub sample: Sample,
    /// p-values on the full sample.
    pub all: PValueTable,
    /// p-values on the leading subsample.
    pub few: PValueTable,
    /// Size of the leading subsample.
    pub few_len: usize,
    /// Whether the omnibus p-value on the full sample exceeds alpha.
    pub is_normal: bool,
}

impl NormalityReport {
    /// Kolmogorov-Smirnov p-value of the full sample.
    pub fn ks_p_value(&self) -> f64 {
        self.all.p_value(KOLMOGOROV_SMIRNOV).unwrap_or(f64::NAN)
    }
}

impl fmt::Display for NormalityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "p-values for all {} data points: ----------------",
            self.sample.len()
        )?;
        write!(f, "{}", self.all)?;
        writeln!(
            f,
            "p-values for the first {} data points: ----------------",
            self.few_len
        )?;
        write!(f, "{}", self.few)?;
        if self.is_normal {
            writeln!(f, "Data are normally distributed")?;
        }
        Ok(())
    }
}

/// Generate a seeded normal sample and test it for normality, both in full
/// and on its first `few` values.
///
/// # Example
/// ```
/// use stat_quantlets::normality::{check_normality, NormalityConfig};
///
/// let report = check_normality(&NormalityConfig::default()).unwrap();
/// assert!(report.is_normal);
/// assert!(report.ks_p_value() > 0.05);
/// ```
pub fn check_normality(config: &NormalityConfig) -> Result<NormalityReport> {
    let sample = Sample::normal(config.n, config.mean, config.sd, config.seed);
    info!(
        n = config.n,
        mean = config.mean,
        sd = config.sd,
        seed = config.seed,
        "generated normal sample"
    );

    let all = normality_tests(sample.values())?;
    let head = sample.head(config.few);
    let few = normality_tests(head.values())?;

    let omnibus_p = all.p_value(OMNIBUS).unwrap_or(0.0);
    debug!(omnibus_p, "omnibus test on full sample");

    Ok(NormalityReport {
        is_normal: omnibus_p > config.alpha,
        few_len: head.len(),
        sample,
        all,
        few,
    })
}

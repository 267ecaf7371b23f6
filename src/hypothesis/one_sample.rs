//! One-sample mean tests and the one-group quantlet.

use super::wilcoxon::wilcoxon;
use crate::core::TestResult;
use crate::data::read_delimited;
use crate::error::{ensure_len, QuantletError, Result};
use crate::utils::distributions::{students_t, t_ppf};
use crate::utils::stats::{mean, sem, std_dev};
use statrs::distribution::ContinuousCDF;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

/// Sample size, mean, sample standard deviation and standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptives {
    pub n: usize,
    pub mean: f64,
    pub sd: f64,
    pub sem: f64,
}

/// Descriptive statistics of a sample (ddof = 1).
pub fn describe(values: &[f64]) -> Result<Descriptives> {
    ensure_len(values, 2)?;
    Ok(Descriptives {
        n: values.len(),
        mean: mean(values),
        sd: std_dev(values),
        sem: sem(values),
    })
}

/// Two-sided t confidence interval for the mean, `mean ± sem · t_{n-1}`.
///
/// `confidence = 0.95` uses the 0.975 quantile of the t distribution.
pub fn confidence_interval(values: &[f64], confidence: f64) -> Result<(f64, f64)> {
    if !(0.0..1.0).contains(&confidence) || confidence == 0.0 {
        return Err(QuantletError::InvalidParameter(format!(
            "confidence level must be in (0, 1), got {}",
            confidence
        )));
    }
    let d = describe(values)?;
    let q = t_ppf(1.0 - (1.0 - confidence) / 2.0, (d.n - 1) as f64, 0.0, 1.0)?;
    Ok((d.mean - d.sem * q, d.mean + d.sem * q))
}

/// Two-sided one-sample Student t-test of `H0: mean == popmean`.
///
/// # Example
/// ```
/// use stat_quantlets::hypothesis::t_test_1samp;
///
/// let result = t_test_1samp(&[5.1, 4.9, 5.3, 5.0, 4.8], 5.0).unwrap();
/// assert!(result.p_value > 0.5);
/// ```
pub fn t_test_1samp(values: &[f64], popmean: f64) -> Result<TestResult> {
    let d = describe(values)?;
    if d.sem <= 0.0 {
        return Err(QuantletError::ConstantData);
    }
    let t = (d.mean - popmean) / d.sem;
    let dist = students_t((d.n - 1) as f64, 0.0, 1.0)?;
    Ok(TestResult::new(t, 2.0 * dist.sf(t.abs())))
}

/// Configuration for the one-group quantlet.
#[derive(Debug, Clone)]
pub struct OneGroupConfig {
    /// Delimited text file with the observations.
    pub path: PathBuf,
    /// Reference value tested against the mean.
    pub check_value: f64,
    /// Confidence level of the interval.
    pub confidence: f64,
    /// Significance level.
    pub alpha: f64,
}

impl Default for OneGroupConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/altman_91.txt"),
            check_value: 7725.0,
            confidence: 0.95,
            alpha: 0.05,
        }
    }
}

impl OneGroupConfig {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_check_value(mut self, check_value: f64) -> Self {
        self.check_value = check_value;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Outcome of the one-group quantlet.
#[derive(Debug, Clone)]
pub struct OneGroupReport {
    pub descriptives: Descriptives,
    pub confidence_interval: (f64, f64),
    pub check_value: f64,
    pub alpha: f64,
    /// One-sample t-test against the reference value.
    pub t_test: TestResult,
    /// Signed-rank test of the differences to the reference value.
    pub wilcoxon: TestResult,
}

impl OneGroupReport {
    /// p-value of the t-test.
    pub fn p_value(&self) -> f64 {
        self.t_test.p_value
    }

    /// Whether the reference value is plausible according to the signed-rank test.
    pub fn is_likely(&self) -> bool {
        !self.wilcoxon.is_significant(self.alpha)
    }
}

impl fmt::Display for OneGroupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Mean and SD: {:4.2} and {:4.2}",
            self.descriptives.mean, self.descriptives.sd
        )?;
        writeln!(
            f,
            "The confidence intervals are {:4.2} to {:4.2}.",
            self.confidence_interval.0, self.confidence_interval.1
        )?;
        if self.t_test.is_significant(self.alpha) {
            writeln!(
                f,
                "{:4.2} is significantly different from the mean (p={:5.3}).",
                self.check_value, self.t_test.p_value
            )?;
        }
        writeln!(
            f,
            "It is {} that the value is {}",
            if self.is_likely() { "likely" } else { "unlikely" },
            self.check_value
        )
    }
}

/// Test the mean of `values` against the configured reference value.
pub fn analyze_one_group(values: &[f64], config: &OneGroupConfig) -> Result<OneGroupReport> {
    let descriptives = describe(values)?;
    let confidence_interval = confidence_interval(values, config.confidence)?;
    let t_test = t_test_1samp(values, config.check_value)?;
    let differences: Vec<f64> = values.iter().map(|v| v - config.check_value).collect();
    let wilcoxon = wilcoxon(&differences)?;
    debug!(
        t = t_test.statistic,
        p = t_test.p_value,
        signed_rank = wilcoxon.statistic,
        "one-group tests"
    );

    Ok(OneGroupReport {
        descriptives,
        confidence_interval,
        check_value: config.check_value,
        alpha: config.alpha,
        t_test,
        wilcoxon,
    })
}

/// Read the configured data file and test its mean against the reference value.
pub fn check_mean(config: &OneGroupConfig) -> Result<OneGroupReport> {
    let values = read_delimited(&config.path)?;
    info!(path = %config.path.display(), n = values.len(), "loaded one-group data");
    analyze_one_group(&values, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALTMAN: [f64; 11] = [
        5260.0, 5470.0, 5640.0, 6180.0, 6390.0, 6515.0, 6805.0, 7515.0, 7515.0, 8230.0, 8770.0,
    ];

    #[test]
    fn describes_altman_data() {
        let d = describe(&ALTMAN).unwrap();
        assert_eq!(d.n, 11);
        assert_relative_eq!(d.mean, 6753.636363636364, epsilon = 1e-9);
        assert_relative_eq!(d.sd, 1142.1232221373727, epsilon = 1e-8);
    }

    #[test]
    fn t_test_reference_value() {
        let result = t_test_1samp(&ALTMAN, 7725.0).unwrap();
        assert_relative_eq!(result.statistic, -2.8207540608310198, epsilon = 1e-10);
        assert_relative_eq!(result.p_value, 0.018137235176105802, epsilon = 1e-9);
    }

    #[test]
    fn confidence_interval_brackets_mean() {
        let (lo, hi) = confidence_interval(&ALTMAN, 0.95).unwrap();
        assert_relative_eq!(lo, 5986.347542663842, epsilon = 1e-4);
        assert_relative_eq!(hi, 7520.9251846088855, epsilon = 1e-4);
        let m = mean(&ALTMAN);
        assert!(lo < m && m < hi);
    }

    #[test]
    fn invalid_confidence_level() {
        assert!(confidence_interval(&ALTMAN, 1.0).is_err());
        assert!(confidence_interval(&ALTMAN, 0.0).is_err());
    }

    #[test]
    fn constant_sample_cannot_be_t_tested() {
        assert_eq!(
            t_test_1samp(&[3.0, 3.0, 3.0], 1.0),
            Err(QuantletError::ConstantData)
        );
    }

    #[test]
    fn report_lines() {
        let report = analyze_one_group(&ALTMAN, &OneGroupConfig::default()).unwrap();
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Mean and SD: 6753.64 and 1142.12");
        assert_eq!(lines[1], "The confidence intervals are 5986.35 to 7520.93.");
        assert_eq!(
            lines[2],
            "7725.00 is significantly different from the mean (p=0.018)."
        );
        assert_eq!(lines[3], "It is unlikely that the value is 7725");
        assert!(!report.is_likely());
    }

    #[test]
    fn plausible_reference_value() {
        let config = OneGroupConfig::default().with_check_value(6800.0);
        let report = analyze_one_group(&ALTMAN, &config).unwrap();
        assert!(report.is_likely());
        assert!(!report.to_string().contains("significantly different"));
    }
}

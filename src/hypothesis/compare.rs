//! Comparison of t-test and normal-distribution probabilities.

use super::one_sample::t_test_1samp;
use super::power::PowerConfig;
use crate::core::Sample;
use crate::error::Result;
use crate::utils::distributions::normal_cdf_with;
use std::fmt;

/// Two-sided probabilities of the same deviation under t and normal models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalComparison {
    /// p-value of the one-sample t-test.
    pub t_prob: f64,
    /// `2 · Φ(c; mean, sd/√n)`.
    pub normal_prob: f64,
}

impl fmt::Display for NormalComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "The probability from the t-test is {:5.4}, and from the normal distribution {:5.4}",
            self.t_prob, self.normal_prob
        )
    }
}

/// Compare the t-test p-value with the normal approximation for `values` against `c`.
pub fn compare_probabilities(values: &[f64], c: f64) -> Result<NormalComparison> {
    let t_prob = t_test_1samp(values, c)?.p_value;
    let sample = Sample::new(values.to_vec());
    let normal_prob = 2.0 * normal_cdf_with(c, sample.mean(), sample.sem())?;
    Ok(NormalComparison {
        t_prob,
        normal_prob,
    })
}

/// Run the comparison on the configured seeded sample.
///
/// # Example
/// ```
/// use stat_quantlets::hypothesis::{compare_with_normal, PowerConfig};
///
/// let cmp = compare_with_normal(&PowerConfig::default()).unwrap();
/// assert!((cmp.normal_prob - 0.0542).abs() < 1e-4);
/// ```
pub fn compare_with_normal(config: &PowerConfig) -> Result<NormalComparison> {
    let sample = config.sample();
    compare_probabilities(sample.values(), config.check_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_probabilities() {
        let cmp = compare_with_normal(&PowerConfig::default()).unwrap();
        assert_relative_eq!(cmp.normal_prob, 0.054201154690070759, epsilon = 1e-10);
        assert_relative_eq!(cmp.t_prob, 0.05707107880872948, epsilon = 1e-8);
        assert!(cmp.t_prob > cmp.normal_prob);
    }

    #[test]
    fn rendering() {
        let cmp = NormalComparison {
            t_prob: 0.05707,
            normal_prob: 0.05420,
        };
        assert_eq!(
            cmp.to_string(),
            "The probability from the t-test is 0.0571, and from the normal distribution 0.0542\n"
        );
    }
}

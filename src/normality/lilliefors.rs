//! Lilliefors test: KS distance with estimated mean and variance.

use super::kolmogorov_smirnov::ks_distance;
use crate::core::TestResult;
use crate::error::{ensure_len, QuantletError, Result};
use crate::utils::distributions::normal_cdf;
use crate::utils::stats::{mean, sorted, std_dev};

/// Lilliefors test of normality.
///
/// The statistic is the KS distance to N(mean, sd²) with the sample mean and
/// sample standard deviation. The p-value follows Dallal and Wilkinson's
/// approximation; when it exceeds 0.1 Stephens' modified statistic is used
/// instead. Requires at least 5 observations.
pub fn lilliefors(values: &[f64]) -> Result<TestResult> {
    ensure_len(values, 5)?;
    let sd = std_dev(values);
    if sd <= 0.0 {
        return Err(QuantletError::ConstantData);
    }
    let m = mean(values);
    let x = sorted(values);
    let d = ks_distance(&x, |v| normal_cdf((v - m) / sd));
    Ok(TestResult::new(d, p_value(d, x.len())))
}

fn p_value(d: f64, n: usize) -> f64 {
    let nf = n as f64;
    let (kd, nd) = if n <= 100 {
        (d, nf)
    } else {
        (d * (nf / 100.0).powf(0.49), 100.0)
    };
    let p = (-7.01256 * kd * kd * (nd + 2.78019) + 2.99587 * kd * (nd + 2.78019).sqrt()
        - 0.122119
        + 0.974598 / nd.sqrt()
        + 1.67997 / nd)
        .exp();
    if p <= 0.1 {
        return p;
    }

    let kk = (nf.sqrt() - 0.01 + 0.85 / nf.sqrt()) * d;
    let p = if kk <= 0.302 {
        1.0
    } else if kk <= 0.5 {
        2.76773 - 19.828315 * kk + 80.709644 * kk.powi(2) - 138.55152 * kk.powi(3)
            + 81.218052 * kk.powi(4)
    } else if kk <= 0.9 {
        -4.901232 + 40.662806 * kk - 97.490286 * kk.powi(2) + 94.029866 * kk.powi(3)
            - 32.355711 * kk.powi(4)
    } else if kk <= 1.31 {
        6.198765 - 19.558097 * kk + 23.186922 * kk.powi(2) - 12.234627 * kk.powi(3)
            + 2.423045 * kk.powi(4)
    } else {
        0.0
    };
    p.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::SeededNormal;
    use approx::assert_relative_eq;

    #[test]
    fn reference_samples() {
        let data = SeededNormal::new(12345).normals(0.0, 3.0, 1000);

        let full = lilliefors(&data).unwrap();
        assert_relative_eq!(full.statistic, 0.02658722456006951, epsilon = 1e-9);
        assert_relative_eq!(full.p_value, 0.09274050397396842, epsilon = 1e-6);

        let few = lilliefors(&data[..100]).unwrap();
        assert_relative_eq!(few.statistic, 0.07811087234360126, epsilon = 1e-9);
        assert_relative_eq!(few.p_value, 0.13997954709830474, epsilon = 1e-6);
    }

    #[test]
    fn small_distance_gives_p_one() {
        assert_eq!(p_value(0.01, 50), 1.0);
    }

    #[test]
    fn large_distance_gives_small_p() {
        assert!(p_value(0.3, 50) < 1e-4);
    }

    #[test]
    fn needs_five_points() {
        assert!(matches!(
            lilliefors(&[1.0, 2.0, 3.0, 4.0]),
            Err(QuantletError::InsufficientData { needed: 5, got: 4 })
        ));
    }
}

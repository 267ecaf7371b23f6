//! Shapiro-Wilk W test (Royston's AS R94 approximation).

use crate::core::TestResult;
use crate::error::{ensure_len, QuantletError, Result};
use crate::utils::distributions::{normal_ppf, normal_sf};
use crate::utils::stats::{mean, sorted};
use tracing::warn;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Largest sample size for which the p-value approximation is calibrated.
pub const MAX_CALIBRATED_N: usize = 5000;

/// Evaluate `c[0] + c[1] x + c[2] x² + ...`.
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// Shapiro-Wilk coefficients `a_1..a_{n/2}` for the pairs `x_(n+1-i) - x_(i)`.
fn coefficients(n: usize) -> Vec<f64> {
    let half = n / 2;
    if n == 3 {
        return vec![std::f64::consts::FRAC_1_SQRT_2];
    }
    let an25 = n as f64 + 0.25;
    let m: Vec<f64> = (1..=half)
        .map(|i| normal_ppf((i as f64 - 0.375) / an25))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;

    let mut a = Vec::with_capacity(half);
    let (first, fac) = if n > 5 {
        let a2 = poly(&C2, rsn) - m[1] / ssumm2;
        let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
            .sqrt();
        a.push(a1);
        a.push(a2);
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        a.push(a1);
        (1, fac)
    };
    a.extend(m[first..].iter().map(|mi| -mi / fac));
    a
}

/// Shapiro-Wilk test of normality.
///
/// Valid for 3 <= n <= 5000; larger samples are tested but a warning is
/// logged because the p-value approximation is not calibrated there.
pub fn shapiro_wilk(values: &[f64]) -> Result<TestResult> {
    ensure_len(values, 3)?;
    let n = values.len();
    if n > MAX_CALIBRATED_N {
        warn!(n, "p-value may not be accurate for n > {}", MAX_CALIBRATED_N);
    }

    let x = sorted(values);
    let range = x[n - 1] - x[0];
    if range <= f64::EPSILON * x[n - 1].abs().max(1.0) {
        return Err(QuantletError::ConstantData);
    }

    let a = coefficients(n);
    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
        .sum();
    let m = mean(&x);
    let ssq: f64 = x.iter().map(|v| (v - m).powi(2)).sum();
    let w = (numerator * numerator / ssq).min(1.0);

    Ok(TestResult::new(w, p_value(w, n)))
}

fn p_value(w: f64, n: usize) -> f64 {
    if n == 3 {
        let pi6 = 6.0 / std::f64::consts::PI;
        let stqr = std::f64::consts::FRAC_PI_3;
        return (pi6 * (w.sqrt().asin() - stqr)).max(0.0);
    }
    if w >= 1.0 {
        return 1.0;
    }

    let an = n as f64;
    let mut y = (1.0 - w).ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return 1e-99;
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (poly(&C5, xx), poly(&C6, xx).exp())
    };
    normal_sf((y - m) / s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::SeededNormal;
    use approx::assert_relative_eq;

    #[test]
    fn poly_evaluates_in_ascending_order() {
        assert_relative_eq!(poly(&[1.0, 2.0, 3.0], 2.0), 17.0, epsilon = 1e-12);
    }

    #[test]
    fn coefficients_are_normalized() {
        for n in [4, 5, 6, 11, 50, 301] {
            let a = coefficients(n);
            let sum_sq = 2.0 * a.iter().map(|v| v * v).sum::<f64>();
            assert_relative_eq!(sum_sq, 1.0, epsilon = 1e-10);
            assert!(a.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn known_small_sample() {
        let data = [2.1, 3.4, 1.9, 5.6, 4.4, 3.3, 2.8, 4.9, 3.7, 4.1];
        let result = shapiro_wilk(&data).unwrap();
        assert_relative_eq!(result.statistic, 0.97867758854502, epsilon = 1e-6);
        assert_relative_eq!(result.p_value, 0.9576993402343787, epsilon = 1e-4);
    }

    #[test]
    fn three_equally_spaced_points() {
        let result = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
        assert_relative_eq!(result.statistic, 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.p_value, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn normal_sample_is_accepted() {
        let data = SeededNormal::new(12345).normals(0.0, 3.0, 100);
        let result = shapiro_wilk(&data).unwrap();
        assert!(result.statistic > 0.98);
        assert!(result.p_value > 0.05);
    }

    #[test]
    fn exponential_sample_is_rejected() {
        let data: Vec<f64> = (1..=100).map(|i| (i as f64 / 10.0).exp()).collect();
        let result = shapiro_wilk(&data).unwrap();
        assert!(result.p_value < 1e-6);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(matches!(
            shapiro_wilk(&[1.0, 2.0]),
            Err(QuantletError::InsufficientData { .. })
        ));
        assert_eq!(shapiro_wilk(&[2.0; 10]), Err(QuantletError::ConstantData));
    }
}

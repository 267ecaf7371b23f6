//! ARMA processes defined by their lag polynomials.

use crate::error::{QuantletError, Result};
use crate::utils::random::SeededNormal;

/// An ARMA process `ar(L) y_t = ma(L) e_t`.
///
/// Polynomials are stored with the zero lag first, so an AR(1) with
/// coefficient 0.5 has `ar = [1, -0.5]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmaProcess {
    ar: Vec<f64>,
    ma: Vec<f64>,
}

/// Whether the polynomial `1 - a_1 z - ... - a_p z^p` has all roots outside
/// the unit circle, checked by the step-down (Schur-Cohn) recursion.
pub(crate) fn roots_outside_unit_circle(coefs: &[f64]) -> bool {
    let mut a = coefs.to_vec();
    while a.last() == Some(&0.0) {
        a.pop();
    }
    for k in (1..=a.len()).rev() {
        let kappa = a[k - 1];
        if !kappa.is_finite() || kappa.abs() >= 1.0 {
            return false;
        }
        let denom = 1.0 - kappa * kappa;
        let prev: Vec<f64> = (0..k - 1)
            .map(|j| (a[j] + kappa * a[k - 2 - j]) / denom)
            .collect();
        a = prev;
    }
    true
}

impl ArmaProcess {
    /// Create a process from lag polynomials (zero lag first).
    pub fn new(ar: Vec<f64>, ma: Vec<f64>) -> Result<Self> {
        let lead = |p: &[f64], name: &str| match p.first() {
            Some(&c) if c != 0.0 && c.is_finite() => Ok(c),
            _ => Err(QuantletError::InvalidParameter(format!(
                "{} polynomial needs a non-zero leading coefficient",
                name
            ))),
        };
        let ar0 = lead(&ar, "AR")?;
        let ma0 = lead(&ma, "MA")?;
        Ok(Self {
            ar: ar.iter().map(|c| c / ar0).collect(),
            ma: ma.iter().map(|c| c / ma0).collect(),
        })
    }

    /// Create a process from coefficients: `y_t = Σ φ_i y_{t-i} + e_t + Σ θ_j e_{t-j}`.
    pub fn from_coeffs(arcoefs: &[f64], macoefs: &[f64]) -> Self {
        let mut ar = vec![1.0];
        ar.extend(arcoefs.iter().map(|c| -c));
        let mut ma = vec![1.0];
        ma.extend_from_slice(macoefs);
        Self { ar, ma }
    }

    /// AR lag polynomial.
    pub fn ar(&self) -> &[f64] {
        &self.ar
    }

    /// MA lag polynomial.
    pub fn ma(&self) -> &[f64] {
        &self.ma
    }

    /// AR coefficients `φ`.
    pub fn arcoefs(&self) -> Vec<f64> {
        self.ar[1..].iter().map(|c| -c).collect()
    }

    /// MA coefficients `θ`.
    pub fn macoefs(&self) -> Vec<f64> {
        self.ma[1..].to_vec()
    }

    pub fn is_stationary(&self) -> bool {
        roots_outside_unit_circle(&self.arcoefs())
    }

    pub fn is_invertible(&self) -> bool {
        let neg: Vec<f64> = self.ma[1..].iter().map(|c| -c).collect();
        roots_outside_unit_circle(&neg)
    }

    /// First `n` coefficients of the MA(∞) representation `ψ_0 = 1, ψ_1, …`.
    pub fn impulse_response(&self, n: usize) -> Vec<f64> {
        let phi = self.arcoefs();
        let mut psi = Vec::with_capacity(n);
        for j in 0..n {
            let mut v = self.ma.get(j).copied().unwrap_or(0.0);
            for (i, p) in phi.iter().enumerate().take(j) {
                v += p * psi[j - 1 - i];
            }
            psi.push(v);
        }
        psi
    }

    /// Filter innovations through the process (`lfilter(ma, ar, eta)`).
    pub fn filter(&self, innovations: &[f64]) -> Vec<f64> {
        let mut y = Vec::with_capacity(innovations.len());
        for t in 0..innovations.len() {
            let mut v: f64 = self
                .ma
                .iter()
                .enumerate()
                .take(t + 1)
                .map(|(j, m)| m * innovations[t - j])
                .sum();
            for (i, a) in self.ar.iter().enumerate().skip(1).take(t) {
                v -= a * y[t - i];
            }
            y.push(v);
        }
        y
    }

    /// Simulate `n` observations driven by `scale`-scaled standard normal
    /// innovations; the first `burnin` values are discarded.
    pub fn generate_sample(
        &self,
        n: usize,
        scale: f64,
        burnin: usize,
        rng: &mut SeededNormal,
    ) -> Vec<f64> {
        let eta: Vec<f64> = (0..n + burnin)
            .map(|_| scale * rng.standard_normal())
            .collect();
        self.filter(&eta).split_off(burnin)
    }
}

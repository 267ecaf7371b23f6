//! Probability distribution helpers.
//!
//! Thin wrappers over `statrs` for the distributions the tests need, plus two
//! distributions `statrs` lacks: the non-central t and the finite-sample
//! Kolmogorov distribution of the one-sample KS statistic.

use crate::error::{QuantletError, Result};
use statrs::distribution::{
    ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT,
};
use statrs::function::beta::beta_reg;
use statrs::function::gamma::ln_gamma;

fn dist_err(e: impl std::fmt::Display) -> QuantletError {
    QuantletError::Distribution(e.to_string())
}

/// Standard normal distribution.
pub fn standard_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("unit normal parameters are valid")
}

/// Standard normal CDF.
pub fn normal_cdf(x: f64) -> f64 {
    standard_normal().cdf(x)
}

/// Standard normal survival function.
pub fn normal_sf(x: f64) -> f64 {
    standard_normal().sf(x)
}

/// Standard normal quantile.
pub fn normal_ppf(p: f64) -> f64 {
    standard_normal().inverse_cdf(p)
}

/// CDF of N(`loc`, `scale`^2) at `x`.
pub fn normal_cdf_with(x: f64, loc: f64, scale: f64) -> Result<f64> {
    let dist = Normal::new(loc, scale).map_err(dist_err)?;
    Ok(dist.cdf(x))
}

/// Student t distribution with `df` degrees of freedom, shifted and scaled.
pub fn students_t(df: f64, loc: f64, scale: f64) -> Result<StudentsT> {
    StudentsT::new(loc, scale, df).map_err(dist_err)
}

/// Survival function of the standard t distribution.
pub fn t_sf(x: f64, df: f64) -> Result<f64> {
    Ok(students_t(df, 0.0, 1.0)?.sf(x))
}

/// Quantile of the t distribution with location and scale.
pub fn t_ppf(p: f64, df: f64, loc: f64, scale: f64) -> Result<f64> {
    Ok(students_t(df, loc, scale)?.inverse_cdf(p))
}

/// Inverse survival function of the standard t distribution.
pub fn t_isf(p: f64, df: f64) -> Result<f64> {
    t_ppf(1.0 - p, df, 0.0, 1.0)
}

/// Survival function of the chi-squared distribution.
pub fn chi2_sf(x: f64, df: f64) -> Result<f64> {
    if x <= 0.0 {
        return Ok(1.0);
    }
    let dist = ChiSquared::new(df).map_err(dist_err)?;
    Ok(dist.sf(x))
}

/// Survival function of the F distribution.
pub fn f_sf(x: f64, df1: f64, df2: f64) -> Result<f64> {
    if x <= 0.0 {
        return Ok(1.0);
    }
    let dist = FisherSnedecor::new(df1, df2).map_err(dist_err)?;
    Ok(dist.sf(x))
}

/// CDF of the non-central t distribution, `P(T <= t)` for `df` degrees of
/// freedom and non-centrality `delta`.
///
/// Series expansion of Lenth (1989), AS 243.
pub fn noncentral_t_cdf(t: f64, df: f64, delta: f64) -> Result<f64> {
    if df <= 0.0 || !df.is_finite() {
        return Err(QuantletError::InvalidParameter(format!(
            "degrees of freedom must be positive, got {}",
            df
        )));
    }
    if delta == 0.0 {
        return Ok(students_t(df, 0.0, 1.0)?.cdf(t));
    }

    let (tt, del, negdel) = if t >= 0.0 {
        (t, delta, false)
    } else {
        (-t, -delta, true)
    };

    let x = tt * tt / (tt * tt + df);
    let mut tnc = 0.0;

    if x > 0.0 {
        let lambda = del * del;
        let mut p = 0.5 * (-0.5 * lambda).exp();
        let mut q = (2.0 / std::f64::consts::PI).sqrt() * p * del;
        let mut s = 0.5 - p;
        if s < 1e-7 {
            s = -0.5 * (-0.5 * lambda).exp_m1();
        }
        let mut a = 0.5;
        let b = 0.5 * df;
        let rxb = (1.0 - x).powf(b);
        let albeta = std::f64::consts::PI.sqrt().ln() + ln_gamma(b) - ln_gamma(0.5 + b);
        let mut xodd = beta_reg(a, b, x);
        let mut godd = 2.0 * rxb * (a * x.ln() - albeta).exp();
        let bx = b * x;
        let mut xeven = if bx < f64::EPSILON { bx } else { 1.0 - rxb };
        let mut geven = bx * rxb;
        tnc = p * xodd + q * xeven;

        for it in 1..=1000 {
            a += 1.0;
            xodd -= godd;
            xeven -= geven;
            godd *= x * (a + b - 1.0) / a;
            geven *= x * (a + b - 0.5) / (a + 0.5);
            p *= lambda / (2.0 * it as f64);
            q *= lambda / (2.0 * it as f64 + 1.0);
            tnc += p * xodd + q * xeven;
            s -= p;
            if s < -1e-10 {
                break;
            }
            if s <= 0.0 && it > 1 {
                break;
            }
            let errbd = 2.0 * s * (xodd - godd);
            if errbd.abs() < 1e-12 && it > 1 {
                break;
            }
        }
    }

    tnc += normal_cdf(-del);
    let tnc = tnc.clamp(0.0, 1.0);
    Ok(if negdel { 1.0 - tnc } else { tnc })
}

/// Survival function of the non-central t distribution.
pub fn noncentral_t_sf(t: f64, df: f64, delta: f64) -> Result<f64> {
    Ok(1.0 - noncentral_t_cdf(t, df, delta)?)
}

/// `P(D_n < d)` for the one-sample, two-sided Kolmogorov-Smirnov statistic.
///
/// Exact evaluation by Marsaglia, Tsang and Wang (2003), falling back to their
/// asymptotic formula when `n·d²` is large.
pub fn kolmogorov_cdf(n: usize, d: f64) -> f64 {
    if d <= 0.0 {
        return 0.0;
    }
    if d >= 1.0 {
        return 1.0;
    }
    let nf = n as f64;
    let s = d * d * nf;
    if s > 7.24 || (s > 3.76 && n > 99) {
        let p = 1.0 - 2.0 * (-(2.000071 + 0.331 / nf.sqrt() + 1.409 / nf) * s).exp();
        return p.clamp(0.0, 1.0);
    }

    let k = (nf * d) as usize + 1;
    let m = 2 * k - 1;
    let h = k as f64 - nf * d;

    let mut hm = vec![0.0; m * m];
    for i in 0..m {
        for j in 0..m {
            hm[i * m + j] = if i + 1 >= j { 1.0 } else { 0.0 };
        }
    }
    for i in 0..m {
        hm[i * m] -= h.powi(i as i32 + 1);
        hm[(m - 1) * m + i] -= h.powi((m - i) as i32);
    }
    if 2.0 * h - 1.0 > 0.0 {
        hm[(m - 1) * m] += (2.0 * h - 1.0).powi(m as i32);
    }
    for i in 0..m {
        for j in 0..m {
            if i + 1 > j {
                for g in 1..=(i + 1 - j) {
                    hm[i * m + j] /= g as f64;
                }
            }
        }
    }

    let (q, mut eq) = matrix_power(&hm, 0, m, n);
    let mut s = q[(k - 1) * m + k - 1];
    for i in 1..=n {
        s = s * i as f64 / nf;
        if s < 1e-140 {
            s *= 1e140;
            eq -= 140;
        }
    }
    (s * 10f64.powi(eq)).clamp(0.0, 1.0)
}

/// Survival function of the one-sample Kolmogorov-Smirnov statistic.
pub fn kolmogorov_sf(n: usize, d: f64) -> f64 {
    (1.0 - kolmogorov_cdf(n, d)).clamp(0.0, 1.0)
}

fn matrix_multiply(a: &[f64], b: &[f64], m: usize) -> Vec<f64> {
    let mut c = vec![0.0; m * m];
    for i in 0..m {
        for j in 0..m {
            let mut s = 0.0;
            for k in 0..m {
                s += a[i * m + k] * b[k * m + j];
            }
            c[i * m + j] = s;
        }
    }
    c
}

/// Matrix power with a decimal exponent carried separately to avoid overflow.
fn matrix_power(a: &[f64], ea: i32, m: usize, n: usize) -> (Vec<f64>, i32) {
    if n == 1 {
        return (a.to_vec(), ea);
    }
    let (v, ev) = matrix_power(a, ea, m, n / 2);
    let b = matrix_multiply(&v, &v, m);
    let eb = 2 * ev;
    let (mut v, mut ev) = if n % 2 == 0 {
        (b, eb)
    } else {
        (matrix_multiply(a, &b, m), ea + eb)
    };
    if v[(m / 2) * m + m / 2] > 1e140 {
        for x in v.iter_mut() {
            *x *= 1e-140;
        }
        ev += 140;
    }
    (v, ev)
}

//! Differencing utilities for ARIMA models.

/// Apply differencing `d` times.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `d`-fold differencing of values that continue `original`.
///
/// `differenced` holds future values of the `d`-th difference; the result
/// continues `original` on its own scale.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    let mut result = differenced.to_vec();
    for level in (0..d).rev() {
        let anchor = difference(original, level).last().copied().unwrap_or(0.0);
        let mut cumsum = anchor;
        for v in result.iter_mut() {
            cumsum += *v;
            *v = cumsum;
        }
    }
    result
}

/// Coefficients of `(1 - L)^d`, lowest power first.
pub fn differencing_polynomial(d: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        let mut next = vec![0.0; poly.len() + 1];
        for (i, c) in poly.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c;
        }
        poly = next;
    }
    poly
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn difference_orders() {
        let series = vec![1.0, 4.0, 9.0, 16.0, 25.0];
        assert_eq!(difference(&series, 0), series);
        assert_eq!(difference(&series, 1), vec![3.0, 5.0, 7.0, 9.0]);
        assert_eq!(difference(&series, 2), vec![2.0, 2.0, 2.0]);
        assert!(difference(&[1.0], 1).is_empty());
    }

    #[test]
    fn integrate_continues_series() {
        let series = vec![1.0, 4.0, 9.0, 16.0, 25.0];
        // Next squares 36, 49 have first differences 11, 13 and second differences 2, 2.
        let first = integrate(&[11.0, 13.0], &series, 1);
        assert_eq!(first, vec![36.0, 49.0]);
        let second = integrate(&[2.0, 2.0], &series, 2);
        for (a, b) in second.iter().zip([36.0, 49.0]) {
            assert_relative_eq!(*a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn integrate_order_zero_is_identity() {
        assert_eq!(integrate(&[1.5, 2.5], &[9.0], 0), vec![1.5, 2.5]);
    }

    #[test]
    fn polynomial_of_second_difference() {
        assert_eq!(differencing_polynomial(0), vec![1.0]);
        assert_eq!(differencing_polynomial(2), vec![1.0, -2.0, 1.0]);
    }
}

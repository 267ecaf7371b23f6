//! Descriptive statistics on slices.

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Variance with `ddof` delta degrees of freedom (`ddof = 1` gives the sample variance).
pub fn variance_ddof(values: &[f64], ddof: usize) -> f64 {
    if values.len() <= ddof {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - ddof) as f64
}

/// Calculate the sample variance (n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    variance_ddof(values, 1)
}

/// Calculate the sample standard deviation (n-1 denominator).
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Standard error of the mean, `sd / sqrt(n)` with the sample standard deviation.
pub fn sem(values: &[f64]) -> f64 {
    std_dev(values) / (values.len() as f64).sqrt()
}

/// Calculate the median of a slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Central moment of order `k` (biased, 1/n).
pub fn central_moment(values: &[f64], k: i32) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(k)).sum::<f64>() / values.len() as f64
}

/// Biased sample skewness `g1 = m3 / m2^1.5`.
pub fn skewness(values: &[f64]) -> f64 {
    let m2 = central_moment(values, 2);
    if m2 <= 0.0 {
        return f64::NAN;
    }
    central_moment(values, 3) / m2.powf(1.5)
}

/// Biased sample kurtosis `m4 / m2^2` (Pearson's definition, 3 for a normal).
pub fn kurtosis(values: &[f64]) -> f64 {
    let m2 = central_moment(values, 2);
    if m2 <= 0.0 {
        return f64::NAN;
    }
    central_moment(values, 4) / (m2 * m2)
}

/// Standardize values to zero mean and unit sample standard deviation.
pub fn standardize(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = std_dev(values);
    values.iter().map(|x| (x - m) / sd).collect()
}

/// Sort a copy of the values in ascending order.
pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut x = values.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(mean(&[10.0]), 10.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn variance_calculates_correctly() {
        // Sample variance of [1, 2, 3, 4, 5] = 2.5
        assert_relative_eq!(variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5, epsilon = 1e-10);
        assert_relative_eq!(
            variance_ddof(&[1.0, 2.0, 3.0, 4.0, 5.0], 0),
            2.0,
            epsilon = 1e-10
        );
        assert!(variance(&[1.0]).is_nan());
        assert!(variance(&[]).is_nan());
    }

    #[test]
    fn sem_uses_sample_std() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sem(&data), std_dev(&data) / 8f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn median_calculates_correctly() {
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5, epsilon = 1e-10);
        assert_relative_eq!(median(&[5.0, 1.0, 3.0, 2.0, 4.0]), 3.0, epsilon = 1e-10);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn symmetric_data_has_zero_skew() {
        let data = [-2.0, -1.0, 0.0, 1.0, 2.0];
        assert_relative_eq!(skewness(&data), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn kurtosis_of_two_point_distribution() {
        // Two equally likely points: m4 / m2^2 = 1
        let data = [-1.0, 1.0, -1.0, 1.0];
        assert_relative_eq!(kurtosis(&data), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_data_has_undefined_shape() {
        assert!(skewness(&[3.0; 10]).is_nan());
        assert!(kurtosis(&[3.0; 10]).is_nan());
    }

    #[test]
    fn standardize_gives_unit_sd() {
        let z = standardize(&[1.0, 2.0, 3.0, 4.0, 10.0]);
        assert_relative_eq!(mean(&z), 0.0, epsilon = 1e-12);
        assert_relative_eq!(std_dev(&z), 1.0, epsilon = 1e-12);
    }
}

//! Ordered real-valued observations.

use crate::error::{ensure_len, Result};
use crate::utils::random::SeededNormal;
use crate::utils::stats;

/// An ordered sample, optionally tagged with the seed that generated it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Vec<f64>,
    seed: Option<u32>,
}

impl Sample {
    /// Wrap observed values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, seed: None }
    }

    /// Draw `n` values from N(`mean`, `sd`^2) with a reproducible seed.
    pub fn normal(n: usize, mean: f64, sd: f64, seed: u32) -> Self {
        let values = SeededNormal::new(seed).normals(mean, sd, n);
        Self {
            values,
            seed: Some(seed),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The first `k` observations (all of them if `k` exceeds the length).
    pub fn head(&self, k: usize) -> Sample {
        Sample {
            values: self.values[..k.min(self.values.len())].to_vec(),
            seed: self.seed,
        }
    }

    /// Check that the sample has at least `needed` finite values.
    pub fn validate(&self, needed: usize) -> Result<()> {
        ensure_len(&self.values, needed)
    }

    pub fn mean(&self) -> f64 {
        stats::mean(&self.values)
    }

    /// Sample standard deviation (ddof = 1).
    pub fn std_dev(&self) -> f64 {
        stats::std_dev(&self.values)
    }

    /// Standard error of the mean.
    pub fn sem(&self) -> f64 {
        stats::sem(&self.values)
    }
}

impl From<Vec<f64>> for Sample {
    fn from(values: Vec<f64>) -> Self {
        Sample::new(values)
    }
}

impl AsRef<[f64]> for Sample {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

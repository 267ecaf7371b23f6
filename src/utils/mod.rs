//! Shared numerical utilities: descriptive statistics, distributions,
//! seeded random numbers, small linear algebra and optimization.

pub mod distributions;
pub mod linalg;
pub mod optimization;
pub mod random;
pub mod stats;

pub use distributions::{normal_cdf, normal_ppf, noncentral_t_cdf, kolmogorov_sf};
pub use optimization::{nelder_mead, numerical_hessian, NelderMeadConfig, NelderMeadResult};
pub use random::{Mt19937, SeededNormal};
pub use stats::{mean, median, sem, std_dev, variance};

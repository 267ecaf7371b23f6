//! Serial-dependence analysis and residual diagnostics.
//!
//! # Example
//!
//! ```
//! use stat_quantlets::validation::{acf, durbin_watson, ljung_box};
//!
//! let residuals = vec![0.1, -0.2, 0.15, -0.1, 0.05, -0.08, 0.12, -0.15, 0.1, -0.05];
//! let lb = ljung_box(&residuals, Some(5), 0);
//! assert!(lb.p_value >= 0.0 && lb.p_value <= 1.0);
//!
//! let dw = durbin_watson(&residuals);
//! assert!(dw > 2.0);
//!
//! let correlogram = acf(&residuals, Some(3), Some(0.05)).unwrap();
//! assert_eq!(correlogram.values.len(), 4);
//! ```

pub mod autocorrelation;
pub mod residual_tests;

pub use autocorrelation::{
    acf, autocovariance, default_nlags, levinson_durbin, pacf, yule_walker, CorrelogramResult,
    PacfMethod,
};
pub use residual_tests::{
    box_pierce, durbin_watson, heteroskedasticity, jarque_bera, ljung_box,
    HeteroskedasticityResult, JarqueBeraResult, PortmanteauResult,
};

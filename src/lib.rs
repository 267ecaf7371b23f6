//! # stat-quantlets
//!
//! Classical statistics quantlets with the routines they need.
//!
//! - [`normality`]: omnibus, Shapiro-Wilk, Lilliefors and Kolmogorov-Smirnov
//!   tests on a seeded normal sample.
//! - [`hypothesis`]: one-sample t-test, Wilcoxon signed-rank test, confidence
//!   intervals, power of the t-test and the normal approximation.
//! - [`pipeline`]: the Mauna Loa CO2 series through seasonal decomposition,
//!   correlograms and ARIMA fits.
//!
//! ```
//! use stat_quantlets::prelude::*;
//!
//! let report = check_normality(&NormalityConfig::default()).unwrap();
//! assert!(report.is_normal);
//! ```

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod data;
pub mod error;
pub mod hypothesis;
pub mod logging;
pub mod models;
pub mod normality;
pub mod output;
pub mod pipeline;
pub mod seasonality;
pub mod utils;
pub mod validation;

pub use error::{QuantletError, Result};

pub mod prelude {
    pub use crate::core::{MonthlySeries, PValueTable, Sample, TestResult};
    pub use crate::error::{QuantletError, Result};
    pub use crate::hypothesis::{
        check_mean, compare_with_normal, explain_power, OneGroupConfig, PowerConfig,
    };
    pub use crate::models::arima::{ArmaProcess, Trend, ARIMA};
    pub use crate::normality::{check_normality, NormalityConfig};
    pub use crate::pipeline::PipelineConfig;
    pub use crate::seasonality::{seasonal_decompose, DecomposeConfig};
}

//! ARIMA models and ARMA processes.
//!
//! This module provides:
//! - ARIMA(p, d, q) fitted by conditional sum of squares
//! - ARMA processes for simulation, stationarity and invertibility checks
//! - fit summaries with residual diagnostics

mod diff;
mod model;
mod process;
mod summary;

pub use diff::{difference, differencing_polynomial, integrate};
pub use model::{ARIMASpec, ArimaForecast, Trend, ARIMA};
pub use process::ArmaProcess;
pub use summary::{ArimaSummary, ParamEstimate};

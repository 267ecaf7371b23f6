//! Time series models.

pub mod arima;

pub use arima::{ArimaSummary, ArmaProcess, Trend, ARIMA};

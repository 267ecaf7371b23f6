//! Core data structures: samples, test results and monthly time series.

mod sample;
mod test_result;
mod time_series;

pub use sample::Sample;
pub use test_result::{PValueTable, TestResult};
pub use time_series::{month_start, MissingValuePolicy, MonthlySeries, MONTHLY_PERIOD};

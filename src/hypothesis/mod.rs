//! Significance tests for the mean of one group.
//!
//! - [`t_test_1samp`] and [`wilcoxon`] test a sample against a reference value
//! - [`check_mean`] runs the one-group quantlet on a data file
//! - [`explain_power`] reproduces the arithmetic of a t-test report
//! - [`compare_with_normal`] contrasts t and normal probabilities

mod compare;
mod one_sample;
mod power;
mod wilcoxon;

pub use compare::{compare_probabilities, compare_with_normal, NormalComparison};
pub use one_sample::{
    analyze_one_group, check_mean, confidence_interval, describe, t_test_1samp, Descriptives,
    OneGroupConfig, OneGroupReport,
};
pub use power::{explain_power, power_analysis, PowerConfig, PowerReport};
pub use wilcoxon::{average_ranks, wilcoxon, wilcoxon_with, WilcoxonMethod, EXACT_MAX_N};

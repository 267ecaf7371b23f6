//! End-to-end checks of the quantlets against published reference values.

use approx::assert_relative_eq;
use stat_quantlets::hypothesis::{
    check_mean, compare_with_normal, explain_power, OneGroupConfig, PowerConfig,
};
use stat_quantlets::normality::{
    check_normality, NormalityConfig, KOLMOGOROV_SMIRNOV, LILLIEFORS, OMNIBUS, SHAPIRO_WILK,
};
use stat_quantlets::QuantletError;
use std::path::PathBuf;

fn altman_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/altman_91.txt")
}

#[test]
fn normality_of_seeded_sample() {
    let report = check_normality(&NormalityConfig::default()).unwrap();
    assert_eq!(report.sample.len(), 1000);
    assert_eq!(report.few_len, 100);
    assert!(report.is_normal);

    assert_relative_eq!(
        report.all.p_value(OMNIBUS).unwrap(),
        0.12218581446378574,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        report.all.p_value(KOLMOGOROV_SMIRNOV).unwrap(),
        0.4714475119829883,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        report.few.p_value(KOLMOGOROV_SMIRNOV).unwrap(),
        0.5487898613955835,
        epsilon = 1e-6
    );
    for table in [&report.all, &report.few] {
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![OMNIBUS, SHAPIRO_WILK, LILLIEFORS, KOLMOGOROV_SMIRNOV]);
    }
}

#[test]
fn normality_report_text() {
    let text = check_normality(&NormalityConfig::default())
        .unwrap()
        .to_string();
    assert!(text.contains("p-values for all 1000 data points:"));
    assert!(text.contains("p-values for the first 100 data points:"));
    assert!(text.contains("Data are normally distributed"));
}

#[test]
fn one_group_t_test() {
    let config = OneGroupConfig::default().with_path(altman_path());
    let report = check_mean(&config).unwrap();
    assert_relative_eq!(report.p_value(), 0.018137235176105802, epsilon = 1e-9);
    assert_relative_eq!(report.wilcoxon.p_value, 0.026157182329284708, epsilon = 1e-9);
    assert!(!report.is_likely());
    let (lo, hi) = report.confidence_interval;
    assert!(lo < report.descriptives.mean && report.descriptives.mean < hi);
}

#[test]
fn missing_data_file() {
    let config = OneGroupConfig::default().with_path("does/not/exist.txt");
    assert!(matches!(check_mean(&config), Err(QuantletError::Io(_))));
}

#[test]
fn power_of_seeded_sample() {
    let report = explain_power(&PowerConfig::default()).unwrap();
    assert_eq!(report.dof, 99);
    assert_relative_eq!(report.t_val, 1.9252254884316862, epsilon = 1e-9);
    assert_relative_eq!(report.d, 0.19252254884316863, epsilon = 1e-10);
    assert_relative_eq!(report.p_val, 0.05707107880872948, epsilon = 1e-9);
    assert_relative_eq!(report.ci.0, 6.481589368299544, epsilon = 1e-6);
    assert_relative_eq!(report.ci.1, 7.720096960953641, epsilon = 1e-6);
    assert_relative_eq!(report.power, 0.47875082675535474, epsilon = 1e-6);
}

#[test]
fn normal_approximation() {
    let comparison = compare_with_normal(&PowerConfig::default()).unwrap();
    assert_relative_eq!(comparison.normal_prob, 0.054201154690070759, epsilon = 1e-9);
    assert!(comparison.normal_prob < comparison.t_prob);
}

//! Hypothesis test results and the name-keyed display table.

use std::fmt;

/// Statistic and p-value of a hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
}

impl TestResult {
    pub fn new(statistic: f64, p_value: f64) -> Self {
        Self {
            statistic,
            p_value: p_value.clamp(0.0, 1.0),
        }
    }

    /// Whether the null hypothesis is rejected at level `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Test results keyed by test name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PValueTable {
    entries: Vec<(String, TestResult)>,
}

impl PValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result, replacing an existing entry of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, result: TestResult) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = result,
            None => self.entries.push((name, result)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TestResult> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    /// p-value of the named test.
    pub fn p_value(&self, name: &str) -> Option<f64> {
        self.get(name).map(|r| r.p_value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TestResult)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for PValueTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.entries.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        for (name, result) in &self.entries {
            writeln!(f, "{:<width$}    {:.6}", name, result.p_value, width = width)?;
        }
        Ok(())
    }
}

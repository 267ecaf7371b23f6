//! Error types for the stat-quantlets library.

use thiserror::Error;

/// Result type alias for quantlet operations.
pub type Result<T> = std::result::Result<T, QuantletError>;

/// Errors that can occur while loading data or running a statistical routine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantletError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// All observations are identical.
    #[error("data are constant; the statistic is undefined")]
    ConstantData,

    /// NaN or infinite values in the input.
    #[error("non-finite values detected in data")]
    NonFinite,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A line of an input table could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Reading a local file failed.
    #[error("io error: {0}")]
    Io(String),

    /// Fetching a remote table failed.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A distribution could not be constructed.
    #[error("distribution error: {0}")]
    Distribution(String),

    /// Model must be fitted before this operation.
    #[error("model must be fitted before this operation")]
    FitRequired,

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl From<std::io::Error> for QuantletError {
    fn from(err: std::io::Error) -> Self {
        QuantletError::Io(err.to_string())
    }
}

/// Validate that a sample has at least `needed` finite values.
pub(crate) fn ensure_len(values: &[f64], needed: usize) -> Result<()> {
    if values.is_empty() {
        return Err(QuantletError::EmptyData);
    }
    if values.len() < needed {
        return Err(QuantletError::InsufficientData {
            needed,
            got: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(QuantletError::NonFinite);
    }
    Ok(())
}

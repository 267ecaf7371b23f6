//! Monthly time series with timestamps.

use crate::error::{QuantletError, Result};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Observations per year of a monthly series.
pub const MONTHLY_PERIOD: usize = 12;

/// Policy for handling missing values (NaN/Inf).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MissingValuePolicy {
    /// Drop observations with missing values.
    Drop,
    /// Forward fill (use previous valid value).
    ForwardFill,
    /// Return error if missing values found.
    Error,
}

/// A monthly time series: strictly increasing timestamps, one value each.
#[derive(Debug, Clone)]
pub struct MonthlySeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    label: String,
}

/// First instant of the given month.
pub fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        QuantletError::InvalidParameter(format!("invalid year/month {}-{}", year, month))
    })?;
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| QuantletError::ComputationError("midnight out of range".into()))?;
    Ok(Utc.from_utc_datetime(&naive))
}

impl MonthlySeries {
    /// Create a series from timestamps and values.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(QuantletError::InvalidParameter(format!(
                "{} timestamps for {} values",
                timestamps.len(),
                values.len()
            )));
        }
        if timestamps.windows(2).any(|w| w[1] <= w[0]) {
            return Err(QuantletError::InvalidParameter(
                "timestamps must be strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            timestamps,
            values,
            label: String::new(),
        })
    }

    /// Create a series of consecutive months starting at `start_year`/`start_month`.
    pub fn from_start(start_year: i32, start_month: u32, values: Vec<f64>) -> Result<Self> {
        let mut timestamps = Vec::with_capacity(values.len());
        let mut year = start_year;
        let mut month = start_month;
        for _ in 0..values.len() {
            timestamps.push(month_start(year, month)?);
            if month == 12 {
                month = 1;
                year += 1;
            } else {
                month += 1;
            }
        }
        Self::new(timestamps, values)
    }

    /// Attach a label (e.g. the column name).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Seasonal period (always 12 for monthly data).
    pub fn period(&self) -> usize {
        MONTHLY_PERIOD
    }

    /// `(year, month)` of the first observation.
    pub fn start(&self) -> Option<(i32, u32)> {
        self.timestamps.first().map(|t| (t.year(), t.month()))
    }

    /// Extract observations `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end > self.len() {
            return Err(QuantletError::InvalidParameter(format!(
                "slice {}..{} out of range for length {}",
                start,
                end,
                self.len()
            )));
        }
        Ok(Self {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            label: self.label.clone(),
        })
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Return a copy with missing values handled.
    pub fn sanitized(&self, policy: MissingValuePolicy) -> Result<Self> {
        match policy {
            MissingValuePolicy::Error => {
                if self.has_missing_values() {
                    return Err(QuantletError::NonFinite);
                }
                Ok(self.clone())
            }
            MissingValuePolicy::Drop => {
                let (timestamps, values): (Vec<_>, Vec<_>) = self
                    .timestamps
                    .iter()
                    .zip(&self.values)
                    .filter(|(_, v)| v.is_finite())
                    .map(|(t, v)| (*t, *v))
                    .unzip();
                Ok(Self {
                    timestamps,
                    values,
                    label: self.label.clone(),
                })
            }
            MissingValuePolicy::ForwardFill => {
                let first_valid = self
                    .values
                    .iter()
                    .position(|v| v.is_finite())
                    .ok_or(QuantletError::NonFinite)?;
                let mut last = self.values[first_valid];
                let values = self
                    .values
                    .iter()
                    .map(|&v| {
                        if v.is_finite() {
                            last = v;
                        }
                        last
                    })
                    .collect();
                Ok(Self {
                    timestamps: self.timestamps.clone(),
                    values,
                    label: self.label.clone(),
                })
            }
        }
    }
}

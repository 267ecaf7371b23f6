//! Monthly mean CO2 concentrations at Mauna Loa (NOAA GML).

use crate::core::{MonthlySeries, MONTHLY_PERIOD};
use crate::error::{QuantletError, Result};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info};

/// Default location of the monthly Mauna Loa table.
pub const DEFAULT_CO2_URL: &str = "https://gml.noaa.gov/webdata/ccgg/trends/co2/co2_mm_mlo.txt";

/// Column names of the table, in file order.
pub const CO2_COLUMNS: [&str; 8] = [
    "year",
    "month",
    "time",
    "co2",
    "deseasoned",
    "nr_days",
    "std_days",
    "uncertainty",
];

/// Values at or below this mark a missing monthly mean in older releases.
const MISSING_SENTINEL: f64 = -99.0;

/// One row of the monthly table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2Record {
    pub year: i32,
    pub month: u32,
    /// Decimal date.
    pub time: f64,
    /// Monthly mean mole fraction (ppm).
    pub co2: f64,
    /// De-seasonalized monthly mean (ppm).
    pub deseasoned: f64,
    /// Number of days with data (-1 when unknown).
    pub nr_days: i32,
    /// Standard deviation of the daily means (negative when unknown).
    pub std_days: f64,
    /// Uncertainty of the monthly mean (negative when unknown).
    pub uncertainty: f64,
}

/// Configuration for loading the CO2 table.
#[derive(Debug, Clone)]
pub struct Co2Config {
    /// URL of the whitespace-delimited table.
    pub url: String,
    /// Number of leading lines to skip; `None` skips every `#` comment line.
    pub skip_rows: Option<usize>,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Co2Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_CO2_URL.to_string(),
            skip_rows: None,
            timeout_secs: 30,
        }
    }
}

impl Co2Config {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = Some(skip_rows);
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// The parsed monthly table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Co2Table {
    pub records: Vec<Co2Record>,
}

impl Co2Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of the `co2` column.
    pub fn co2(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.co2).collect()
    }

    /// Pairs of decimal date and CO2 level.
    pub fn time_and_co2(&self) -> Vec<(f64, f64)> {
        self.records.iter().map(|r| (r.time, r.co2)).collect()
    }

    /// Render the first `k` rows as an aligned text table.
    pub fn head(&self, k: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>4} {:>6} {:>6} {:>10} {:>8} {:>11} {:>8} {:>9} {:>12}",
            "", CO2_COLUMNS[0], CO2_COLUMNS[1], CO2_COLUMNS[2], CO2_COLUMNS[3],
            CO2_COLUMNS[4], CO2_COLUMNS[5], CO2_COLUMNS[6], CO2_COLUMNS[7]
        );
        for (i, r) in self.records.iter().take(k).enumerate() {
            let _ = writeln!(
                out,
                "{:>4} {:>6} {:>6} {:>10.4} {:>8.2} {:>11.2} {:>8} {:>9.2} {:>12.2}",
                i, r.year, r.month, r.time, r.co2, r.deseasoned, r.nr_days, r.std_days,
                r.uncertainty
            );
        }
        out
    }

    /// Monthly series of the `co2` column; missing-value sentinels become NaN.
    pub fn to_series(&self) -> Result<MonthlySeries> {
        let first = self.records.first().ok_or(QuantletError::EmptyData)?;
        let values = self
            .records
            .iter()
            .map(|r| if r.co2 <= MISSING_SENTINEL { f64::NAN } else { r.co2 })
            .collect();
        let series = MonthlySeries::from_start(first.year, first.month, values)?.with_label("co2");
        if let Some(gap) = self
            .records
            .windows(2)
            .position(|w| month_index(&w[1]) != month_index(&w[0]) + 1)
        {
            return Err(QuantletError::Parse {
                line: gap + 2,
                message: "records are not consecutive months".to_string(),
            });
        }
        Ok(series)
    }
}

fn month_index(r: &Co2Record) -> i64 {
    r.year as i64 * MONTHLY_PERIOD as i64 + r.month as i64
}

fn parse_field<T: std::str::FromStr>(field: &str, name: &str, line: usize) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    field.parse::<T>().map_err(|e| QuantletError::Parse {
        line,
        message: format!("column '{}': '{}': {}", name, field, e),
    })
}

/// Parse the whitespace-delimited monthly table.
///
/// `skip_rows` lines are skipped first; with `None` every line starting with
/// `#` is treated as header. Blank lines are ignored. Each remaining line
/// must have the eight columns of [`CO2_COLUMNS`].
pub fn parse_co2_table(text: &str, skip_rows: Option<usize>) -> Result<Co2Table> {
    let mut records = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        if let Some(skip) = skip_rows {
            if idx < skip {
                continue;
            }
        }
        let line = raw.trim();
        if line.is_empty() || (skip_rows.is_none() && line.starts_with('#')) {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != CO2_COLUMNS.len() {
            return Err(QuantletError::Parse {
                line: line_no,
                message: format!(
                    "expected {} columns, found {}",
                    CO2_COLUMNS.len(),
                    fields.len()
                ),
            });
        }
        let month: u32 = parse_field(fields[1], CO2_COLUMNS[1], line_no)?;
        if !(1..=12).contains(&month) {
            return Err(QuantletError::Parse {
                line: line_no,
                message: format!("month {} out of range", month),
            });
        }
        records.push(Co2Record {
            year: parse_field(fields[0], CO2_COLUMNS[0], line_no)?,
            month,
            time: parse_field(fields[2], CO2_COLUMNS[2], line_no)?,
            co2: parse_field(fields[3], CO2_COLUMNS[3], line_no)?,
            deseasoned: parse_field(fields[4], CO2_COLUMNS[4], line_no)?,
            nr_days: parse_field(fields[5], CO2_COLUMNS[5], line_no)?,
            std_days: parse_field(fields[6], CO2_COLUMNS[6], line_no)?,
            uncertainty: parse_field(fields[7], CO2_COLUMNS[7], line_no)?,
        });
    }
    if records.is_empty() {
        return Err(QuantletError::EmptyData);
    }
    debug!(rows = records.len(), "parsed CO2 table");
    Ok(Co2Table { records })
}

/// Read the table from a local file.
pub fn read_co2_table(path: impl AsRef<Path>, skip_rows: Option<usize>) -> Result<Co2Table> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| QuantletError::Io(format!("{}: {}", path.display(), e)))?;
    parse_co2_table(&text, skip_rows)
}

/// Download and parse the table with a blocking HTTP GET.
#[cfg(feature = "fetch")]
pub fn fetch_co2_table(config: &Co2Config) -> Result<Co2Table> {
    info!(url = %config.url, "fetching CO2 table");
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("stat-quantlets/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| QuantletError::Fetch(e.to_string()))?;

    let response = client
        .get(&config.url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| QuantletError::Fetch(e.to_string()))?;

    let text = response
        .text()
        .map_err(|e| QuantletError::Fetch(e.to_string()))?;
    info!(bytes = text.len(), "downloaded CO2 table");

    parse_co2_table(&text, config.skip_rows)
}

/// Without the `fetch` feature the table can only be read from disk.
#[cfg(not(feature = "fetch"))]
pub fn fetch_co2_table(config: &Co2Config) -> Result<Co2Table> {
    info!(url = %config.url, "fetch feature disabled");
    Err(QuantletError::Fetch(
        "built without the `fetch` feature; read the table from a file instead".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const SAMPLE: &str = "\
# --------------------------------------------------------------------
# USE OF NOAA GML DATA
#
#  decimal       average   de-season  #days  st.dev  unc. of
#   date                    alized          of days  mon mean
1958   3   1958.2027      315.71      314.44     -1   -9.99   -0.99
1958   4   1958.2877      317.45      315.16     -1   -9.99   -0.99
1958   5   1958.3699      317.51      314.69     -1   -9.99   -0.99
";

    #[test]
    fn parses_rows_after_comments() {
        let table = parse_co2_table(SAMPLE, None).unwrap();
        assert_eq!(table.len(), 3);
        let first = table.records[0];
        assert_eq!(first.year, 1958);
        assert_eq!(first.month, 3);
        assert_eq!(first.co2, 315.71);
        assert_eq!(first.nr_days, -1);
        assert_eq!(table.co2(), vec![315.71, 317.45, 317.51]);
    }

    #[test]
    fn fixed_skip_rows() {
        let table = parse_co2_table(SAMPLE, Some(6)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].month, 4);
    }

    #[test]
    fn wrong_column_count_reports_line() {
        let text = "1958 3 1958.2 315.7 314.4 -1 -9.99 -0.99\n1958 4 1958.3 317.4\n";
        let err = parse_co2_table(text, None).unwrap_err();
        assert_eq!(
            err,
            QuantletError::Parse {
                line: 2,
                message: "expected 8 columns, found 4".to_string()
            }
        );
    }

    #[test]
    fn invalid_number_names_column() {
        let text = "1958 3 1958.2 abc 314.4 -1 -9.99 -0.99\n";
        match parse_co2_table(text, None) {
            Err(QuantletError::Parse { line, message }) => {
                assert_eq!(line, 1);
                assert!(message.contains("co2"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn series_starts_at_first_record() {
        let series = parse_co2_table(SAMPLE, None).unwrap().to_series().unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.label(), "co2");
        assert_eq!(series.timestamps()[0].month(), 3);
        assert_eq!(series.timestamps()[2].month(), 5);
    }

    #[test]
    fn sentinel_becomes_nan() {
        let text = "1958 3 1958.2 315.7 314.4 -1 -9.99 -0.99\n1958 4 1958.3 -99.99 315.1 -1 -9.99 -0.99\n";
        let series = parse_co2_table(text, None).unwrap().to_series().unwrap();
        assert!(series.values()[1].is_nan());
        assert!(series.has_missing_values());
    }

    #[test]
    fn gaps_are_rejected() {
        let text = "1958 3 1958.2 315.7 314.4 -1 -9.99 -0.99\n1958 5 1958.3 317.5 315.1 -1 -9.99 -0.99\n";
        assert!(parse_co2_table(text, None).unwrap().to_series().is_err());
    }

    #[test]
    fn head_renders_header_and_rows() {
        let table = parse_co2_table(SAMPLE, None).unwrap();
        let text = table.head(2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("deseasoned"));
        assert!(lines[1].contains("315.71"));
        assert!(lines[2].contains("1958.2877"));
    }
}

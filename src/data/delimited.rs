//! Delimited text files of numeric observations.

use crate::error::{QuantletError, Result};
use std::fs;
use std::path::Path;

/// Parse numbers separated by commas and/or whitespace.
///
/// Blank lines and lines starting with `#` are ignored. Empty fields between
/// consecutive commas are skipped.
pub fn parse_delimited(text: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for field in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
        {
            let value = field.parse::<f64>().map_err(|e| QuantletError::Parse {
                line: idx + 1,
                message: format!("'{}': {}", field, e),
            })?;
            values.push(value);
        }
    }
    if values.is_empty() {
        return Err(QuantletError::EmptyData);
    }
    Ok(values)
}

/// Read all numeric observations from a delimited text file.
pub fn read_delimited(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| QuantletError::Io(format!("{}: {}", path.display(), e)))?;
    parse_delimited(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated_line() {
        let values = parse_delimited("5260,5470, 5640\n").unwrap();
        assert_eq!(values, vec![5260.0, 5470.0, 5640.0]);
    }

    #[test]
    fn one_value_per_line_with_comments() {
        let text = "# energy intake\n\n1.5\n2.5\n  3.5  \n";
        assert_eq!(parse_delimited(text).unwrap(), vec![1.5, 2.5, 3.5]);
    }

    #[test]
    fn bad_field_reports_line() {
        let err = parse_delimited("1,2\n3,x\n").unwrap_err();
        assert!(matches!(err, QuantletError::Parse { line: 2, .. }));
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse_delimited("# nothing\n"), Err(QuantletError::EmptyData));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_delimited("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, QuantletError::Io(_)));
    }
}

//! Plain-text charts for terminal output.

use std::fmt::Write as _;

use crate::validation::CorrelogramResult;

const BAR: char = '#';
const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Horizontal histogram with `bins` equal-width bins and bars scaled to
/// `width` characters. Non-finite values are ignored.
pub fn histogram(values: &[f64], bins: usize, width: usize) -> String {
    let data: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if data.is_empty() || bins == 0 {
        return String::new();
    }
    let lo = data.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };
    let step = span / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &data {
        let idx = (((v - lo) / step) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

    let mut out = String::new();
    for (i, &count) in counts.iter().enumerate() {
        let left = lo + i as f64 * step;
        let bar_len = count * width / max_count;
        let _ = writeln!(
            out,
            "{:>10.3} | {:<width$} {}",
            left,
            BAR.to_string().repeat(bar_len),
            count,
            width = width
        );
    }
    out
}

/// Correlogram: one row per lag, with the confidence band marked by `:`.
pub fn correlogram(result: &CorrelogramResult, title: &str, width: usize) -> String {
    let half = (width / 2).max(1);
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    for (lag, &r) in result.values.iter().enumerate() {
        let mut cells = vec![' '; 2 * half + 1];
        cells[half] = '|';
        if let Some(ci) = &result.confint {
            let band = ((ci[lag].1 - r).abs() * half as f64).round() as usize;
            if band > 0 && band <= half {
                cells[half - band] = ':';
                cells[half + band] = ':';
            }
        }
        let len = ((r.abs().min(1.0)) * half as f64).round() as usize;
        for k in 1..=len {
            let idx = if r >= 0.0 { half + k } else { half - k };
            cells[idx] = BAR;
        }
        let _ = writeln!(
            out,
            "{:>4} {:>7.3} {}",
            lag,
            r,
            cells.into_iter().collect::<String>()
        );
    }
    out
}

/// One-line sketch of a series, resampled to at most `width` columns.
/// NaN values render as blanks.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let columns = width.min(values.len());
    let chunk = values.len() as f64 / columns as f64;
    let averaged: Vec<f64> = (0..columns)
        .map(|c| {
            let start = (c as f64 * chunk) as usize;
            let end = (((c + 1) as f64 * chunk) as usize).clamp(start + 1, values.len());
            let finite: Vec<f64> = values[start..end]
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            if finite.is_empty() {
                f64::NAN
            } else {
                finite.iter().sum::<f64>() / finite.len() as f64
            }
        })
        .collect();

    let lo = averaged
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::INFINITY, f64::min);
    let hi = averaged
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    let top = LEVELS.len() - 1;
    averaged
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                ' '
            } else if hi > lo {
                LEVELS[(((v - lo) / (hi - lo)) * top as f64).round() as usize]
            } else {
                LEVELS[top / 2]
            }
        })
        .collect()
}

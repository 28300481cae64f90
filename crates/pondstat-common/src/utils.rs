//! Shared numeric and formatting helpers.

use chrono::{DateTime, NaiveDate, Utc};

/// Bucket/alignment key for a calendar day, `YYYY-MM-DD`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Sum of the values, `0.0` for an empty input.
///
/// `Iterator::sum` over `f64` starts from `-0.0`, which would serialize
/// empty totals as `-0.0`.
pub fn total<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        #[allow(clippy::cast_precision_loss)]
        Some(sum / count as f64)
    }
}

/// `part / whole * 100`, `None` when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> Option<f64> {
    if whole > 0.0 {
        Some(part / whole * 100.0)
    } else {
        None
    }
}

/// Rounds to a fixed number of decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(i32::try_from(places).unwrap_or(i32::MAX));
    (value * factor).round() / factor
}

/// Renders an optional value with fixed precision, `N/A` when absent.
pub fn format_optional(value: Option<f64>, places: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.places$}"))
}

//! Temporal alignment of two pond series.
//!
//! Absolute alignment keys readings by calendar date. Relative alignment keys
//! them by cultivation day, counted from each series' own origin, so ponds
//! stocked weeks apart can be compared stage for stage.

use chrono::{NaiveDate, NaiveDateTime};
use pondstat_common::{date_key, mean, PondstatError};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Timeline a comparison is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    /// Calendar dates.
    #[default]
    Absolute,
    /// Cultivation days since each pond's origin.
    Relative,
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => f.write_str("absolute"),
            Self::Relative => f.write_str("relative"),
        }
    }
}

impl FromStr for AlignMode {
    type Err = PondstatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "relative" => Ok(Self::Relative),
            other => Err(PondstatError::validation_field(
                format!("Unknown alignment mode '{other}'"),
                "mode",
            )),
        }
    }
}

/// Alignment with the origins it needs already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Key by calendar date.
    Absolute,
    /// Key by day number; day 1 is the origin date of each side.
    Relative {
        /// Origin of series A.
        origin_a: NaiveDate,
        /// Origin of series B.
        origin_b: NaiveDate,
    },
}

impl Alignment {
    fn key_a(&self, timestamp: NaiveDateTime) -> AlignKey {
        match self {
            Self::Absolute => AlignKey::Date(timestamp.date()),
            Self::Relative { origin_a, .. } => AlignKey::day(timestamp, *origin_a),
        }
    }

    fn key_b(&self, timestamp: NaiveDateTime) -> AlignKey {
        match self {
            Self::Absolute => AlignKey::Date(timestamp.date()),
            Self::Relative { origin_b, .. } => AlignKey::day(timestamp, *origin_b),
        }
    }
}

/// Shared x-axis key of an aligned comparison.
///
/// Orders chronologically for dates and numerically for day numbers, so
/// "Day 10" sorts after "Day 2".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlignKey {
    /// Calendar date.
    Date(NaiveDate),
    /// Cultivation day, 1-based; readings before the origin get day 0 or less.
    Day(i64),
}

impl AlignKey {
    /// Day number of `timestamp` counted from the midnight of `origin`.
    pub fn day(timestamp: NaiveDateTime, origin: NaiveDate) -> Self {
        Self::Day((timestamp.date() - origin).num_days() + 1)
    }
}

impl fmt::Display for AlignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => f.write_str(&date_key(*date)),
            Self::Day(day) => write!(f, "Day {day}"),
        }
    }
}

impl Serialize for AlignKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A metric value at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedValue {
    /// When it was measured.
    pub timestamp: NaiveDateTime,
    /// Measured value.
    pub value: f64,
}

/// Values of both sides at one key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedPoint {
    /// Shared key.
    pub key: AlignKey,
    /// Mean of series A at the key.
    pub a: Option<f64>,
    /// Mean of series B at the key.
    pub b: Option<f64>,
}

/// Ascending union of the keys present in either series.
pub fn align(a: &[TimedValue], b: &[TimedValue], alignment: &Alignment) -> Vec<AlignKey> {
    a.iter()
        .map(|v| alignment.key_a(v.timestamp))
        .chain(b.iter().map(|v| alignment.key_b(v.timestamp)))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Per-key means of both series over the keys [`align`] returns.
pub fn align_values(a: &[TimedValue], b: &[TimedValue], alignment: &Alignment) -> Vec<AlignedPoint> {
    let side_a = group(a, |t| alignment.key_a(t));
    let side_b = group(b, |t| alignment.key_b(t));

    align(a, b, alignment)
        .into_iter()
        .map(|key| AlignedPoint {
            key,
            a: side_a.get(&key).and_then(|vals| mean(vals.iter().copied())),
            b: side_b.get(&key).and_then(|vals| mean(vals.iter().copied())),
        })
        .collect()
}

fn group(
    values: &[TimedValue],
    key_of: impl Fn(NaiveDateTime) -> AlignKey,
) -> BTreeMap<AlignKey, Vec<f64>> {
    let mut grouped: BTreeMap<AlignKey, Vec<f64>> = BTreeMap::new();
    for v in values {
        grouped.entry(key_of(v.timestamp)).or_default().push(v.value);
    }
    grouped
}

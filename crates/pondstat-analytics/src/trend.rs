//! Time-bucketed trends over a lookback window.
//!
//! Readings inside `[now - window, now]` are grouped by calendar day (or by
//! the Monday of their week), reduced to per-field min/avg/max, and summarised
//! with field means, quality indicators and a direction for the primary field.

use crate::quality::QualityIndicators;
use crate::settings::{AnalyticsSettings, BucketSize, TimeRange};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use pondstat_common::{date_key, fields, mean, MetricReading, ReadingKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Min, mean and max of one field within a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Smallest value.
    pub min: f64,
    /// Arithmetic mean.
    pub avg: f64,
    /// Largest value.
    pub max: f64,
}

impl FieldStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        let avg = mean(values.iter().copied())?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self { min, avg, max })
    }
}

/// One time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBucket {
    /// `YYYY-MM-DD` of the day, or of the Monday for weekly buckets.
    pub bucket_key: String,
    /// Statistics per field present in the bucket.
    pub fields: BTreeMap<String, FieldStats>,
    /// Readings that fell in the bucket.
    pub count: usize,
}

/// Overall movement of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    /// Mostly rising.
    Increasing,
    /// Mostly falling.
    Decreasing,
    /// Flat, or drifting without a clear majority.
    Stable,
    /// Rises and falls in roughly equal measure.
    Volatile,
}

/// Whole-window summary computed over the unbucketed readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    /// Readings inside the window.
    pub reading_count: usize,
    /// Mean per field; water-quality fields are always present.
    pub averages: BTreeMap<String, Option<f64>>,
    /// In-band percentages.
    pub indicators: QualityIndicators,
    /// Field the direction is computed over.
    pub primary_field: String,
    /// Direction of the primary field's bucket means, when at least three
    /// buckets carry it.
    pub direction: Option<TrendDirection>,
}

/// Result of [`compute_trend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    /// Requested range.
    pub time_range: TimeRange,
    /// Bucket width used.
    pub bucket_size: BucketSize,
    /// Inclusive window start.
    pub window_start: NaiveDateTime,
    /// Inclusive window end.
    pub window_end: NaiveDateTime,
    /// Buckets in ascending key order.
    pub buckets: Vec<TrendBucket>,
    /// Whole-window summary.
    pub summary: TrendSummary,
}

/// Field whose direction a trend over `kind` readings reports.
pub const fn primary_field(kind: ReadingKind) -> &'static str {
    match kind {
        ReadingKind::Feed => fields::QUANTITY,
        ReadingKind::WaterQuality => fields::PH,
        ReadingKind::Growth => fields::TOTAL_WEIGHT,
    }
}

/// Bucket a set of readings over the window `range` resolves to.
///
/// An empty window yields no buckets, `None` averages and zero indicators.
pub fn compute_trend(
    readings: &[MetricReading],
    kind: ReadingKind,
    range: TimeRange,
    now: NaiveDateTime,
    settings: &AnalyticsSettings,
) -> Trend {
    let window = settings.trend_windows.window(range);
    let window_start = now - Duration::days(i64::from(window.days));

    let in_window: Vec<MetricReading> = readings
        .iter()
        .filter(|r| r.timestamp >= window_start && r.timestamp <= now)
        .cloned()
        .collect();

    debug!(
        range = %range,
        total = readings.len(),
        in_window = in_window.len(),
        "Bucketing readings"
    );

    let mut grouped: BTreeMap<NaiveDate, Vec<&MetricReading>> = BTreeMap::new();
    for reading in &in_window {
        grouped
            .entry(bucket_start(reading.timestamp.date(), window.bucket))
            .or_default()
            .push(reading);
    }

    let buckets: Vec<TrendBucket> = grouped
        .into_iter()
        .map(|(day, members)| build_bucket(day, &members))
        .collect();

    let primary = primary_field(kind);
    let primary_means: Vec<f64> = buckets
        .iter()
        .filter_map(|b| b.fields.get(primary).map(|s| s.avg))
        .collect();

    let summary = TrendSummary {
        reading_count: in_window.len(),
        averages: field_averages(&in_window),
        indicators: QualityIndicators::compute(&in_window, &settings.quality),
        primary_field: primary.to_string(),
        direction: (primary_means.len() >= 3).then(|| trend_direction(&primary_means)),
    };

    Trend {
        time_range: range,
        bucket_size: window.bucket,
        window_start,
        window_end: now,
        buckets,
        summary,
    }
}

/// First day of the bucket containing `date`.
pub fn bucket_start(date: NaiveDate, size: BucketSize) -> NaiveDate {
    match size {
        BucketSize::Daily => date,
        BucketSize::Weekly => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
    }
}

fn build_bucket(day: NaiveDate, members: &[&MetricReading]) -> TrendBucket {
    let mut values: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for reading in members {
        for name in reading.fields.keys() {
            if let Some(value) = reading.field(name) {
                values.entry(name.as_str()).or_default().push(value);
            }
        }
    }

    TrendBucket {
        bucket_key: date_key(day),
        fields: values
            .into_iter()
            .filter_map(|(name, vals)| FieldStats::from_values(&vals).map(|s| (name.to_string(), s)))
            .collect(),
        count: members.len(),
    }
}

fn field_averages(readings: &[MetricReading]) -> BTreeMap<String, Option<f64>> {
    let names: BTreeSet<&str> = fields::WATER_QUALITY
        .into_iter()
        .chain(readings.iter().flat_map(|r| r.fields.keys().map(String::as_str)))
        .collect();

    names
        .into_iter()
        .map(|name| {
            let avg = mean(readings.iter().filter_map(|r| r.field(name)));
            (name.to_string(), avg)
        })
        .collect()
}

/// Classify a series by the share of rising and falling steps.
pub fn trend_direction(values: &[f64]) -> TrendDirection {
    if values.len() < 3 {
        return TrendDirection::Stable;
    }

    let mut increasing_count = 0_usize;
    let mut decreasing_count = 0_usize;

    for window in values.windows(2) {
        if window[1] > window[0] {
            increasing_count += 1;
        } else if window[1] < window[0] {
            decreasing_count += 1;
        }
    }

    let total_comparisons = (values.len() - 1) as f64;
    let increasing_ratio = increasing_count as f64 / total_comparisons;
    let decreasing_ratio = decreasing_count as f64 / total_comparisons;

    if increasing_ratio > 0.6 {
        TrendDirection::Increasing
    } else if decreasing_ratio > 0.6 {
        TrendDirection::Decreasing
    } else if increasing_count + decreasing_count > 0
        && (increasing_ratio - decreasing_ratio).abs() < 0.2
    {
        TrendDirection::Volatile
    } else {
        TrendDirection::Stable
    }
}

//! Pond-versus-pond metric comparison.

use crate::align::{align_values, AlignKey, AlignMode, Alignment, TimedValue};
use crate::metric::Metric;
use pondstat_common::{mean, DateRange, MetricReading, PondId, PondstatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What to compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRequest {
    /// Left-hand pond.
    pub pond_a: PondId,
    /// Right-hand pond.
    pub pond_b: PondId,
    /// Metric identifiers, see [`Metric`].
    pub metrics: Vec<String>,
    /// Timeline to align on.
    #[serde(default)]
    pub mode: AlignMode,
    /// Calendar window for absolute comparisons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl ComparisonRequest {
    /// Check the request and resolve its metric identifiers.
    ///
    /// Duplicate metric ids collapse to one entry, first occurrence wins.
    pub fn validate(&self) -> Result<Vec<Metric>> {
        if self.pond_a == self.pond_b {
            return Err(PondstatError::validation_field(
                format!("Cannot compare pond {} with itself", self.pond_a),
                "pondB",
            ));
        }
        if self.metrics.is_empty() {
            return Err(PondstatError::validation_field(
                "At least one metric is required",
                "metrics",
            ));
        }
        if let Some(range) = self.date_range {
            if range.start > range.end {
                return Err(PondstatError::validation_field(
                    format!("Date range starts after it ends ({} > {})", range.start, range.end),
                    "dateRange",
                ));
            }
        }

        let mut resolved: Vec<Metric> = Vec::with_capacity(self.metrics.len());
        for id in &self.metrics {
            let metric: Metric = id.parse()?;
            if !resolved.contains(&metric) {
                resolved.push(metric);
            }
        }
        Ok(resolved)
    }
}

/// Value of one pond at one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Date or day key.
    pub x_key: String,
    /// Mean value at the key.
    pub value: f64,
}

/// Both ponds at one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPoint {
    /// Date or day key.
    pub x_key: String,
    /// Pond A value, `None` when pond A has no reading at the key.
    pub pond_a_value: Option<f64>,
    /// Pond B value, `None` when pond B has no reading at the key.
    pub pond_b_value: Option<f64>,
    /// `a - b` when both sides are present.
    pub difference: Option<f64>,
}

/// Aggregate figures of one metric comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    /// Pond A readings carrying the metric.
    pub pond_a_data_points: usize,
    /// Pond B readings carrying the metric.
    pub pond_b_data_points: usize,
    /// Mean of the non-null differences.
    pub average_difference: Option<f64>,
}

/// Aligned comparison of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison {
    /// Pond A per-key values.
    pub pond_a_series: Vec<SeriesPoint>,
    /// Pond B per-key values.
    pub pond_b_series: Vec<SeriesPoint>,
    /// Both sides per key, over the union of keys.
    pub differences: Vec<ComparisonPoint>,
    /// Aggregate figures.
    pub summary: ComparisonSummary,
}

/// Comparison of two ponds across the requested metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Left-hand pond.
    pub pond_a: PondId,
    /// Right-hand pond.
    pub pond_b: PondId,
    /// Timeline used.
    pub mode: AlignMode,
    /// Results keyed by metric identifier.
    pub metrics: BTreeMap<String, MetricComparison>,
}

fn timed_values(metric: Metric, readings: &[MetricReading]) -> Vec<TimedValue> {
    readings
        .iter()
        .filter_map(|r| {
            metric.value(r).map(|value| TimedValue {
                timestamp: r.timestamp,
                value,
            })
        })
        .collect()
}

fn side_series(points: impl Iterator<Item = (AlignKey, Option<f64>)>) -> Vec<SeriesPoint> {
    points
        .filter_map(|(key, value)| {
            value.map(|value| SeriesPoint {
                x_key: key.to_string(),
                value,
            })
        })
        .collect()
}

/// Align two ponds' readings of `metric` and compute per-key differences.
pub fn compare_metric(
    metric: Metric,
    readings_a: &[MetricReading],
    readings_b: &[MetricReading],
    alignment: &Alignment,
) -> MetricComparison {
    let a = timed_values(metric, readings_a);
    let b = timed_values(metric, readings_b);
    let aligned = align_values(&a, &b, alignment);

    let differences: Vec<ComparisonPoint> = aligned
        .iter()
        .map(|p| ComparisonPoint {
            x_key: p.key.to_string(),
            pond_a_value: p.a,
            pond_b_value: p.b,
            difference: p.a.zip(p.b).map(|(a, b)| a - b),
        })
        .collect();

    let summary = ComparisonSummary {
        pond_a_data_points: a.len(),
        pond_b_data_points: b.len(),
        average_difference: mean(differences.iter().filter_map(|d| d.difference)),
    };

    MetricComparison {
        pond_a_series: side_series(aligned.iter().map(|p| (p.key, p.a))),
        pond_b_series: side_series(aligned.iter().map(|p| (p.key, p.b))),
        differences,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pondstat_common::test_utils::{at, date, farm_fixtures};

    fn request(a: &str, b: &str, metrics: &[&str]) -> ComparisonRequest {
        ComparisonRequest {
            pond_a: PondId::from(a),
            pond_b: PondId::from(b),
            metrics: metrics.iter().map(ToString::to_string).collect(),
            mode: AlignMode::Absolute,
            date_range: None,
        }
    }

    #[test]
    fn test_validation() {
        assert!(request("p1", "p1", &["pH"]).validate().unwrap_err().is_caller_error());
        assert!(request("p1", "p2", &[]).validate().is_err());
        assert!(request("p1", "p2", &["colour"]).validate().is_err());

        let metrics = request("p1", "p2", &["pH", "temperature", "ph"]).validate().unwrap();
        assert_eq!(metrics, vec![Metric::Ph, Metric::Temperature]);

        let mut inverted = request("p1", "p2", &["pH"]);
        inverted.date_range = Some(DateRange::new(date(2023, 6, 2), date(2023, 6, 1)));
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_null_side_has_no_difference() {
        let a = vec![
            farm_fixtures::ph_reading("p1", "s1", at(2023, 6, 1, 8), 7.8),
            farm_fixtures::ph_reading("p1", "s1", at(2023, 6, 2, 8), 7.9),
        ];
        let b = vec![farm_fixtures::ph_reading("p2", "s1", at(2023, 6, 2, 8), 8.1)];

        let result = compare_metric(Metric::Ph, &a, &b, &Alignment::Absolute);

        assert_eq!(result.differences.len(), 2);
        assert_eq!(result.differences[0].x_key, "2023-06-01");
        assert_eq!(result.differences[0].pond_b_value, None);
        assert_eq!(result.differences[0].difference, None);
        assert!((result.differences[1].difference.unwrap() + 0.2).abs() < 1e-9);
        assert_eq!(result.summary.pond_a_data_points, 2);
        assert_eq!(result.summary.pond_b_data_points, 1);
        assert_eq!(result.summary.average_difference, result.differences[1].difference);
        assert_eq!(result.pond_a_series.len(), 2);
        assert_eq!(result.pond_b_series.len(), 1);
    }

    #[test]
    fn test_no_overlap_means_no_average() {
        let a = vec![farm_fixtures::feed("p1", "s1", at(2023, 6, 1, 8), 10.0)];
        let b = vec![farm_fixtures::feed("p2", "s1", at(2023, 6, 3, 8), 12.0)];

        let result = compare_metric(Metric::FeedQuantity, &a, &b, &Alignment::Absolute);

        assert_eq!(result.summary.average_difference, None);
        assert!(result.differences.iter().all(|d| d.difference.is_none()));
    }

    #[test]
    fn test_request_json_shape() {
        let json = r#"{"pondA":"p1","pondB":"p2","metrics":["pH"],"mode":"relative"}"#;
        let parsed: ComparisonRequest = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.mode, AlignMode::Relative);
        assert_eq!(parsed.date_range, None);
    }
}

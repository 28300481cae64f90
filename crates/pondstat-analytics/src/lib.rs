//! # Pondstat Analytics
//!
//! Farm analytics and pond-comparison engine.
//!
//! Raw operational records (feed entries, water-quality readings, growth
//! samplings, harvests) go in; season KPIs, bucketed trends, aligned pond
//! comparisons, recommendations and compiled reports come out. Everything
//! below [`service`] is a pure function over an immutable record snapshot.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod align;
pub mod breakdown;
pub mod comparison;
pub mod export;
pub mod kpi;
pub mod metric;
pub mod quality;
pub mod recommendations;
pub mod report;
pub mod service;
pub mod settings;
pub mod snapshot;
pub mod store;
pub mod trend;

pub use align::{align, align_values, AlignKey, AlignMode, AlignedPoint, Alignment, TimedValue};
pub use comparison::{compare_metric, ComparisonRequest, ComparisonResult, MetricComparison};
pub use kpi::{compute_kpis, KpiSet};
pub use metric::Metric;
pub use quality::{summarize_water_quality, QualityIndicators, WaterQualitySummary};
pub use recommendations::{generate_recommendations, Priority, Recommendation};
pub use report::{compile_report, render_report, Report, ReportInputs};
pub use service::FarmAnalytics;
pub use settings::{AnalyticsSettings, TimeRange};
pub use snapshot::SnapshotStore;
pub use store::{RecordQuery, RecordStore, SeasonSnapshot};
pub use trend::{compute_trend, Trend, TrendBucket, TrendDirection, TrendSummary};

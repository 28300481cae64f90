//! Request-level entry points.
//!
//! [`FarmAnalytics`] validates a request, fetches one snapshot of the records
//! it needs through the [`RecordStore`], and hands the snapshot to the pure
//! engine functions. It holds no state besides its settings.

use crate::align::{AlignMode, Alignment};
use crate::comparison::{compare_metric, ComparisonRequest, ComparisonResult};
use crate::kpi::{compute_kpis, KpiSet};
use crate::metric::Metric;
use crate::report::{compile_report, render_report, Report, ReportInputs};
use crate::settings::{AnalyticsSettings, OriginPolicy, TimeRange};
use crate::store::{RecordQuery, RecordStore, SeasonSnapshot};
use crate::trend::{compute_trend, Trend};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use pondstat_common::{DateRange, MetricReading, Pond, PondId, PondstatError, ReadingKind, Result, SeasonId};
use pondstat_config::ReportFormat;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Analytics service over a record store.
#[derive(Debug, Clone)]
pub struct FarmAnalytics<S> {
    store: S,
    settings: AnalyticsSettings,
}

impl<S: RecordStore> FarmAnalytics<S> {
    /// Create a service.
    pub const fn new(store: S, settings: AnalyticsSettings) -> Self {
        Self { store, settings }
    }

    /// Settings in effect.
    pub const fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    /// Season KPIs.
    #[instrument(skip_all, fields(season = %season_id))]
    pub async fn farm_kpis(&self, season_id: &SeasonId) -> Result<KpiSet> {
        require_season(season_id)?;
        let snapshot = SeasonSnapshot::fetch(&self.store, season_id).await?;
        let kpis = compute_kpis(season_id, &snapshot);

        info!(
            total_ponds = kpis.total_ponds,
            fcr = ?kpis.average_fcr,
            "Computed season KPIs"
        );
        Ok(kpis)
    }

    /// Bucketed trend of one log, optionally for a single pond.
    #[instrument(skip_all, fields(season = %season_id, kind = ?kind, range = %range))]
    pub async fn trend(
        &self,
        season_id: &SeasonId,
        pond_id: Option<&PondId>,
        kind: ReadingKind,
        range: TimeRange,
        now: NaiveDateTime,
    ) -> Result<Trend> {
        require_season(season_id)?;
        let window = self.settings.trend_windows.window(range);
        let start = (now - Duration::days(i64::from(window.days))).date();
        let mut query =
            RecordQuery::season(season_id.clone()).within(Some(DateRange::new(start, now.date())));
        if let Some(pond_id) = pond_id {
            query = query.for_pond(pond_id.clone());
        }

        let readings = self.store.fetch_readings(kind, &query).await?;
        let trend = compute_trend(&readings, kind, range, now, &self.settings);

        debug!(
            buckets = trend.buckets.len(),
            readings = trend.summary.reading_count,
            "Computed trend"
        );
        Ok(trend)
    }

    /// Compare two ponds across the requested metrics.
    ///
    /// Absolute comparisons without a date range look back the configured
    /// number of days from `now`.
    #[instrument(skip_all, fields(pond_a = %request.pond_a, pond_b = %request.pond_b, mode = %request.mode))]
    pub async fn compare(
        &self,
        request: &ComparisonRequest,
        now: NaiveDateTime,
    ) -> Result<ComparisonResult> {
        let metrics = request.validate()?;
        let pond_a = self.store.fetch_pond(&request.pond_a).await?;
        let pond_b = self.store.fetch_pond(&request.pond_b).await?;

        let (alignment, range) = match request.mode {
            AlignMode::Absolute => {
                let range = request.date_range.unwrap_or_else(|| self.default_range(now));
                (Alignment::Absolute, Some(range))
            }
            AlignMode::Relative => {
                let alignment = Alignment::Relative {
                    origin_a: self.resolve_origin(&pond_a).await?,
                    origin_b: self.resolve_origin(&pond_b).await?,
                };
                (alignment, None)
            }
        };

        let readings_a = self.fetch_for_metrics(&pond_a, &metrics, range).await?;
        let readings_b = self.fetch_for_metrics(&pond_b, &metrics, range).await?;

        let results: BTreeMap<_, _> = metrics
            .iter()
            .map(|metric| {
                let a = readings_for(&readings_a, metric.kind());
                let b = readings_for(&readings_b, metric.kind());
                (metric.id().to_string(), compare_metric(*metric, a, b, &alignment))
            })
            .collect();

        info!(metrics = metrics.len(), "Compared ponds");
        Ok(ComparisonResult {
            pond_a: pond_a.id,
            pond_b: pond_b.id,
            mode: request.mode,
            metrics: results,
        })
    }

    /// Compile the season report.
    #[instrument(skip_all, fields(season = %season_id))]
    pub async fn report(&self, season_id: &SeasonId, generated_at: DateTime<Utc>) -> Result<Report> {
        require_season(season_id)?;
        let snapshot = SeasonSnapshot::fetch(&self.store, season_id).await?;
        let kpis = compute_kpis(season_id, &snapshot);
        let inputs = ReportInputs::from_snapshot(&snapshot, &kpis, &self.settings);
        Ok(compile_report(inputs, generated_at, &self.settings))
    }

    /// Compile the season report and serialize it.
    pub async fn export_report(
        &self,
        season_id: &SeasonId,
        format: ReportFormat,
        generated_at: DateTime<Utc>,
    ) -> Result<String> {
        let report = self.report(season_id, generated_at).await?;
        render_report(&report, format, self.settings.decimal_places)
    }

    fn default_range(&self, now: NaiveDateTime) -> DateRange {
        let start = now - Duration::days(i64::from(self.settings.default_lookback_days));
        DateRange::new(start.date(), now.date())
    }

    async fn resolve_origin(&self, pond: &Pond) -> Result<NaiveDate> {
        match self.settings.origin_policy {
            OriginPolicy::SeasonStart => {
                Ok(self.store.fetch_season(&pond.season_id).await?.start_date)
            }
            OriginPolicy::Stocking => {
                let query = RecordQuery::season(pond.season_id.clone()).for_pond(pond.id.clone());
                let stockings = self.store.fetch_stocking_events(&query).await?;
                if stockings.len() > 1 {
                    warn!(pond = %pond.id, count = stockings.len(), "Several stocking events, using the earliest");
                }
                stockings
                    .iter()
                    .map(|s| s.stocking_date)
                    .min()
                    .ok_or_else(|| {
                        PondstatError::validation_field(
                            format!("No stocking event recorded for pond {}", pond.id),
                            "originPolicy",
                        )
                    })
            }
        }
    }

    async fn fetch_for_metrics(
        &self,
        pond: &Pond,
        metrics: &[Metric],
        range: Option<DateRange>,
    ) -> Result<Vec<(ReadingKind, Vec<MetricReading>)>> {
        let query = RecordQuery::season(pond.season_id.clone())
            .for_pond(pond.id.clone())
            .within(range);

        let mut fetched: Vec<(ReadingKind, Vec<MetricReading>)> = Vec::new();
        for metric in metrics {
            let kind = metric.kind();
            if fetched.iter().any(|(k, _)| *k == kind) {
                continue;
            }
            let readings = self.store.fetch_readings(kind, &query).await?;
            debug!(pond = %pond.id, kind = ?kind, count = readings.len(), "Fetched readings");
            fetched.push((kind, readings));
        }
        Ok(fetched)
    }
}

fn require_season(season_id: &SeasonId) -> Result<()> {
    if season_id.0.trim().is_empty() {
        return Err(PondstatError::validation_field("Season id is required", "seasonId"));
    }
    Ok(())
}

fn readings_for(fetched: &[(ReadingKind, Vec<MetricReading>)], kind: ReadingKind) -> &[MetricReading] {
    fetched
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, readings)| readings.as_slice())
        .unwrap_or_default()
}

//! Report compilation.

use crate::breakdown::{
    event_breakdown, feed_breakdown, growth_summary, pond_details, EventBreakdown, FeedBreakdown,
    GrowthSummary, PondDetail,
};
use crate::export::report_to_csv;
use crate::kpi::KpiSet;
use crate::quality::{summarize_water_quality, WaterQualitySummary};
use crate::recommendations::{generate_recommendations, Priority, Recommendation};
use crate::settings::AnalyticsSettings;
use crate::store::SeasonSnapshot;
use chrono::{DateTime, NaiveDate, Utc};
use pondstat_common::{round_to, Pond, Result, Season, SeasonId, SeasonStatus};
use pondstat_config::ReportFormat;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Season identity as printed in the report header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonInfo {
    /// Season id.
    pub id: SeasonId,
    /// Display name.
    pub name: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Lifecycle state.
    pub status: SeasonStatus,
}

impl From<&Season> for SeasonInfo {
    fn from(season: &Season) -> Self {
        Self {
            id: season.id.clone(),
            name: season.name.clone(),
            start_date: season.start_date,
            end_date: season.end_date,
            status: season.status,
        }
    }
}

/// Report header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// When the report was compiled.
    pub generated_at: DateTime<Utc>,
    /// Season covered.
    pub season: SeasonInfo,
}

/// Headline numbers, ratios rounded for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    /// Registered ponds.
    pub total_ponds: usize,
    /// Ponds in culture.
    pub active_ponds: usize,
    /// Summed feed quantity.
    pub total_feed_consumed: f64,
    /// Feed conversion ratio.
    pub average_fcr: Option<f64>,
    /// Weighted mean body weight.
    pub avg_shrimp_weight: Option<f64>,
    /// Share of active ponds.
    pub pond_utilization: Option<f64>,
    /// Sampled count over capacity.
    pub survival_rate: Option<f64>,
    /// Summed harvest weight.
    pub total_harvest_weight: f64,
    /// Recommendations raised.
    pub recommendation_count: usize,
    /// High-priority recommendations raised.
    pub high_priority_count: usize,
}

/// Analysis sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAnalysis {
    /// Pond performance table.
    pub pond_performance: Vec<PondDetail>,
    /// Feed section.
    pub feed: FeedBreakdown,
    /// Water-quality section.
    pub water_quality: WaterQualitySummary,
    /// Growth section.
    pub growth: GrowthSummary,
    /// Harvest events section.
    pub events: EventBreakdown,
}

/// Raw listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAppendix {
    /// Every pond of the season as stored.
    pub ponds: Vec<Pond>,
}

/// Full season report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Header.
    pub metadata: ReportMetadata,
    /// Headline numbers.
    pub executive_summary: ExecutiveSummary,
    /// Analysis sections.
    pub analysis: ReportAnalysis,
    /// Fired recommendation rules.
    pub recommendations: Vec<Recommendation>,
    /// Raw listings.
    pub appendix: ReportAppendix,
}

/// Everything a report is compiled from.
#[derive(Debug, Clone)]
pub struct ReportInputs<'a> {
    /// Season covered.
    pub season: &'a Season,
    /// KPIs of the season.
    pub kpis: &'a KpiSet,
    /// Ponds of the season.
    pub ponds: &'a [Pond],
    /// Pond performance rows.
    pub pond_details: Vec<PondDetail>,
    /// Feed section.
    pub feed: FeedBreakdown,
    /// Water-quality section.
    pub water_quality: WaterQualitySummary,
    /// Growth section.
    pub growth: GrowthSummary,
    /// Harvest events section.
    pub events: EventBreakdown,
}

impl<'a> ReportInputs<'a> {
    /// Derive every section from a season snapshot.
    pub fn from_snapshot(
        snapshot: &'a SeasonSnapshot,
        kpis: &'a KpiSet,
        settings: &AnalyticsSettings,
    ) -> Self {
        Self {
            season: &snapshot.season,
            kpis,
            ponds: &snapshot.ponds,
            pond_details: pond_details(snapshot),
            feed: feed_breakdown(snapshot),
            water_quality: summarize_water_quality(&snapshot.water_quality, &settings.quality),
            growth: growth_summary(snapshot),
            events: event_breakdown(snapshot),
        }
    }
}

/// Assemble the report, evaluating the recommendation rules on the way.
pub fn compile_report(
    inputs: ReportInputs<'_>,
    generated_at: DateTime<Utc>,
    settings: &AnalyticsSettings,
) -> Report {
    let kpis = inputs.kpis;
    let recommendations = generate_recommendations(
        kpis,
        Some(&inputs.water_quality),
        &settings.recommendations,
    );
    let places = settings.decimal_places;
    let rounded = |v: Option<f64>| v.map(|v| round_to(v, places));

    debug!(
        season = %kpis.season_id,
        recommendations = recommendations.len(),
        "Compiled report"
    );

    Report {
        metadata: ReportMetadata {
            generated_at,
            season: SeasonInfo::from(inputs.season),
        },
        executive_summary: ExecutiveSummary {
            total_ponds: kpis.total_ponds,
            active_ponds: kpis.active_ponds,
            total_feed_consumed: round_to(kpis.total_feed_consumed, places),
            average_fcr: rounded(kpis.average_fcr),
            avg_shrimp_weight: rounded(kpis.avg_shrimp_weight),
            pond_utilization: rounded(kpis.pond_utilization),
            survival_rate: rounded(kpis.survival_rate),
            total_harvest_weight: round_to(kpis.total_harvest_weight, places),
            recommendation_count: recommendations.len(),
            high_priority_count: recommendations
                .iter()
                .filter(|r| r.priority == Priority::High)
                .count(),
        },
        analysis: ReportAnalysis {
            pond_performance: inputs.pond_details,
            feed: inputs.feed,
            water_quality: inputs.water_quality,
            growth: inputs.growth,
            events: inputs.events,
        },
        recommendations,
        appendix: ReportAppendix {
            ponds: inputs.ponds.to_vec(),
        },
    }
}

/// Serialize a report in the requested format.
pub fn render_report(report: &Report, format: ReportFormat, decimal_places: u32) -> Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Csv => Ok(report_to_csv(report, decimal_places)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::compute_kpis;
    use chrono::TimeZone;
    use pondstat_common::test_utils::{at, date, farm_fixtures};
    use pondstat_common::PondStatus;

    fn snapshot() -> SeasonSnapshot {
        SeasonSnapshot {
            season: farm_fixtures::season("s1", date(2023, 5, 1)),
            ponds: vec![
                farm_fixtures::pond("p1", "s1", PondStatus::Active, 1000.0),
                farm_fixtures::pond("p2", "s1", PondStatus::Inactive, 1000.0),
                farm_fixtures::pond("p3", "s1", PondStatus::Inactive, 1000.0),
            ],
            feed: vec![farm_fixtures::feed("p1", "s1", at(2023, 6, 1, 8), 100.0)],
            water_quality: vec![farm_fixtures::water("p1", "s1", at(2023, 6, 1, 8), 9.0, 6.0, 28.0, 15.0)],
            growth: vec![farm_fixtures::growth("p1", "s1", at(2023, 6, 1, 8), 30.0, 3.0)],
            harvests: Vec::new(),
        }
    }

    #[test]
    fn test_compile_report() {
        let snapshot = snapshot();
        let settings = AnalyticsSettings::default();
        let kpis = compute_kpis(&snapshot.season.id, &snapshot);
        let generated_at = Utc.with_ymd_and_hms(2023, 6, 2, 0, 0, 0).unwrap();

        let report = compile_report(
            ReportInputs::from_snapshot(&snapshot, &kpis, &settings),
            generated_at,
            &settings,
        );

        assert_eq!(report.metadata.season.name, "Season s1");
        assert_eq!(report.executive_summary.average_fcr, Some(3.33));
        assert_eq!(report.executive_summary.pond_utilization, Some(33.33));
        // pH 9.0 and FCR 3.33 and utilization 33 %
        assert_eq!(report.executive_summary.recommendation_count, 3);
        assert_eq!(report.executive_summary.high_priority_count, 1);
        assert_eq!(report.analysis.pond_performance.len(), 3);
        assert_eq!(report.appendix.ponds.len(), 3);
        // full precision is kept on the KPI set
        assert!((kpis.average_fcr.unwrap() - 100.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_render_json() {
        let snapshot = snapshot();
        let settings = AnalyticsSettings::default();
        let kpis = compute_kpis(&snapshot.season.id, &snapshot);
        let report = compile_report(
            ReportInputs::from_snapshot(&snapshot, &kpis, &settings),
            Utc.with_ymd_and_hms(2023, 6, 2, 0, 0, 0).unwrap(),
            &settings,
        );

        let json = render_report(&report, ReportFormat::Json, 2).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["executiveSummary"]["totalPonds"], 3);
        assert_eq!(value["metadata"]["season"]["id"], "s1");
        assert!(value["analysis"]["waterQuality"]["indicators"].is_object());
    }
}

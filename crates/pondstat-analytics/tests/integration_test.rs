//! End-to-end scenarios for the analytics service over an in-memory snapshot.
//!
//! These tests cover:
//! - Season KPIs for empty and populated seasons
//! - Absolute and relative pond comparisons
//! - Recommendation firing through the full report path
//! - Request validation errors

use chrono::{TimeZone, Utc};
use pondstat_analytics::{
    AlignMode, AnalyticsSettings, ComparisonRequest, FarmAnalytics, Priority, SnapshotStore,
    TimeRange,
};
use pondstat_common::test_utils::{assert_approx_eq, at, date, farm_fixtures, init_test_logging};
use pondstat_common::{PondId, PondStatus, PondstatError, ReadingKind, SeasonId};
use pondstat_config::ReportFormat;

fn analytics(store: SnapshotStore) -> FarmAnalytics<SnapshotStore> {
    init_test_logging();
    FarmAnalytics::new(store, AnalyticsSettings::default())
}

fn comparison(a: &str, b: &str, mode: AlignMode) -> ComparisonRequest {
    ComparisonRequest {
        pond_a: PondId::from(a),
        pond_b: PondId::from(b),
        metrics: vec!["pH".to_string()],
        mode,
        date_range: None,
    }
}

// =============================================================================
// KPIs
// =============================================================================

#[tokio::test]
async fn test_zero_pond_season_degrades_to_nulls() {
    let store = SnapshotStore::new().with_season(farm_fixtures::season("s1", date(2023, 5, 1)));
    let service = analytics(store);

    let kpis = service.farm_kpis(&SeasonId::from("s1")).await.unwrap();

    assert_eq!(kpis.total_ponds, 0);
    assert_eq!(kpis.active_ponds, 0);
    assert_eq!(kpis.average_fcr, None);
    assert_eq!(kpis.survival_rate, None);
    assert_eq!(kpis.pond_utilization, None);
    assert_eq!(kpis.avg_daily_feed, None);

    let json = serde_json::to_value(&kpis).unwrap();
    assert_eq!(json["totalPonds"], 0);
    assert!(json["averageFcr"].is_null());
    assert!(json["survivalRate"].is_null());
}

#[tokio::test]
async fn test_fcr_from_feed_and_biomass() {
    let store = SnapshotStore::new()
        .with_season(farm_fixtures::season("s1", date(2023, 5, 1)))
        .with_ponds([farm_fixtures::pond("p1", "s1", PondStatus::Active, 1000.0)])
        .with_readings([
            farm_fixtures::feed("p1", "s1", at(2023, 6, 1, 8), 10.0),
            farm_fixtures::feed("p1", "s1", at(2023, 6, 2, 8), 20.0),
            farm_fixtures::feed("p1", "s1", at(2023, 6, 3, 8), 30.0),
            farm_fixtures::growth("p1", "s1", at(2023, 6, 3, 9), 20.0, 4.0),
        ]);
    let service = analytics(store);

    let kpis = service.farm_kpis(&SeasonId::from("s1")).await.unwrap();

    assert_eq!(kpis.total_feed_consumed, 60.0);
    assert_eq!(kpis.average_fcr, Some(3.0));
    assert_eq!(kpis.avg_daily_feed, Some(20.0));

    let report = service
        .report(&SeasonId::from("s1"), Utc.with_ymd_and_hms(2023, 6, 4, 0, 0, 0).unwrap())
        .await
        .unwrap();
    assert_eq!(report.executive_summary.average_fcr, Some(3.0));
}

#[tokio::test]
async fn test_unknown_season_is_not_found() {
    let service = analytics(SnapshotStore::new());

    let err = service.farm_kpis(&SeasonId::from("missing")).await.unwrap_err();

    assert!(matches!(err, PondstatError::NotFound { .. }));
    assert_eq!(err.to_string(), "Season not found: missing");
}

// =============================================================================
// Comparisons
// =============================================================================

#[tokio::test]
async fn test_absolute_comparison_keeps_one_sided_dates() {
    let store = SnapshotStore::new()
        .with_season(farm_fixtures::season("s1", date(2023, 5, 1)))
        .with_ponds([
            farm_fixtures::pond("a", "s1", PondStatus::Active, 1000.0),
            farm_fixtures::pond("b", "s1", PondStatus::Active, 1000.0),
        ])
        .with_readings([
            farm_fixtures::ph_reading("a", "s1", at(2023, 6, 1, 8), 7.8),
            farm_fixtures::ph_reading("a", "s1", at(2023, 6, 2, 8), 8.0),
            farm_fixtures::ph_reading("b", "s1", at(2023, 6, 2, 10), 8.2),
        ]);
    let service = analytics(store);

    let result = service
        .compare(&comparison("a", "b", AlignMode::Absolute), at(2023, 6, 10, 0))
        .await
        .unwrap();

    let ph = &result.metrics["pH"];
    let keys: Vec<&str> = ph.differences.iter().map(|d| d.x_key.as_str()).collect();
    assert_eq!(keys, vec!["2023-06-01", "2023-06-02"]);
    assert_eq!(ph.differences[0].pond_a_value, Some(7.8));
    assert_eq!(ph.differences[0].pond_b_value, None);
    assert_eq!(ph.differences[0].difference, None);
    assert_approx_eq(ph.differences[1].difference.unwrap(), -0.2, 1e-9);
    assert_eq!(ph.summary.pond_a_data_points, 2);
    assert_eq!(ph.summary.pond_b_data_points, 1);
}

#[tokio::test]
async fn test_relative_comparison_aligns_on_cultivation_day() {
    let store = SnapshotStore::new()
        .with_season(farm_fixtures::season("early", date(2023, 1, 1)))
        .with_season(farm_fixtures::season("late", date(2023, 3, 1)))
        .with_ponds([
            farm_fixtures::pond("a", "early", PondStatus::Active, 1000.0),
            farm_fixtures::pond("b", "late", PondStatus::Active, 1000.0),
        ])
        .with_readings([
            farm_fixtures::ph_reading("a", "early", at(2023, 1, 5, 8), 7.9),
            farm_fixtures::ph_reading("b", "late", at(2023, 3, 5, 8), 8.3),
        ]);
    let service = analytics(store);

    let result = service
        .compare(&comparison("a", "b", AlignMode::Relative), at(2023, 6, 1, 0))
        .await
        .unwrap();

    let ph = &result.metrics["pH"];
    assert_eq!(ph.differences.len(), 1);
    assert_eq!(ph.differences[0].x_key, "Day 5");
    assert_eq!(ph.differences[0].pond_a_value, Some(7.9));
    assert_eq!(ph.differences[0].pond_b_value, Some(8.3));
    assert_eq!(result.mode, AlignMode::Relative);
}

#[tokio::test]
async fn test_comparison_validation_errors() {
    let store = SnapshotStore::new()
        .with_season(farm_fixtures::season("s1", date(2023, 5, 1)))
        .with_ponds([farm_fixtures::pond("a", "s1", PondStatus::Active, 1000.0)]);
    let service = analytics(store);
    let now = at(2023, 6, 1, 0);

    let same = service
        .compare(&comparison("a", "a", AlignMode::Absolute), now)
        .await
        .unwrap_err();
    assert!(matches!(same, PondstatError::Validation { .. }));

    let mut no_metrics = comparison("a", "b", AlignMode::Absolute);
    no_metrics.metrics.clear();
    let err = service.compare(&no_metrics, now).await.unwrap_err();
    assert!(matches!(err, PondstatError::Validation { .. }));
}

// =============================================================================
// Recommendations and reports
// =============================================================================

#[tokio::test]
async fn test_high_ph_raises_exactly_one_water_quality_recommendation() {
    let store = SnapshotStore::new()
        .with_season(farm_fixtures::season("s1", date(2023, 5, 1)))
        .with_ponds([farm_fixtures::pond("p1", "s1", PondStatus::Active, 1000.0)])
        .with_readings([
            farm_fixtures::water("p1", "s1", at(2023, 6, 1, 8), 8.8, 6.0, 28.0, 15.0),
            farm_fixtures::water("p1", "s1", at(2023, 6, 2, 8), 9.2, 6.0, 28.0, 15.0),
        ]);
    let service = analytics(store);

    let report = service
        .report(&SeasonId::from("s1"), Utc.with_ymd_and_hms(2023, 6, 3, 0, 0, 0).unwrap())
        .await
        .unwrap();

    assert_eq!(report.recommendations.len(), 1);
    let rec = &report.recommendations[0];
    assert_eq!(rec.priority, Priority::High);
    assert_eq!(rec.category, "Water Quality");
    assert_approx_eq(rec.current_value, 9.0, 1e-9);
    assert_eq!(report.executive_summary.high_priority_count, 1);
}

#[tokio::test]
async fn test_csv_export_through_service() {
    let store = SnapshotStore::new()
        .with_season(farm_fixtures::season("s1", date(2023, 5, 1)))
        .with_ponds([farm_fixtures::pond("p1", "s1", PondStatus::Inactive, 1000.0)]);
    let service = analytics(store);

    let csv = service
        .export_report(
            &SeasonId::from("s1"),
            ReportFormat::Csv,
            Utc.with_ymd_and_hms(2023, 6, 3, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    assert!(csv.starts_with("Farm Analytics Report\n"));
    assert!(csv.contains("Average FCR,N/A\n"));
    assert!(csv.contains("Pond Utilization (%),0.00\n"));
    assert!(csv.contains("Pond Management,Low,Low pond utilization"));
}

// =============================================================================
// Trends
// =============================================================================

#[tokio::test]
async fn test_feed_trend_over_month() {
    let store = SnapshotStore::new()
        .with_season(farm_fixtures::season("s1", date(2023, 5, 1)))
        .with_ponds([farm_fixtures::pond("p1", "s1", PondStatus::Active, 1000.0)])
        .with_readings([
            farm_fixtures::feed("p1", "s1", at(2023, 5, 2, 8), 5.0),
            farm_fixtures::feed("p1", "s1", at(2023, 6, 1, 8), 10.0),
            farm_fixtures::feed("p1", "s1", at(2023, 6, 1, 16), 12.0),
            farm_fixtures::feed("p1", "s1", at(2023, 6, 2, 8), 14.0),
        ]);
    let service = analytics(store);

    let trend = service
        .trend(
            &SeasonId::from("s1"),
            None,
            ReadingKind::Feed,
            TimeRange::Month,
            at(2023, 6, 5, 0),
        )
        .await
        .unwrap();

    assert_eq!(trend.buckets.len(), 2);
    assert_eq!(trend.buckets[0].fields["quantity"].max, 12.0);
    assert_eq!(trend.summary.reading_count, 3);
    assert_eq!(trend.summary.averages["quantity"], Some(12.0));
    assert_eq!(trend.summary.averages["pH"], None);
}

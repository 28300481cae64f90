//! Property tests for the pure engine functions.

use pondstat_analytics::kpi::compute_kpis;
use pondstat_analytics::trend::compute_trend;
use pondstat_analytics::{
    align, compare_metric, AlignKey, Alignment, AnalyticsSettings, Metric, SeasonSnapshot,
    TimeRange, TimedValue,
};
use pondstat_common::test_utils::{at, date, farm_fixtures, strategies};
use pondstat_common::{MetricReading, PondStatus, ReadingKind, SeasonId};
use chrono::NaiveDate;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn snapshot(feed: &[f64], biomass: &[f64]) -> SeasonSnapshot {
    SeasonSnapshot {
        season: farm_fixtures::season("s1", date(2023, 1, 1)),
        ponds: vec![farm_fixtures::pond("p1", "s1", PondStatus::Active, 1000.0)],
        feed: feed
            .iter()
            .map(|q| farm_fixtures::feed("p1", "s1", at(2023, 2, 1, 8), *q))
            .collect(),
        water_quality: Vec::new(),
        growth: biomass
            .iter()
            .map(|w| farm_fixtures::growth("p1", "s1", at(2023, 2, 1, 9), *w, 10.0))
            .collect(),
        harvests: Vec::new(),
    }
}

fn timed(readings: &[MetricReading]) -> Vec<TimedValue> {
    readings
        .iter()
        .filter_map(|r| {
            Metric::Ph.value(r).map(|value| TimedValue {
                timestamp: r.timestamp,
                value,
            })
        })
        .collect()
}

fn alignments() -> impl Strategy<Value = Alignment> {
    prop_oneof![
        Just(Alignment::Absolute),
        (0_i64..60, 0_i64..60).prop_map(|(a, b)| Alignment::Relative {
            origin_a: date(2023, 1, 1) + chrono::Duration::days(a),
            origin_b: date(2023, 1, 1) + chrono::Duration::days(b),
        }),
    ]
}

fn own_key(origin: Option<NaiveDate>, r: &MetricReading) -> AlignKey {
    match origin {
        None => AlignKey::Date(r.timestamp.date()),
        Some(origin) => AlignKey::day(r.timestamp, origin),
    }
}

proptest! {
    #[test]
    fn kpis_are_idempotent((feed, biomass) in strategies::feed_and_biomass()) {
        let records = snapshot(&feed, &biomass);
        let season = SeasonId::from("s1");

        let first = serde_json::to_string(&compute_kpis(&season, &records)).unwrap();
        let second = serde_json::to_string(&compute_kpis(&season, &records)).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn fcr_matches_its_definition((feed, biomass) in strategies::feed_and_biomass()) {
        let kpis = compute_kpis(&SeasonId::from("s1"), &snapshot(&feed, &biomass));
        let total_feed: f64 = feed.iter().sum();
        let total_biomass: f64 = biomass.iter().sum();

        if total_biomass > 0.0 {
            let fcr = kpis.average_fcr.unwrap();
            prop_assert!((fcr - total_feed / total_biomass).abs() <= 1e-9 * fcr.max(1.0));
            prop_assert!(fcr >= 0.0);
        } else {
            prop_assert_eq!(kpis.average_fcr, None);
        }
    }

    #[test]
    fn trends_are_idempotent(readings in strategies::ph_series("p1", 40)) {
        let settings = AnalyticsSettings::default();
        let now = at(2023, 3, 15, 12);

        let first = compute_trend(&readings, ReadingKind::WaterQuality, TimeRange::Month, now, &settings);
        let second = compute_trend(&readings, ReadingKind::WaterQuality, TimeRange::Month, now, &settings);

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn every_windowed_reading_lands_in_one_bucket(readings in strategies::ph_series("p1", 60)) {
        let settings = AnalyticsSettings::default();
        let now = at(2023, 3, 15, 12);
        let trend = compute_trend(&readings, ReadingKind::WaterQuality, TimeRange::Quarter, now, &settings);

        let in_window = readings
            .iter()
            .filter(|r| r.timestamp >= trend.window_start && r.timestamp <= now)
            .count();
        let bucketed: usize = trend.buckets.iter().map(|b| b.count).sum();
        prop_assert_eq!(bucketed, in_window);

        let keys: BTreeSet<&str> = trend.buckets.iter().map(|b| b.bucket_key.as_str()).collect();
        prop_assert_eq!(keys.len(), trend.buckets.len());
        for r in readings.iter().filter(|r| r.timestamp < trend.window_start || r.timestamp > now) {
            let key = pondstat_common::date_key(r.timestamp.date());
            let same_day_in_window = readings.iter().any(|o| {
                o.timestamp.date() == r.timestamp.date()
                    && o.timestamp >= trend.window_start
                    && o.timestamp <= now
            });
            prop_assert!(same_day_in_window || !keys.contains(key.as_str()));
        }
    }

    #[test]
    fn alignment_is_the_union_of_own_keys(
        a in strategies::ph_series("a", 30),
        b in strategies::ph_series("b", 30),
        alignment in alignments(),
    ) {
        let keys = align(&timed(&a), &timed(&b), &alignment);

        let (origin_a, origin_b) = match alignment {
            Alignment::Absolute => (None, None),
            Alignment::Relative { origin_a, origin_b } => (Some(origin_a), Some(origin_b)),
        };
        let expected: BTreeSet<AlignKey> = a
            .iter()
            .map(|r| own_key(origin_a, r))
            .chain(b.iter().map(|r| own_key(origin_b, r)))
            .collect();

        prop_assert_eq!(keys.iter().copied().collect::<BTreeSet<_>>(), expected);
        prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn differences_are_antisymmetric(
        a in strategies::ph_series("a", 30),
        b in strategies::ph_series("b", 30),
    ) {
        let ab = compare_metric(Metric::Ph, &a, &b, &Alignment::Absolute);
        let ba = compare_metric(Metric::Ph, &b, &a, &Alignment::Absolute);

        prop_assert_eq!(ab.differences.len(), ba.differences.len());
        for (x, y) in ab.differences.iter().zip(&ba.differences) {
            prop_assert_eq!(&x.x_key, &y.x_key);
            prop_assert_eq!(x.difference, y.difference.map(|d| -d));
        }
    }
}

//! Tests for the record types in pondstat-common.
//!
//! This test suite covers:
//! - Newtype identifiers (Display, ordering, transparent serialization)
//! - Record serialization in the camelCase snapshot shape
//! - Normalization of unknown pond statuses

use chrono::{NaiveDate, NaiveDateTime};
use pondstat_common::types::*;
use std::collections::HashMap;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, 0, 0).unwrap()
}

fn reading(kind: ReadingKind, timestamp: NaiveDateTime) -> MetricReading {
    MetricReading::new(kind, PondId::from("p1"), SeasonId::from("s1"), timestamp)
}

mod identifier_tests {
    use super::*;

    #[test]
    fn test_pond_id_traits() {
        let pond_id = PondId::from("pond-7");

        assert_eq!(format!("{pond_id}"), "pond-7");
        assert_eq!(format!("{pond_id:?}"), "PondId(\"pond-7\")");

        let mut map = HashMap::new();
        map.insert(pond_id.clone(), 1);
        assert_eq!(map.get(&pond_id), Some(&1));

        assert!(PondId::from("a") < PondId::from("b"));
    }

    #[test]
    fn test_season_id_is_transparent() {
        let season_id = SeasonId::from("2023-dry");
        let serialized = serde_json::to_string(&season_id).unwrap();
        assert_eq!(serialized, "\"2023-dry\"");

        let deserialized: SeasonId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, season_id);
    }
}

mod record_tests {
    use super::*;

    #[test]
    fn test_reading_serializes_in_snapshot_shape() {
        let reading = reading(ReadingKind::Feed, at(2023, 6, 1, 8))
            .with_field(fields::QUANTITY, 12.5)
            .with_category("starter");
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["pondId"], "p1");
        assert_eq!(json["seasonId"], "s1");
        assert_eq!(json["timestamp"], "2023-06-01T08:00:00");
        assert_eq!(json["kind"], "Feed");
        assert_eq!(json["fields"]["quantity"], 12.5);
        assert_eq!(json["category"], "starter");
    }

    #[test]
    fn test_reading_field_guards_non_finite_values() {
        let reading = reading(ReadingKind::WaterQuality, at(2023, 6, 1, 8)).with_field(fields::PH, f64::NAN);
        assert_eq!(reading.field(fields::PH), None);
        assert_eq!(reading.field(fields::TEMPERATURE), None);
    }

    #[test]
    fn test_unknown_pond_status_is_inactive() {
        let json = r#"{
            "id": "p9",
            "seasonId": "s1",
            "name": "North 9",
            "size": 800.0,
            "capacity": 50000.0,
            "status": "Maintenance"
        }"#;
        let pond: Pond = serde_json::from_str(json).unwrap();
        assert_eq!(pond.status, PondStatus::Inactive);

        let active: PondStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(active, PondStatus::Active);
        assert_eq!(serde_json::to_string(&active).unwrap(), "\"Active\"");
    }

    #[test]
    fn test_date_range_contains_whole_days() {
        let range = DateRange::new(date(2023, 6, 1), date(2023, 6, 2));

        assert!(range.contains(at(2023, 6, 1, 0)));
        assert!(range.contains(at(2023, 6, 2, 23)));
        assert!(!range.contains(at(2023, 6, 3, 0)));
    }
}

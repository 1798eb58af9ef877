//! Platform-agnostic types for CareLink pump snapshots.
//!
//! This crate provides the data model shared by the transform pipeline
//! (carelink-core) and its front ends.
//!
//! # Features
//!
//! - The [`CareLinkSnapshot`] input as served by the CareLink API
//! - Normalized [`Entry`] output in the Nightscout entries schema
//! - The fixed [`Trend`] vocabulary
//! - Pump clock parsing and the whole-hour [`PumpOffset`]
//! - Error types for data parsing
//!
//! # Example
//!
//! ```
//! use carelink_types::{PumpOffset, Timestamp, resolve_pump_local_time};
//!
//! let offset: PumpOffset = "+0100".parse().unwrap();
//! let instant = resolve_pump_local_time("2023-01-01 10:00:00", &offset).unwrap();
//! let stamp = Timestamp::from_datetime(instant);
//! assert_eq!(stamp.date_string.as_deref(), Some("2023-01-01T09:00:00.000Z"));
//! ```

pub mod clock;
pub mod error;
pub mod trend;
pub mod types;

pub use clock::{PumpOffset, Timestamp, parse_pump_local_time, resolve_pump_local_time};
pub use error::{ParseError, ParseResult};
pub use trend::{Trend, TrendAnnotation};
pub use types::{
    ActiveInsulin, CareLinkSnapshot, Entry, PUMP_STATUS_ENTRY_TYPE, PumpStatusEntry,
    SENSOR_GLUCOSE_ENTRY_TYPE, SENSOR_GLUCOSE_KIND, SensorGlucoseEntry, SensorGlucoseReading,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    // --- SensorGlucoseReading tests ---

    #[test]
    fn test_reading_validity() {
        assert!(SensorGlucoseReading::new(120, "2023-01-01 10:00:00").is_valid());
        assert!(!SensorGlucoseReading::new(0, "2023-01-01 10:00:00").is_valid());

        let calibration = SensorGlucoseReading {
            kind: "Calibration".to_string(),
            sg: 120,
            datetime: String::new(),
        };
        assert!(!calibration.is_valid());
        assert!(calibration.has_value());
    }

    // --- CareLinkSnapshot tests ---

    #[test]
    fn test_snapshot_deserialization() {
        let json = r#"{
            "currentServerTime": 1000000,
            "lastMedicalDeviceDataUpdateServerTime": 995000,
            "sMedicalDeviceTime": "2023-01-01 10:00:00",
            "medicalDeviceFamily": "Paradigm",
            "lastSGTrend": "UP",
            "conduitInRange": true,
            "reservoirAmount": 61.5,
            "sensorState": "NORMAL",
            "activeInsulin": {"amount": 1.35, "datetime": "ignored"},
            "sgs": [
                {"kind": "SG", "sg": 120, "datetime": "2023-01-01 10:00:00", "relativeOffset": -300},
                {"kind": "SG", "sg": 0, "datetime": "2023-01-01 10:05:00"}
            ],
            "unrelatedField": "dropped"
        }"#;

        let snapshot: CareLinkSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.current_server_time, 1_000_000);
        assert_eq!(snapshot.data_age_millis(), 5_000);
        assert_eq!(snapshot.medical_device_time, "2023-01-01 10:00:00");
        assert_eq!(snapshot.medical_device_family, "Paradigm");
        assert_eq!(snapshot.last_sg_trend.as_deref(), Some("UP"));
        assert_eq!(snapshot.conduit_in_range, Some(true));
        assert_eq!(snapshot.conduit_sensor_in_range, None);
        assert_eq!(snapshot.reservoir_amount.as_ref().and_then(Number::as_f64), Some(61.5));
        assert_eq!(snapshot.sensor_state.as_deref(), Some("NORMAL"));
        assert_eq!(
            snapshot
                .active_insulin
                .as_ref()
                .and_then(|insulin| insulin.amount.as_ref())
                .and_then(Number::as_f64),
            Some(1.35)
        );
        assert_eq!(snapshot.readings().len(), 2);
        assert!(!snapshot.readings()[1].has_value());
    }

    #[test]
    fn test_snapshot_without_sgs() {
        let json = r#"{"currentServerTime": 1, "lastMedicalDeviceDataUpdateServerTime": 1}"#;
        let snapshot: CareLinkSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.sgs.is_none());
        assert!(snapshot.readings().is_empty());
        assert!(snapshot.medical_device_family.is_empty());
    }

    #[test]
    fn test_reading_missing_sg_is_sentinel() {
        let reading: SensorGlucoseReading =
            serde_json::from_str(r#"{"kind": "SG", "datetime": "2023-01-01 10:00:00"}"#).unwrap();
        assert_eq!(reading.sg, 0);
        assert!(!reading.is_valid());
    }

    #[test]
    fn test_snapshot_numbers_keep_their_form() {
        let json = r#"{
            "currentServerTime": 1,
            "lastMedicalDeviceDataUpdateServerTime": 1,
            "conduitBatteryLevel": 86,
            "reservoirAmount": 96.2,
            "activeInsulin": {"amount": 2}
        }"#;

        let snapshot: CareLinkSnapshot = serde_json::from_str(json).unwrap();
        let battery = snapshot.conduit_battery_level.unwrap();
        assert!(battery.is_u64());
        assert_eq!(battery.to_string(), "86");
        assert_eq!(snapshot.reservoir_amount.unwrap().to_string(), "96.2");
        assert!(snapshot.active_insulin.unwrap().amount.unwrap().is_u64());
    }

    // --- Entry tests ---

    #[test]
    fn test_pump_status_serialization_omits_absent_fields() {
        let entry = Entry::PumpStatus(PumpStatusEntry {
            conduit_in_range: Some(true),
            reservoir_level_percent: Some(Number::from(50u64)),
            iob: Number::from_f64(1.5),
            timestamp: Timestamp::from_millis(995_000),
            device: "connect://paradigm".to_string(),
            ..Default::default()
        });

        let value = serde_json::to_value(&entry).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["type"], "pump_status");
        assert_eq!(object["conduitInRange"], true);
        assert_eq!(object["reservoirLevelPercent"], 50);
        assert!(object["reservoirLevelPercent"].is_u64());
        assert_eq!(object["iob"], 1.5);
        assert_eq!(object["date"], 995_000);
        assert_eq!(object["dateString"], "1970-01-01T00:16:35.000Z");
        assert_eq!(object["device"], "connect://paradigm");
        assert!(!object.contains_key("sensorState"));
        assert!(!object.contains_key("calibStatus"));
        assert!(!object.contains_key("medicalDeviceSuspended"));
    }

    #[test]
    fn test_sgv_serialization_without_trend() {
        let entry = Entry::SensorGlucose(SensorGlucoseEntry::new(
            120,
            Timestamp::from_millis(1_672_567_200_000),
        ));

        let value = serde_json::to_value(&entry).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["type"], "sgv");
        assert_eq!(object["sgv"], 120);
        assert_eq!(object["dateString"], "2023-01-01T10:00:00.000Z");
        assert!(!object.contains_key("trend"));
        assert!(!object.contains_key("direction"));
    }

    #[test]
    fn test_sgv_serialization_with_trend() {
        let entry = SensorGlucoseEntry::new(130, Timestamp::from_millis(0))
            .annotate(Some(Trend::SingleUp.annotation()));

        let value = serde_json::to_value(Entry::from(entry)).unwrap();
        assert_eq!(value["trend"], 2);
        assert_eq!(value["direction"], "SingleUp");
    }

    #[test]
    fn test_annotate_none_is_noop() {
        let entry = SensorGlucoseEntry::new(130, Timestamp::from_millis(0))
            .annotate(Some(Trend::DoubleDown.annotation()));
        let unchanged = entry.clone().annotate(None);
        assert_eq!(entry, unchanged);
    }

    #[test]
    fn test_entry_accessors() {
        let mut entry = Entry::from(SensorGlucoseEntry::new(99, Timestamp::from_millis(42)));
        assert_eq!(entry.kind(), SENSOR_GLUCOSE_ENTRY_TYPE);
        assert_eq!(entry.date(), 42);
        assert_eq!(entry.device(), "");
        assert!(entry.as_pump_status().is_none());

        entry.set_device("connect://minimed");
        assert_eq!(entry.device(), "connect://minimed");
        assert_eq!(entry.as_sensor_glucose().unwrap().sgv, 99);
    }

    #[test]
    fn test_entry_deserialization() {
        let json = r#"{"type":"sgv","sgv":140,"date":1000,"dateString":"1970-01-01T00:00:01.000Z","device":"connect://paradigm","trend":6,"direction":"SingleDown"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        let sgv = entry.as_sensor_glucose().unwrap();
        assert_eq!(sgv.sgv, 140);
        assert_eq!(sgv.trend, Some(Trend::SingleDown.annotation()));
    }

    // --- ParseError tests ---

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::UnknownTrend("UP_TRIPLE".to_string());
        assert_eq!(err.to_string(), "Unknown trend: \"UP_TRIPLE\"");

        let err = ParseError::OffsetOutOfRange { hours: 40 };
        assert_eq!(err.to_string(), "Offset of 40 hours is out of range");
    }
}

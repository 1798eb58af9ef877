//! Core types for CareLink snapshots and normalized entries.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use serde_json::Number;

use crate::clock::Timestamp;
use crate::trend::TrendAnnotation;

/// `type` tag of the pump-status entry.
pub const PUMP_STATUS_ENTRY_TYPE: &str = "pump_status";

/// `type` tag of sensor-glucose entries.
pub const SENSOR_GLUCOSE_ENTRY_TYPE: &str = "sgv";

/// `kind` of a raw reading that carries a sensor glucose value.
pub const SENSOR_GLUCOSE_KIND: &str = "SG";

/// One polling cycle's worth of pump telemetry as returned by CareLink.
///
/// Keys outside the pump-status whitelist are ignored on deserialization, so
/// they can never leak into a [`PumpStatusEntry`]. Numeric fields keep the
/// JSON number as sent: `86` stays an integer, `96.2` a float.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CareLinkSnapshot {
    /// Server clock, epoch milliseconds.
    pub current_server_time: i64,
    /// Last pump contact, epoch milliseconds.
    pub last_medical_device_data_update_server_time: i64,
    /// Pump's local clock rendering, no timezone.
    #[cfg_attr(feature = "serde", serde(rename = "sMedicalDeviceTime", default))]
    pub medical_device_time: String,
    /// Device family identifier, e.g. `"Paradigm"`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub medical_device_family: String,
    /// Raw sensor readings, ascending by time.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sgs: Option<Vec<SensorGlucoseReading>>,
    /// Trend key of the freshest reading.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "lastSGTrend", default, skip_serializing_if = "Option::is_none")
    )]
    pub last_sg_trend: Option<String>,

    // booleans
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub conduit_in_range: Option<bool>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub conduit_medical_device_in_range: Option<bool>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub conduit_sensor_in_range: Option<bool>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub medical_device_suspended: Option<bool>,
    // numbers
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub conduit_battery_level: Option<Number>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub reservoir_level_percent: Option<Number>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub reservoir_amount: Option<Number>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub medical_device_battery_level_percent: Option<Number>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub sensor_duration_hours: Option<Number>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub time_to_next_calib_hours: Option<Number>,
    // strings
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub sensor_state: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub calib_status: Option<String>,

    /// Insulin on board as reported by the pump.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub active_insulin: Option<ActiveInsulin>,
}

impl CareLinkSnapshot {
    /// Raw readings, empty when `sgs` is absent.
    #[must_use]
    pub fn readings(&self) -> &[SensorGlucoseReading] {
        self.sgs.as_deref().unwrap_or_default()
    }

    /// Milliseconds between the last pump contact and the server clock.
    #[must_use]
    pub fn data_age_millis(&self) -> i64 {
        self.current_server_time
            .saturating_sub(self.last_medical_device_data_update_server_time)
    }
}

/// One raw entry of the snapshot's `sgs` array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorGlucoseReading {
    /// Record kind; only `"SG"` carries a glucose value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: String,
    /// Glucose in mg/dL, `0` when the sensor produced no value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sg: u32,
    /// Pump-local time of the reading, no timezone.
    #[cfg_attr(feature = "serde", serde(default))]
    pub datetime: String,
}

impl SensorGlucoseReading {
    /// Build an `SG` reading.
    pub fn new(sg: u32, datetime: impl Into<String>) -> Self {
        Self {
            kind: SENSOR_GLUCOSE_KIND.to_string(),
            sg,
            datetime: datetime.into(),
        }
    }

    /// `true` unless `sg` is the "no reading" sentinel.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.sg != 0
    }

    /// `true` for `SG` records carrying a value.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.kind == SENSOR_GLUCOSE_KIND && self.has_value()
    }
}

/// The snapshot's `activeInsulin` object.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActiveInsulin {
    /// Units on board; CareLink reports negative values when unknown.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub amount: Option<Number>,
}

/// Normalized pump/device status.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PumpStatusEntry {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub conduit_in_range: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub conduit_medical_device_in_range: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub conduit_sensor_in_range: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub medical_device_suspended: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub conduit_battery_level: Option<Number>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub reservoir_level_percent: Option<Number>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub reservoir_amount: Option<Number>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub medical_device_battery_level_percent: Option<Number>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub sensor_duration_hours: Option<Number>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub time_to_next_calib_hours: Option<Number>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub sensor_state: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub calib_status: Option<String>,
    /// Insulin on board, only when the pump reported a non-negative amount.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub iob: Option<Number>,
    /// Time of the last pump contact.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub timestamp: Timestamp,
    /// Source device URI.
    #[cfg_attr(feature = "serde", serde(default))]
    pub device: String,
}

/// One normalized glucose reading.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorGlucoseEntry {
    /// Glucose in mg/dL.
    pub sgv: u32,
    /// Absolute time of the reading.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub timestamp: Timestamp,
    /// Source device URI.
    #[cfg_attr(feature = "serde", serde(default))]
    pub device: String,
    /// Present on the freshest reading only.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub trend: Option<TrendAnnotation>,
}

impl SensorGlucoseEntry {
    /// Create an entry without device or trend.
    #[must_use]
    pub fn new(sgv: u32, timestamp: Timestamp) -> Self {
        Self {
            sgv,
            timestamp,
            device: String::new(),
            trend: None,
        }
    }

    /// Overlay a trend annotation; `None` leaves the entry unchanged.
    #[must_use]
    pub fn annotate(mut self, annotation: Option<TrendAnnotation>) -> Self {
        if let Some(annotation) = annotation {
            self.trend = Some(annotation);
        }
        self
    }
}

/// A normalized time-series record, tagged by `type`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Entry {
    /// Device status, at most one per transform.
    #[cfg_attr(feature = "serde", serde(rename = "pump_status"))]
    PumpStatus(PumpStatusEntry),
    /// Sensor glucose value.
    #[cfg_attr(feature = "serde", serde(rename = "sgv"))]
    SensorGlucose(SensorGlucoseEntry),
}

impl Entry {
    /// The `type` tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Entry::PumpStatus(_) => PUMP_STATUS_ENTRY_TYPE,
            Entry::SensorGlucose(_) => SENSOR_GLUCOSE_ENTRY_TYPE,
        }
    }

    /// Epoch milliseconds of the entry.
    #[must_use]
    pub fn date(&self) -> i64 {
        self.timestamp().date
    }

    /// `date` / `dateString` pair.
    #[must_use]
    pub fn timestamp(&self) -> &Timestamp {
        match self {
            Entry::PumpStatus(e) => &e.timestamp,
            Entry::SensorGlucose(e) => &e.timestamp,
        }
    }

    /// Source device URI.
    #[must_use]
    pub fn device(&self) -> &str {
        match self {
            Entry::PumpStatus(e) => &e.device,
            Entry::SensorGlucose(e) => &e.device,
        }
    }

    /// Tag the entry with its source device.
    pub fn set_device(&mut self, device: &str) {
        let slot = match self {
            Entry::PumpStatus(e) => &mut e.device,
            Entry::SensorGlucose(e) => &mut e.device,
        };
        device.clone_into(slot);
    }

    /// The glucose entry, if this is one.
    #[must_use]
    pub fn as_sensor_glucose(&self) -> Option<&SensorGlucoseEntry> {
        match self {
            Entry::SensorGlucose(e) => Some(e),
            Entry::PumpStatus(_) => None,
        }
    }

    /// The pump-status entry, if this is one.
    #[must_use]
    pub fn as_pump_status(&self) -> Option<&PumpStatusEntry> {
        match self {
            Entry::PumpStatus(e) => Some(e),
            Entry::SensorGlucose(_) => None,
        }
    }
}

impl From<PumpStatusEntry> for Entry {
    fn from(entry: PumpStatusEntry) -> Self {
        Entry::PumpStatus(entry)
    }
}

impl From<SensorGlucoseEntry> for Entry {
    fn from(entry: SensorGlucoseEntry) -> Self {
        Entry::SensorGlucose(entry)
    }
}

//! Transform CareLink pump snapshots into Nightscout entries.
//!
//! This crate turns one CareLink "connect" status snapshot into a sequence
//! of normalized entries: at most one pump-status entry followed by the
//! sensor glucose values it carries.
//!
//! # Pipeline
//!
//! | Step | Module | Effect |
//! |------|--------|--------|
//! | Staleness | [`staleness`] | Snapshots more than 20 minutes behind produce nothing |
//! | Pump status | [`pump_status`] | Whitelisted scalar fields, `iob`, last-contact time |
//! | Timezone | [`offset`] | Whole-hour pump offset from pump clock vs server clock |
//! | Glucose | [`sgv`] | Valid `SG` readings, absolute time, trend on the freshest |
//! | Orchestration | [`transform`] | Limit glucose entries, tag every entry with its device |
//!
//! Nothing in the pipeline fails a call: stale data, missing fields, unknown
//! trends and unreadable clocks all degrade to fewer entries or fields, with
//! a `tracing` event explaining why.
//!
//! # Quick Start
//!
//! ```
//! use carelink_core::Transformer;
//!
//! let transformer = Transformer::default();
//! let entries = transformer.transform_json(r#"{
//!     "currentServerTime": 1672567200000,
//!     "lastMedicalDeviceDataUpdateServerTime": 1672567117000,
//!     "sMedicalDeviceTime": "2023-01-01 10:00:00",
//!     "medicalDeviceFamily": "Paradigm",
//!     "lastSGTrend": "UP",
//!     "sgs": [{"kind": "SG", "sg": 130, "datetime": "2023-01-01 09:58:00"}]
//! }"#).unwrap();
//!
//! assert_eq!(entries.len(), 2);
//! let sgv = entries[1].as_sensor_glucose().unwrap();
//! assert_eq!(sgv.trend.as_ref().unwrap().direction, "SingleUp");
//! ```

pub mod error;
pub mod merge;
pub mod offset;
pub mod pump_status;
pub mod sgv;
pub mod staleness;
pub mod transform;

// Re-export the data model from carelink-types
pub use carelink_types::types;

// Core exports
pub use error::{Error, Result};
pub use merge::overlay;
pub use offset::{OffsetGuesser, infer_offset};
pub use pump_status::pump_status_entry;
pub use sgv::{sgv_entries, trend_annotation};
pub use staleness::{Recency, STALE_DATA_THRESHOLD_MINUTES, is_stale};
pub use transform::{
    DEVICE_URI_SCHEME, SgvLimit, TransformOptions, Transformer, device_uri, transform,
};

// Re-export from carelink-types
pub use carelink_types::{
    CareLinkSnapshot, Entry, ParseError, PumpOffset, PumpStatusEntry, SensorGlucoseEntry,
    SensorGlucoseReading, Trend, TrendAnnotation, resolve_pump_local_time,
};

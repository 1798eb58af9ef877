//! Snapshot to entries orchestration.
//!
//! One call turns one snapshot into at most one pump-status entry followed
//! by the most recent glucose entries, all tagged with the source device.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use carelink_core::{OffsetGuesser, SgvLimit, TransformOptions, Transformer};
//! use carelink_types::{CareLinkSnapshot, SensorGlucoseReading};
//!
//! let transformer = Transformer::new(
//!     Arc::new(OffsetGuesser::new()),
//!     TransformOptions::default().sgv_limit(SgvLimit::Count(1)),
//! );
//!
//! let snapshot = CareLinkSnapshot {
//!     current_server_time: 1_672_567_200_000,
//!     last_medical_device_data_update_server_time: 1_672_567_200_000,
//!     medical_device_time: "2023-01-01 10:00:00".to_string(),
//!     medical_device_family: "Paradigm".to_string(),
//!     sgs: Some(vec![
//!         SensorGlucoseReading::new(120, "2023-01-01 09:55:00"),
//!         SensorGlucoseReading::new(125, "2023-01-01 10:00:00"),
//!     ]),
//!     ..Default::default()
//! };
//!
//! let entries = transformer.transform(&snapshot);
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[0].kind(), "pump_status");
//! assert_eq!(entries[1].as_sensor_glucose().unwrap().sgv, 125);
//! assert!(entries.iter().all(|e| e.device() == "connect://paradigm"));
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use carelink_types::{CareLinkSnapshot, Entry};

use crate::error::{Error, Result};
use crate::offset::OffsetGuesser;
use crate::pump_status::pump_status_entry;
use crate::sgv::sgv_entries;
use crate::staleness::is_stale;

/// Scheme prefix of the `device` tag.
pub const DEVICE_URI_SCHEME: &str = "connect://";

/// Device tag for a device family, e.g. `connect://paradigm`.
#[must_use]
pub fn device_uri(medical_device_family: &str) -> String {
    format!("{}{}", DEVICE_URI_SCHEME, medical_device_family.to_lowercase())
}

/// How many of the most recent glucose entries to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SgvLimit {
    /// Keep every entry.
    #[default]
    Unbounded,
    /// Keep at most this many of the latest entries.
    Count(usize),
}

impl SgvLimit {
    /// Number of leading entries to drop from a sequence of `len`.
    #[must_use]
    pub fn skip_for(&self, len: usize) -> usize {
        match self {
            SgvLimit::Unbounded => 0,
            SgvLimit::Count(limit) => len.saturating_sub(*limit),
        }
    }
}

impl From<Option<usize>> for SgvLimit {
    fn from(limit: Option<usize>) -> Self {
        limit.map_or(SgvLimit::Unbounded, SgvLimit::Count)
    }
}

impl fmt::Display for SgvLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SgvLimit::Unbounded => write!(f, "unbounded"),
            SgvLimit::Count(limit) => write!(f, "{}", limit),
        }
    }
}

impl FromStr for SgvLimit {
    type Err = Error;

    /// Accepts a non-negative integer, or `unbounded` / `all`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unbounded") || s.eq_ignore_ascii_case("all") {
            return Ok(SgvLimit::Unbounded);
        }
        s.parse::<usize>().map(SgvLimit::Count).map_err(|_| {
            Error::invalid_config(format!(
                "sgv limit must be a non-negative integer or 'unbounded', got '{}'",
                s
            ))
        })
    }
}

/// Per-call transform settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Glucose entries to keep, latest first.
    pub sgv_limit: SgvLimit,
}

impl TransformOptions {
    /// Set the glucose entry limit.
    #[must_use]
    pub fn sgv_limit(mut self, limit: SgvLimit) -> Self {
        self.sgv_limit = limit;
        self
    }
}

/// Transform one snapshot into entries.
///
/// Returns nothing for stale snapshots. Otherwise the pump-status entry comes
/// first, followed by the last `sgv_limit` glucose entries in chronological
/// order. Every entry is tagged with [`device_uri`] of the device family.
pub fn transform(
    snapshot: &CareLinkSnapshot,
    sgv_limit: SgvLimit,
    guesser: &OffsetGuesser,
) -> Vec<Entry> {
    if is_stale(snapshot) {
        return Vec::new();
    }

    let mut entries = vec![Entry::from(pump_status_entry(snapshot))];

    let sgvs = sgv_entries(snapshot, guesser);
    let skip = sgv_limit.skip_for(sgvs.len());
    entries.extend(sgvs.into_iter().skip(skip).map(Entry::from));

    let device = device_uri(&snapshot.medical_device_family);
    for entry in &mut entries {
        entry.set_device(&device);
    }

    debug!(
        entries = entries.len(),
        %sgv_limit,
        device = %device,
        "Transformed CareLink snapshot"
    );
    entries
}

/// Reusable transform service.
///
/// Holds the process-wide [`OffsetGuesser`] and default options. Cheap to
/// clone; clones share the guesser.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    guesser: Arc<OffsetGuesser>,
    options: TransformOptions,
}

impl Transformer {
    /// Create a transformer sharing `guesser`.
    pub fn new(guesser: Arc<OffsetGuesser>, options: TransformOptions) -> Self {
        Self { guesser, options }
    }

    /// The shared offset guesser.
    pub fn guesser(&self) -> &Arc<OffsetGuesser> {
        &self.guesser
    }

    /// The default options.
    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Transform with the default options.
    pub fn transform(&self, snapshot: &CareLinkSnapshot) -> Vec<Entry> {
        transform(snapshot, self.options.sgv_limit, &self.guesser)
    }

    /// Transform with an explicit limit.
    pub fn transform_with_limit(&self, snapshot: &CareLinkSnapshot, sgv_limit: SgvLimit) -> Vec<Entry> {
        transform(snapshot, sgv_limit, &self.guesser)
    }

    /// Decode a snapshot document and transform it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if `json` is not a snapshot document.
    pub fn transform_json(&self, json: &str) -> Result<Vec<Entry>> {
        let snapshot: CareLinkSnapshot = serde_json::from_str(json)?;
        Ok(self.transform(&snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_types::{PumpOffset, SensorGlucoseReading, Trend};

    // 2023-01-01T10:00:00Z
    const TEN_AM_UTC: i64 = 1_672_567_200_000;
    const MINUTE: i64 = 60_000;

    fn snapshot(values: &[u32]) -> CareLinkSnapshot {
        let sgs = values
            .iter()
            .enumerate()
            .map(|(i, sg)| {
                SensorGlucoseReading::new(*sg, format!("2023-01-01 09:{:02}:00", 5 * i))
            })
            .collect();
        CareLinkSnapshot {
            current_server_time: TEN_AM_UTC,
            last_medical_device_data_update_server_time: TEN_AM_UTC - MINUTE,
            medical_device_time: "2023-01-01 10:00:00".to_string(),
            medical_device_family: "Paradigm".to_string(),
            sgs: Some(sgs),
            last_sg_trend: Some("UP".to_string()),
            ..Default::default()
        }
    }

    fn sgv_values(entries: &[Entry]) -> Vec<u32> {
        entries
            .iter()
            .filter_map(Entry::as_sensor_glucose)
            .map(|e| e.sgv)
            .collect()
    }

    #[test]
    fn test_device_uri() {
        assert_eq!(device_uri("Paradigm"), "connect://paradigm");
        assert_eq!(device_uri("MINIMED"), "connect://minimed");
        assert_eq!(device_uri(""), "connect://");
    }

    #[test]
    fn test_sgv_limit_skip() {
        assert_eq!(SgvLimit::Unbounded.skip_for(10), 0);
        assert_eq!(SgvLimit::Count(3).skip_for(10), 7);
        assert_eq!(SgvLimit::Count(30).skip_for(10), 0);
        assert_eq!(SgvLimit::Count(0).skip_for(10), 10);
    }

    #[test]
    fn test_sgv_limit_from_str() {
        assert_eq!("5".parse::<SgvLimit>().unwrap(), SgvLimit::Count(5));
        assert_eq!("0".parse::<SgvLimit>().unwrap(), SgvLimit::Count(0));
        assert_eq!("all".parse::<SgvLimit>().unwrap(), SgvLimit::Unbounded);
        assert_eq!("Unbounded".parse::<SgvLimit>().unwrap(), SgvLimit::Unbounded);
        assert!(matches!(
            "-1".parse::<SgvLimit>(),
            Err(Error::InvalidConfig(_))
        ));
        assert!("many".parse::<SgvLimit>().is_err());
    }

    #[test]
    fn test_sgv_limit_from_option() {
        assert_eq!(SgvLimit::from(None), SgvLimit::Unbounded);
        assert_eq!(SgvLimit::from(Some(4)), SgvLimit::Count(4));
        assert_eq!(SgvLimit::Count(4).to_string(), "4");
        assert_eq!(SgvLimit::Unbounded.to_string(), "unbounded");
    }

    #[test]
    fn test_pump_status_first() {
        let entries = transform(&snapshot(&[120, 125]), SgvLimit::Unbounded, &OffsetGuesser::new());
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind(), "pump_status");
        assert_eq!(entries[0].date(), TEN_AM_UTC - MINUTE);
        assert_eq!(sgv_values(&entries), vec![120, 125]);
    }

    #[test]
    fn test_stale_snapshot_yields_nothing() {
        let mut snap = snapshot(&[120]);
        snap.last_medical_device_data_update_server_time = TEN_AM_UTC - 21 * MINUTE;
        let guesser = OffsetGuesser::new();

        assert!(transform(&snap, SgvLimit::Unbounded, &guesser).is_empty());
        assert_eq!(guesser.last_guess(), None, "builders must not run on stale data");
    }

    #[test]
    fn test_limit_keeps_latest() {
        let entries = transform(&snapshot(&[100, 110, 120]), SgvLimit::Count(1), &OffsetGuesser::new());
        assert_eq!(entries.len(), 2);
        assert_eq!(sgv_values(&entries), vec![120]);
        assert_eq!(
            entries[1].as_sensor_glucose().unwrap().trend,
            Some(Trend::SingleUp.annotation())
        );
    }

    #[test]
    fn test_limit_zero_keeps_pump_status() {
        let entries = transform(&snapshot(&[100, 110]), SgvLimit::Count(0), &OffsetGuesser::new());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind(), "pump_status");
    }

    #[test]
    fn test_limit_larger_than_readings() {
        let entries = transform(&snapshot(&[100, 110]), SgvLimit::Count(50), &OffsetGuesser::new());
        assert_eq!(sgv_values(&entries), vec![100, 110]);
    }

    #[test]
    fn test_every_entry_tagged() {
        let entries = transform(&snapshot(&[100, 0, 110]), SgvLimit::Unbounded, &OffsetGuesser::new());
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.device() == "connect://paradigm"));
    }

    #[test]
    fn test_no_sgs_still_reports_status() {
        let mut snap = snapshot(&[]);
        snap.sgs = None;
        let entries = transform(&snap, SgvLimit::Unbounded, &OffsetGuesser::new());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].device(), "connect://paradigm");
    }

    #[test]
    fn test_transformer_shares_guesser() {
        let guesser = Arc::new(OffsetGuesser::new());
        let transformer = Transformer::new(Arc::clone(&guesser), TransformOptions::default());
        let clone = transformer.clone();

        clone.transform(&snapshot(&[100]));
        assert_eq!(guesser.last_guess(), Some(PumpOffset::UTC));
        assert!(Arc::ptr_eq(transformer.guesser(), clone.guesser()));
    }

    #[test]
    fn test_transformer_uses_default_limit() {
        let transformer = Transformer::new(
            Arc::new(OffsetGuesser::new()),
            TransformOptions::default().sgv_limit(SgvLimit::Count(2)),
        );
        let snap = snapshot(&[100, 110, 120]);

        assert_eq!(sgv_values(&transformer.transform(&snap)), vec![110, 120]);
        assert_eq!(
            sgv_values(&transformer.transform_with_limit(&snap, SgvLimit::Unbounded)),
            vec![100, 110, 120]
        );
    }

    #[test]
    fn test_transform_json_rejects_garbage() {
        let transformer = Transformer::default();
        assert!(matches!(
            transformer.transform_json("[1, 2, 3]"),
            Err(Error::Json(_))
        ));
    }
}

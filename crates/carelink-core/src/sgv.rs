//! Sensor-glucose entry construction.
//!
//! Raw `sgs` readings are filtered down to real glucose values, pinned to
//! absolute time with the inferred pump offset, and the freshest one is
//! annotated with the snapshot's trend.
//!
//! The readings are trusted to already be in ascending time order; they are
//! never sorted here.

use tracing::{debug, warn};

use carelink_types::{
    CareLinkSnapshot, ParseError, PumpOffset, SensorGlucoseEntry, SensorGlucoseReading,
    Timestamp, Trend, TrendAnnotation, resolve_pump_local_time,
};

use crate::error::Result;
use crate::offset::OffsetGuesser;

/// Look up the annotation for a CareLink trend key.
///
/// # Errors
///
/// Returns [`ParseError::UnknownTrend`] for keys outside the vocabulary.
pub fn trend_annotation(key: &str) -> Result<TrendAnnotation> {
    Ok(key.parse::<Trend>()?.annotation())
}

/// Convert one reading, or `None` if its time cannot be parsed.
#[must_use]
pub fn sgv_entry(reading: &SensorGlucoseReading, offset: &PumpOffset) -> Option<SensorGlucoseEntry> {
    match resolve_pump_local_time(&reading.datetime, offset) {
        Ok(instant) => Some(SensorGlucoseEntry::new(
            reading.sg,
            Timestamp::from_datetime(instant),
        )),
        Err(e) => {
            warn!(sg = reading.sg, error = %e, "Dropping sensor glucose reading");
            None
        }
    }
}

/// Build the glucose entries of a snapshot, oldest first.
///
/// Returns nothing, without consulting `guesser`, when the snapshot has no
/// readings. Also returns nothing when the pump offset cannot be inferred,
/// since no reading could be placed in time.
///
/// The last entry gets the `lastSGTrend` annotation only if the last *raw*
/// reading, before filtering, carried a value. An unmapped trend leaves it
/// unannotated.
pub fn sgv_entries(snapshot: &CareLinkSnapshot, guesser: &OffsetGuesser) -> Vec<SensorGlucoseEntry> {
    let readings = snapshot.readings();
    if readings.is_empty() {
        return Vec::new();
    }

    let offset = match guesser.guess_for(snapshot) {
        Ok(offset) => offset,
        Err(e) => {
            warn!(error = %e, "Cannot infer pump timezone, skipping sensor glucose entries");
            return Vec::new();
        }
    };

    let mut entries: Vec<SensorGlucoseEntry> = readings
        .iter()
        .filter(|reading| reading.is_valid())
        .filter_map(|reading| sgv_entry(reading, &offset))
        .collect();

    let freshest_has_value = readings.last().is_some_and(SensorGlucoseReading::has_value);
    if freshest_has_value && let Some(last) = entries.pop() {
        entries.push(last.annotate(last_trend(snapshot)));
    }

    debug!(
        raw = readings.len(),
        kept = entries.len(),
        %offset,
        "Built sensor glucose entries"
    );
    entries
}

fn last_trend(snapshot: &CareLinkSnapshot) -> Option<TrendAnnotation> {
    let key = snapshot.last_sg_trend.as_deref()?;
    match trend_annotation(key) {
        Ok(annotation) => Some(annotation),
        Err(crate::Error::Parse(ParseError::UnknownTrend(key))) => {
            debug!(trend = %key, "Unmapped trend, leaving last entry unannotated");
            None
        }
        Err(_) => None,
    }
}

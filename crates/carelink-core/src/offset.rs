//! Pump timezone inference.
//!
//! CareLink never reports the pump's timezone, only its wall clock
//! (`sMedicalDeviceTime`). The server keeps advancing that clock even while
//! the pump is out of contact, so its distance from the server clock is
//! always close to a whole number of hours and can be taken as the offset.
//!
//! # Example
//!
//! ```
//! use carelink_core::OffsetGuesser;
//!
//! let guesser = OffsetGuesser::new();
//!
//! // Pump reads 10:00 while the server is at 15:00 UTC.
//! let offset = guesser.guess("2023-01-01 10:00:00", 1_672_585_200_000).unwrap();
//! assert_eq!(offset.to_string(), "-0500");
//! assert_eq!(guesser.last_guess(), Some(offset));
//! ```

use std::sync::{Mutex, PoisonError};

use time::macros::format_description;
use tracing::{debug, info};

use carelink_types::clock::{from_unix_millis, unix_millis};
use carelink_types::{CareLinkSnapshot, PumpOffset, parse_pump_local_time};

use crate::error::Result;

const MILLIS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Infer the pump offset from its clock rendering and the server clock.
///
/// Halfway cases round away from zero.
///
/// # Errors
///
/// Fails if `pump_time` cannot be parsed or the difference is not a
/// representable UTC offset.
pub fn infer_offset(pump_time: &str, server_time_ms: i64) -> Result<PumpOffset> {
    let pump_time_as_utc = unix_millis(parse_pump_local_time(pump_time)?.assume_utc());
    let hours = (pump_time_as_utc.saturating_sub(server_time_ms) as f64 / MILLIS_PER_HOUR).round();
    Ok(PumpOffset::from_hours(hours as i64)?)
}

/// Infers pump offsets and remembers the last one.
///
/// The remembered offset only suppresses repeated log lines; it never
/// influences the offset returned. One guesser is meant to live for the whole
/// process and be shared by every transform, so it is `Sync` and the
/// compare-and-update happens under a single lock.
#[derive(Debug, Default)]
pub struct OffsetGuesser {
    last_guess: Mutex<Option<PumpOffset>>,
}

impl OffsetGuesser {
    /// Create a guesser with no remembered offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Guess the offset for a pump clock rendering and server time.
    ///
    /// Logs the guess whenever it differs from the previous one, including
    /// the very first guess.
    ///
    /// # Errors
    ///
    /// See [`infer_offset`]. A failed guess leaves the remembered offset
    /// untouched.
    pub fn guess(&self, pump_time: &str, server_time_ms: i64) -> Result<PumpOffset> {
        let offset = infer_offset(pump_time, server_time_ms)?;

        if self.remember(offset) {
            info!(
                "Guessed pump timezone {} (pump time: \"{}\"; server time: {})",
                offset,
                pump_time,
                render_server_time(server_time_ms)
            );
        } else {
            debug!(%offset, "Pump timezone unchanged");
        }

        Ok(offset)
    }

    /// Guess the offset for a snapshot.
    ///
    /// # Errors
    ///
    /// See [`infer_offset`].
    pub fn guess_for(&self, snapshot: &CareLinkSnapshot) -> Result<PumpOffset> {
        self.guess(&snapshot.medical_device_time, snapshot.current_server_time)
    }

    /// The most recently guessed offset, if any.
    pub fn last_guess(&self) -> Option<PumpOffset> {
        *self.lock()
    }

    /// Store `offset`, returning whether it differs from the previous guess.
    fn remember(&self, offset: PumpOffset) -> bool {
        let mut last = self.lock();
        let changed = *last != Some(offset);
        *last = Some(offset);
        changed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<PumpOffset>> {
        // The guarded value is a plain Copy option; a panic elsewhere cannot
        // leave it half-written.
        self.last_guess.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Human-readable server time for log lines.
fn render_server_time(server_time_ms: i64) -> String {
    let format = format_description!(
        "[weekday repr:short] [month repr:short] [day] [year] [hour]:[minute]:[second] UTC"
    );
    from_unix_millis(server_time_ms)
        .and_then(|t| t.format(format).ok())
        .unwrap_or_else(|| format!("{} ms", server_time_ms))
}

//! Stale snapshot detection.
//!
//! A snapshot whose last pump contact is more than
//! [`STALE_DATA_THRESHOLD_MINUTES`] behind the server clock is not
//! transformed at all, so outdated readings never reach a consumer's time
//! series.
//!
//! # Example
//!
//! ```
//! use carelink_core::staleness::Recency;
//!
//! let recency = Recency::between(1_000_000, 995_000);
//! assert!(!recency.is_stale());
//! assert_eq!(format!("{:.2}", recency.minutes()), "0.08");
//! ```

use tracing::warn;

use carelink_types::CareLinkSnapshot;

/// Pump data older than this many minutes is discarded.
pub const STALE_DATA_THRESHOLD_MINUTES: f64 = 20.0;

const MILLIS_PER_MINUTE: f64 = 60.0 * 1000.0;

/// Age of a snapshot's pump data relative to the server clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recency {
    minutes: f64,
}

impl Recency {
    /// Recency from a server time and a last-contact time, both epoch ms.
    #[must_use]
    pub fn between(current_server_time: i64, last_update_time: i64) -> Self {
        Self {
            minutes: current_server_time.saturating_sub(last_update_time) as f64
                / MILLIS_PER_MINUTE,
        }
    }

    /// Recency of a snapshot.
    #[must_use]
    pub fn of(snapshot: &CareLinkSnapshot) -> Self {
        Self {
            minutes: snapshot.data_age_millis() as f64 / MILLIS_PER_MINUTE,
        }
    }

    /// Age in minutes. Negative if the pump reported "from the future".
    #[must_use]
    pub fn minutes(&self) -> f64 {
        self.minutes
    }

    /// Strictly older than the threshold.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.minutes > STALE_DATA_THRESHOLD_MINUTES
    }
}

/// Whether `snapshot` should be dropped, logging when it is.
pub fn is_stale(snapshot: &CareLinkSnapshot) -> bool {
    let recency = Recency::of(snapshot);
    if recency.is_stale() {
        warn!("Stale CareLink data: {:.2} minutes old", recency.minutes());
        return true;
    }
    false
}

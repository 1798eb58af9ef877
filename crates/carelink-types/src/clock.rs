//! Pump clock handling.
//!
//! CareLink pumps report wall-clock renderings without a timezone. This
//! module holds the whole-hour [`PumpOffset`] inferred for a pump, the
//! parser that pins a pump-local rendering to an absolute instant, and the
//! [`Timestamp`] pair (`date` / `dateString`) stamped onto every entry.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::{ParseError, ParseResult};

/// Renderings the pump and the CareLink server are known to use for
/// pump-local time. Tried in order.
const PUMP_TIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[month repr:short] [day padding:none], [year] [hour]:[minute]:[second]"),
];

/// ECMAScript `Date.prototype.toISOString` layout, always in UTC.
const ISO_8601_MILLIS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// Whole-hour UTC offset of a pump's clock.
///
/// Renders as a signed four digit offset with zero minutes, which is also
/// the only form [`FromStr`] accepts.
///
/// ```
/// use carelink_types::PumpOffset;
///
/// let offset = PumpOffset::from_hours(-3).unwrap();
/// assert_eq!(offset.to_string(), "-0300");
/// assert_eq!("+0500".parse::<PumpOffset>().unwrap().hours(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PumpOffset(UtcOffset);

impl PumpOffset {
    /// The zero offset.
    pub const UTC: PumpOffset = PumpOffset(UtcOffset::UTC);

    /// Build an offset from a signed number of hours.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::OffsetOutOfRange`] when `hours` cannot be
    /// expressed as a UTC offset (more than 25 hours either way).
    pub fn from_hours(hours: i64) -> ParseResult<Self> {
        i8::try_from(hours)
            .ok()
            .and_then(|h| UtcOffset::from_hms(h, 0, 0).ok())
            .map(PumpOffset)
            .ok_or(ParseError::OffsetOutOfRange { hours })
    }

    /// Signed whole hours east of UTC.
    #[must_use]
    pub fn hours(&self) -> i8 {
        self.0.whole_hours()
    }

    /// The offset as a `time` UTC offset.
    #[must_use]
    pub fn utc_offset(&self) -> UtcOffset {
        self.0
    }
}

impl fmt::Display for PumpOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.hours();
        let sign = if hours >= 0 { '+' } else { '-' };
        write!(f, "{}{:02}00", sign, hours.unsigned_abs())
    }
}

impl FromStr for PumpOffset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidOffset(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 5 || !bytes[1..].iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let negative = match bytes[0] {
            b'+' => false,
            b'-' => true,
            _ => return Err(invalid()),
        };
        if &s[3..] != "00" {
            return Err(invalid());
        }

        let hours: i64 = s[1..3].parse().map_err(|_| invalid())?;
        PumpOffset::from_hours(if negative { -hours } else { hours })
    }
}

/// Parse a pump-local clock rendering into a calendar date and time.
///
/// # Errors
///
/// Returns [`ParseError::MalformedTimestamp`] if `local` matches none of the
/// known renderings.
pub fn parse_pump_local_time(local: &str) -> ParseResult<PrimitiveDateTime> {
    let trimmed = local.trim();
    PUMP_TIME_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(trimmed, *format).ok())
        .ok_or_else(|| ParseError::MalformedTimestamp {
            value: local.to_string(),
        })
}

/// Resolve a pump-local clock rendering to an absolute instant using the
/// pump's offset.
///
/// ```
/// use carelink_types::{PumpOffset, resolve_pump_local_time};
///
/// let offset: PumpOffset = "-0500".parse().unwrap();
/// let instant = resolve_pump_local_time("2023-01-01 10:00:00", &offset).unwrap();
/// assert_eq!(instant.unix_timestamp(), 1_672_585_200);
/// ```
///
/// # Errors
///
/// Returns [`ParseError::MalformedTimestamp`] if `local` cannot be parsed.
pub fn resolve_pump_local_time(local: &str, offset: &PumpOffset) -> ParseResult<OffsetDateTime> {
    Ok(parse_pump_local_time(local)?.assume_offset(offset.utc_offset()))
}

/// Milliseconds since the Unix epoch for `instant`.
#[must_use]
pub fn unix_millis(instant: OffsetDateTime) -> i64 {
    // Floor division keeps pre-epoch instants on the same millisecond grid as
    // JavaScript clocks.
    instant.unix_timestamp_nanos().div_euclid(1_000_000) as i64
}

/// Instant for a millisecond epoch value, if representable.
#[must_use]
pub fn from_unix_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

/// Render `instant` in UTC as `YYYY-MM-DDTHH:MM:SS.sssZ`.
#[must_use]
pub fn format_iso_8601(instant: OffsetDateTime) -> Option<String> {
    instant.to_offset(UtcOffset::UTC).format(ISO_8601_MILLIS).ok()
}

/// The `date` / `dateString` pair carried by every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamp {
    /// Milliseconds since the Unix epoch.
    pub date: i64,
    /// ISO-8601 rendering of `date`; absent when `date` is not representable.
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "dateString",
            default,
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub date_string: Option<String>,
}

impl Timestamp {
    /// Stamp from a millisecond epoch value.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self {
            date: millis,
            date_string: from_unix_millis(millis).and_then(format_iso_8601),
        }
    }

    /// Stamp from an absolute instant.
    #[must_use]
    pub fn from_datetime(instant: OffsetDateTime) -> Self {
        Self {
            date: unix_millis(instant),
            date_string: format_iso_8601(instant),
        }
    }
}

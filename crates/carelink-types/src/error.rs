//! Error types for data parsing in carelink-types.

use thiserror::Error;

/// Errors that can occur when interpreting CareLink snapshot data.
///
/// None of these abort a transform on their own; the pipeline in
/// carelink-core downgrades them to omitted fields or dropped readings.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The trend key is not part of the CareLink trend vocabulary.
    #[error("Unknown trend: {0:?}")]
    UnknownTrend(String),

    /// A pump-local clock rendering could not be parsed.
    #[error("Malformed timestamp: {value:?}")]
    MalformedTimestamp {
        /// The rejected input.
        value: String,
    },

    /// A UTC offset string is not of the form `+HHMM` / `-HHMM`.
    #[error("Invalid offset: {0:?}")]
    InvalidOffset(String),

    /// The inferred offset is outside the range a UTC offset can express.
    #[error("Offset of {hours} hours is out of range")]
    OffsetOutOfRange {
        /// Whole hours between pump clock and server clock.
        hours: i64,
    },
}

/// Result type alias using carelink-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

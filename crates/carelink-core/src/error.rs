//! Error types for carelink-core.
//!
//! The transform itself degrades instead of failing: stale data yields no
//! entries, an unreadable pump clock yields no glucose entries, and a reading
//! with an unreadable time is dropped. The errors below are what the
//! lower-level building blocks report, and what the JSON entry points return
//! when the snapshot document itself cannot be decoded.
//!
//! | Error | Where it surfaces | What the transform does |
//! |-------|-------------------|-------------------------|
//! | [`Error::Parse`] (`MalformedTimestamp`) | [`crate::OffsetGuesser::guess`] | Emits no glucose entries |
//! | [`Error::Parse`] (`OffsetOutOfRange`) | [`crate::OffsetGuesser::guess`] | Emits no glucose entries |
//! | [`Error::Parse`] (`UnknownTrend`) | [`crate::sgv::trend_annotation`] | Leaves the last entry unannotated |
//! | [`Error::Json`] | [`crate::Transformer::transform_json`] | Call fails |
//! | [`Error::InvalidConfig`] | parsing a [`crate::SgvLimit`] | Value rejected |

use thiserror::Error;

use carelink_types::ParseError;

/// Errors that can occur while transforming CareLink data.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Snapshot contents could not be interpreted.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The snapshot document is not valid JSON for a snapshot.
    #[error("Invalid snapshot document: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Result type alias using carelink-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

//! Glucose trend vocabulary.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Rate-of-change indicator for the freshest glucose reading.
///
/// Only the five keys CareLink reports in `lastSGTrend` that have a
/// Nightscout equivalent are represented; anything else is unmapped.
///
/// ```
/// use carelink_types::Trend;
///
/// let trend = Trend::from_carelink("UP").unwrap();
/// assert_eq!(trend.code(), 2);
/// assert_eq!(trend.direction(), "SingleUp");
/// assert_eq!(Trend::from_carelink("UP_TRIPLE"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Trend {
    /// No trend computed (`NONE`).
    NoTrend = 0,
    /// Rising quickly (`UP_DOUBLE`).
    DoubleUp = 1,
    /// Rising (`UP`).
    SingleUp = 2,
    /// Falling (`DOWN`).
    SingleDown = 6,
    /// Falling quickly (`DOWN_DOUBLE`).
    DoubleDown = 7,
}

impl Trend {
    /// Every mapped trend, in code order.
    pub const ALL: [Trend; 5] = [
        Trend::NoTrend,
        Trend::DoubleUp,
        Trend::SingleUp,
        Trend::SingleDown,
        Trend::DoubleDown,
    ];

    /// Look up a CareLink `lastSGTrend` key. Case-sensitive.
    #[must_use]
    pub fn from_carelink(key: &str) -> Option<Self> {
        match key {
            "NONE" => Some(Trend::NoTrend),
            "UP_DOUBLE" => Some(Trend::DoubleUp),
            "UP" => Some(Trend::SingleUp),
            "DOWN" => Some(Trend::SingleDown),
            "DOWN_DOUBLE" => Some(Trend::DoubleDown),
            _ => None,
        }
    }

    /// Look up a trend by its Nightscout code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Trend::ALL.into_iter().find(|trend| trend.code() == code)
    }

    /// Numeric Nightscout trend code.
    #[must_use]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Nightscout direction label.
    #[must_use]
    pub fn direction(&self) -> &'static str {
        match self {
            Trend::NoTrend => "NONE",
            Trend::DoubleUp => "DoubleUp",
            Trend::SingleUp => "SingleUp",
            Trend::SingleDown => "SingleDown",
            Trend::DoubleDown => "DoubleDown",
        }
    }

    /// The fields overlaid onto the freshest glucose entry.
    #[must_use]
    pub fn annotation(&self) -> TrendAnnotation {
        TrendAnnotation {
            trend: self.code(),
            direction: self.direction().to_string(),
        }
    }
}

impl FromStr for Trend {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Trend::from_carelink(s).ok_or_else(|| ParseError::UnknownTrend(s.to_string()))
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::NoTrend => write!(f, "-"),
            Trend::DoubleUp => write!(f, "\u{21c8}"),
            Trend::SingleUp => write!(f, "\u{2191}"),
            Trend::SingleDown => write!(f, "\u{2193}"),
            Trend::DoubleDown => write!(f, "\u{21ca}"),
        }
    }
}

/// `trend` / `direction` pair as it appears on a glucose entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrendAnnotation {
    /// Numeric trend code.
    pub trend: u8,
    /// Direction label.
    pub direction: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_codes() {
        assert_eq!(Trend::NoTrend.code(), 0);
        assert_eq!(Trend::DoubleUp.code(), 1);
        assert_eq!(Trend::SingleUp.code(), 2);
        assert_eq!(Trend::SingleDown.code(), 6);
        assert_eq!(Trend::DoubleDown.code(), 7);
    }

    #[test]
    fn test_vocabulary_directions() {
        assert_eq!(Trend::NoTrend.direction(), "NONE");
        assert_eq!(Trend::DoubleUp.direction(), "DoubleUp");
        assert_eq!(Trend::SingleUp.direction(), "SingleUp");
        assert_eq!(Trend::SingleDown.direction(), "SingleDown");
        assert_eq!(Trend::DoubleDown.direction(), "DoubleDown");
    }

    #[test]
    fn test_codes_map_back() {
        for trend in Trend::ALL {
            assert_eq!(Trend::from_code(trend.code()), Some(trend));
        }
        assert_eq!(Trend::from_code(3), None);
        assert_eq!(Trend::from_code(9), None);
    }

    #[test]
    fn test_display_arrows() {
        assert_eq!(Trend::NoTrend.to_string(), "-");
        assert_eq!(Trend::DoubleUp.to_string(), "\u{21c8}");
        assert_eq!(Trend::SingleUp.to_string(), "\u{2191}");
        assert_eq!(Trend::SingleDown.to_string(), "\u{2193}");
        assert_eq!(Trend::DoubleDown.to_string(), "\u{21ca}");
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(Trend::from_carelink("UP_TRIPLE"), None);
        assert_eq!(Trend::from_carelink("DOWN_TRIPLE"), None);
        assert_eq!(Trend::from_carelink("up"), None);
        assert_eq!(Trend::from_carelink(""), None);
    }

    #[test]
    fn test_from_str_reports_unknown_trend() {
        assert_eq!("DOWN".parse::<Trend>(), Ok(Trend::SingleDown));
        assert_eq!(
            "SIDEWAYS".parse::<Trend>(),
            Err(ParseError::UnknownTrend("SIDEWAYS".to_string()))
        );
    }

    #[test]
    fn test_annotation() {
        let annotation = Trend::SingleUp.annotation();
        assert_eq!(annotation.trend, 2);
        assert_eq!(annotation.direction, "SingleUp");
    }
}

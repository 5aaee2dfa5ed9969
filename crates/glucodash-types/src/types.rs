//! Core types for glucose feed data.

use core::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Lookback window for glucose reading queries.
///
/// The backend accepts exactly four windows; anything else is rejected with
/// an HTTP 400, so the client parses range strings strictly.
///
/// # Examples
///
/// ```
/// use glucodash_types::Range;
///
/// assert_eq!("3h".parse::<Range>(), Ok(Range::H3));
/// assert_eq!(Range::H24.to_string(), "24h");
/// assert_eq!(Range::H6.hours(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Range {
    /// Last 3 hours.
    H3,
    /// Last 6 hours.
    H6,
    /// Last 12 hours.
    #[default]
    H12,
    /// Last 24 hours.
    H24,
}

impl Range {
    /// All known ranges, in ascending order of span.
    pub const ALL: [Range; 4] = [Range::H3, Range::H6, Range::H12, Range::H24];

    /// The wire string used in the `range` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Range::H3 => "3h",
            Range::H6 => "6h",
            Range::H12 => "12h",
            Range::H24 => "24h",
        }
    }

    /// Human-readable label for UI selectors.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Range::H3 => "3 Hours",
            Range::H6 => "6 Hours",
            Range::H12 => "12 Hours",
            Range::H24 => "24 Hours",
        }
    }

    /// The span of the window in hours.
    #[must_use]
    pub fn hours(self) -> i64 {
        match self {
            Range::H3 => 3,
            Range::H6 => 6,
            Range::H12 => 12,
            Range::H24 => 24,
        }
    }

    /// The span of the window as a [`time::Duration`].
    #[must_use]
    pub fn span(self) -> time::Duration {
        time::Duration::hours(self.hours())
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Range {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "3h" => Ok(Range::H3),
            "6h" => Ok(Range::H6),
            "12h" => Ok(Range::H12),
            "24h" => Ok(Range::H24),
            other => Err(ParseError::UnknownRange(other.to_string())),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Range {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Range {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Provenance of a glucose response.
///
/// The backend tags each payload with where the readings came from. Unknown
/// tags map to [`DataSource::None`] so a new backend value degrades to the
/// "no data" presentation instead of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum DataSource {
    /// Live CGM feed (includes the sandbox-simulated live path).
    Live,
    /// Historical readings from a real device export.
    Historical,
    /// Synthetic demo data.
    Synthetic,
    /// No data available, or an unrecognized provenance tag.
    #[default]
    None,
}

impl DataSource {
    /// The canonical wire string for this source.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::Live => "dexcom",
            DataSource::Historical => "real_csv",
            DataSource::Synthetic => "synthetic",
            DataSource::None => "none",
        }
    }

    /// Human-readable label for provenance badges.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DataSource::Live => "Live CGM",
            DataSource::Historical => "Device export",
            DataSource::Synthetic => "Demo data",
            DataSource::None => "No data",
        }
    }

    /// Whether this source carries real (non-demo) readings.
    #[must_use]
    pub fn is_real(self) -> bool {
        matches!(self, DataSource::Live | DataSource::Historical)
    }
}

impl From<&str> for DataSource {
    fn from(value: &str) -> Self {
        match value {
            "dexcom" | "dexcom_simulated" => DataSource::Live,
            "real_csv" => DataSource::Historical,
            "synthetic" => DataSource::Synthetic,
            _ => DataSource::None,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "serde")]
impl Serialize for DataSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for DataSource {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(DataSource::from(s.as_str()))
    }
}

/// A single timestamped glucose reading.
///
/// Readings arrive ordered by timestamp ascending and are immutable once
/// received. `trend` is the feed's own hint and is carried verbatim: the
/// vocabulary is open-ended (real feeds emit values like `"stable"`,
/// `"unknown"`, or device-specific arrow names), so the dashboard derives
/// its own direction from values rather than trusting this field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlucoseReading {
    /// When the reading was captured.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub ts: time::OffsetDateTime,
    /// Glucose concentration in mg/dL.
    pub mgdl: u16,
    /// Optional trend hint from the feed.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub trend: Option<String>,
    /// Optional rate of change in mg/dL per minute.
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "trendRate", skip_serializing_if = "Option::is_none")
    )]
    pub trend_rate: Option<f64>,
}

impl GlucoseReading {
    /// Create a reading with no trend information.
    #[must_use]
    pub fn new(ts: time::OffsetDateTime, mgdl: u16) -> Self {
        Self {
            ts,
            mgdl,
            trend: None,
            trend_rate: None,
        }
    }

    /// Attach a trend hint.
    #[must_use]
    pub fn with_trend(mut self, trend: impl Into<String>) -> Self {
        self.trend = Some(trend.into());
        self
    }

    /// Attach a rate of change.
    #[must_use]
    pub fn with_trend_rate(mut self, rate: f64) -> Self {
        self.trend_rate = Some(rate);
        self
    }
}

//! Derived dashboard metrics.
//!
//! Everything here is a presentation derivation over the cached reading
//! sequences, recomputed on every render. The 24h aggregates always come
//! from the 24h sequence regardless of which range the chart is showing.

use time::OffsetDateTime;

use glucodash_types::GlucoseReading;

use crate::zones::{Zone, Zones};

/// Direction of change between the last two readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendDirection {
    /// Last reading is above the one before it.
    Rising,
    /// Last reading is below the one before it.
    Falling,
    /// Equal, or fewer than two readings.
    #[default]
    Stable,
}

impl TrendDirection {
    /// Arrow glyph for the trend card.
    #[must_use]
    pub fn arrow(self) -> &'static str {
        match self {
            TrendDirection::Rising => "↗",
            TrendDirection::Falling => "↘",
            TrendDirection::Stable => "→",
        }
    }

    /// Display label for the trend card.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TrendDirection::Rising => "Rising",
            TrendDirection::Falling => "Falling",
            TrendDirection::Stable => "Stable",
        }
    }
}

/// Metrics shown on the dashboard stat cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    /// Last reading of the active range, if any.
    pub current: Option<u16>,
    /// Zone of the current reading.
    pub zone: Option<Zone>,
    /// Arithmetic mean over the 24h sequence, rounded for display.
    pub average_24h: Option<u16>,
    /// Maximum over the 24h sequence.
    pub high_24h: Option<u16>,
    /// Minimum over the 24h sequence.
    pub low_24h: Option<u16>,
    /// Direction of the last two readings of the active range.
    pub direction: TrendDirection,
    /// "Just now" / "N min ago" / "Hh Mm ago", if any readings exist.
    pub recency: Option<String>,
}

impl DashboardStats {
    /// Derive all dashboard metrics.
    ///
    /// `active` is the sequence for the currently displayed range; `day` is
    /// whatever is loaded for the 24h range (possibly the same slice).
    #[must_use]
    pub fn derive(
        active: &[GlucoseReading],
        day: &[GlucoseReading],
        now: OffsetDateTime,
        zones: &Zones,
    ) -> Self {
        let current = active.last().map(|r| r.mgdl);
        Self {
            current,
            zone: current.map(|v| zones.evaluate(v)),
            average_24h: mean_mgdl(day),
            high_24h: day.iter().map(|r| r.mgdl).max(),
            low_24h: day.iter().map(|r| r.mgdl).min(),
            direction: trend_direction(active),
            recency: active.last().map(|r| time_since(now, r.ts)),
        }
    }
}

/// Mean mg/dL rounded to the nearest integer, `None` for an empty sequence.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn mean_mgdl(readings: &[GlucoseReading]) -> Option<u16> {
    if readings.is_empty() {
        return None;
    }
    let sum: u64 = readings.iter().map(|r| u64::from(r.mgdl)).sum();
    let mean = sum as f64 / readings.len() as f64;
    Some(mean.round() as u16)
}

/// Compare the last two readings. Fewer than two readings is Stable.
#[must_use]
pub fn trend_direction(readings: &[GlucoseReading]) -> TrendDirection {
    match readings {
        [.., previous, last] => {
            if last.mgdl > previous.mgdl {
                TrendDirection::Rising
            } else if last.mgdl < previous.mgdl {
                TrendDirection::Falling
            } else {
                TrendDirection::Stable
            }
        }
        _ => TrendDirection::Stable,
    }
}

/// Format the time since a reading was captured.
///
/// Under a minute is "Just now", under an hour "N min ago", anything longer
/// "Hh Mm ago". A reading from the future (clock skew) reads as "Just now".
#[must_use]
pub fn time_since(now: OffsetDateTime, ts: OffsetDateTime) -> String {
    let minutes = (now - ts).whole_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} min ago", minutes)
    } else {
        format!("{}h {}m ago", minutes / 60, minutes % 60)
    }
}

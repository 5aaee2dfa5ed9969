//! Chart model for the glucose trend line.
//!
//! [`ChartModel::build`] is a pure function of the reading sequence: it maps
//! readings onto plot coordinates, fixes the axis bounds and reference
//! levels, and derives the first-vs-last trend caption. Rendering is left to
//! the UI layer.

use time::OffsetDateTime;
use time::macros::format_description;

use glucodash_types::GlucoseReading;

use crate::stats::TrendDirection;

/// Low-glucose warning level, drawn as a fixed marker line.
pub const LOW_ALERT_MGDL: u16 = 55;

/// Target band, drawn as a shaded region when requested.
pub const TARGET_RANGE: std::ops::RangeInclusive<u16> = 70..=180;

/// Fixed y-axis bounds in mg/dL.
pub const Y_BOUNDS: [f64; 2] = [40.0, 400.0];

/// Fixed y-axis tick levels.
pub const Y_TICKS: [u16; 5] = [55, 100, 200, 300, 400];

/// First-vs-last trend caption for the chart footer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrendCaption {
    /// Percentage change from the first to the last reading, one decimal.
    pub percent: f64,
}

impl TrendCaption {
    /// Compute the caption: `(last - first) / first * 100`, or 0.0 when the
    /// sequence has fewer than 2 points or starts at zero.
    #[must_use]
    pub fn from_readings(readings: &[GlucoseReading]) -> Self {
        let (Some(first), Some(last)) = (readings.first(), readings.last()) else {
            return Self::default();
        };
        if readings.len() < 2 || first.mgdl == 0 {
            return Self::default();
        }
        let raw =
            (f64::from(last.mgdl) - f64::from(first.mgdl)) / f64::from(first.mgdl) * 100.0;
        Self {
            percent: (raw * 10.0).round() / 10.0,
        }
    }

    /// Direction implied by the sign of the percentage.
    #[must_use]
    pub fn direction(&self) -> TrendDirection {
        if self.percent > 0.0 {
            TrendDirection::Rising
        } else if self.percent < 0.0 {
            TrendDirection::Falling
        } else {
            TrendDirection::Stable
        }
    }

    /// Footer text, e.g. "Trending up by 25.0%".
    #[must_use]
    pub fn label(&self) -> String {
        match self.direction() {
            TrendDirection::Rising => format!("Trending up by {:.1}%", self.percent.abs()),
            TrendDirection::Falling => format!("Trending down by {:.1}%", self.percent.abs()),
            TrendDirection::Stable => "Flat".to_string(),
        }
    }
}

/// Everything the UI needs to draw the trend chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    /// Plot points as (seconds since the first reading, mg/dL).
    pub points: Vec<(f64, f64)>,
    /// X-axis bounds in seconds since the first reading.
    pub x_bounds: [f64; 2],
    /// HH:MM labels for the first, middle, and last readings.
    pub x_labels: Vec<String>,
    /// Target band as (low, high), when enabled.
    pub target_band: Option<(f64, f64)>,
    /// The low-glucose marker level.
    pub low_marker: f64,
    /// First-vs-last trend caption.
    pub trend: TrendCaption,
    /// Date span of the sequence, e.g. "Mar 1, 2025 - Mar 2, 2025".
    pub span_label: Option<String>,
}

impl ChartModel {
    /// Build the chart model for a reading sequence.
    #[must_use]
    pub fn build(readings: &[GlucoseReading], show_target_band: bool) -> Self {
        let origin = readings.first().map(|r| r.ts);
        let points: Vec<(f64, f64)> = readings
            .iter()
            .map(|r| {
                let offset = origin.map_or(0.0, |t0| (r.ts - t0).as_seconds_f64());
                (offset, f64::from(r.mgdl))
            })
            .collect();

        let last_offset = points.last().map_or(0.0, |p| p.0);
        let x_bounds = [0.0, last_offset.max(1.0)];

        let x_labels = match readings {
            [] => Vec::new(),
            [only] => vec![format_hm(only.ts)],
            _ => {
                let mid = &readings[readings.len() / 2];
                vec![
                    format_hm(readings[0].ts),
                    format_hm(mid.ts),
                    format_hm(readings[readings.len() - 1].ts),
                ]
            }
        };

        let span_label = match (readings.first(), readings.last()) {
            (Some(first), Some(last)) => {
                Some(format!("{} - {}", format_date(first.ts), format_date(last.ts)))
            }
            _ => None,
        };

        Self {
            points,
            x_bounds,
            x_labels,
            target_band: show_target_band.then(|| {
                (
                    f64::from(*TARGET_RANGE.start()),
                    f64::from(*TARGET_RANGE.end()),
                )
            }),
            low_marker: f64::from(LOW_ALERT_MGDL),
            trend: TrendCaption::from_readings(readings),
            span_label,
        }
    }

    /// Whether there is anything to plot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn format_hm(ts: OffsetDateTime) -> String {
    ts.format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| String::from("--:--"))
}

fn format_date(ts: OffsetDateTime) -> String {
    ts.format(format_description!("[month repr:short] [day padding:none], [year]"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use time::Duration;
    use time::macros::datetime;

    fn seq(values: &[u16]) -> Vec<GlucoseReading> {
        let t0 = datetime!(2025-03-01 08:00 UTC);
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| GlucoseReading::new(t0 + Duration::minutes(5 * i as i64), v))
            .collect()
    }

    #[test]
    fn test_trend_caption_scenario() {
        // [{t0,120},{t0+5m,150}] -> +25.0%, rising.
        let caption = TrendCaption::from_readings(&seq(&[120, 150]));
        assert_eq!(caption.percent, 25.0);
        assert_eq!(caption.direction(), TrendDirection::Rising);
        assert_eq!(caption.label(), "Trending up by 25.0%");
    }

    #[test]
    fn test_trend_caption_falling() {
        let caption = TrendCaption::from_readings(&seq(&[200, 150]));
        assert_eq!(caption.percent, -25.0);
        assert_eq!(caption.direction(), TrendDirection::Falling);
        assert_eq!(caption.label(), "Trending down by 25.0%");
    }

    #[test]
    fn test_trend_caption_short_or_zero_sequences_are_flat() {
        assert_eq!(TrendCaption::from_readings(&[]).percent, 0.0);
        assert_eq!(TrendCaption::from_readings(&seq(&[120])).percent, 0.0);
        // A zero first value cannot anchor a percentage.
        let caption = TrendCaption::from_readings(&seq(&[0, 150]));
        assert_eq!(caption.percent, 0.0);
        assert_eq!(caption.direction(), TrendDirection::Stable);
        assert_eq!(caption.label(), "Flat");
    }

    #[test]
    fn test_trend_caption_one_decimal() {
        // (100 -> 103.3): +3.3%
        let caption = TrendCaption::from_readings(&seq(&[300, 310]));
        assert_eq!(caption.percent, 3.3);
    }

    #[test]
    fn test_build_points_and_bounds() {
        let model = ChartModel::build(&seq(&[120, 150, 140]), true);
        assert_eq!(model.points.len(), 3);
        assert_eq!(model.points[0], (0.0, 120.0));
        assert_eq!(model.points[1], (300.0, 150.0));
        assert_eq!(model.x_bounds, [0.0, 600.0]);
        assert_eq!(model.target_band, Some((70.0, 180.0)));
        assert_eq!(model.low_marker, 55.0);
    }

    #[test]
    fn test_build_without_target_band() {
        let model = ChartModel::build(&seq(&[120, 150]), false);
        assert_eq!(model.target_band, None);
    }

    #[test]
    fn test_build_empty() {
        let model = ChartModel::build(&[], true);
        assert!(model.is_empty());
        assert!(model.x_labels.is_empty());
        assert_eq!(model.span_label, None);
        assert_eq!(model.trend.percent, 0.0);
        // Bounds stay non-degenerate for the axis widget.
        assert_eq!(model.x_bounds, [0.0, 1.0]);
    }

    #[test]
    fn test_x_labels_hm() {
        let model = ChartModel::build(&seq(&[120, 130, 140]), false);
        assert_eq!(model.x_labels, vec!["08:00", "08:05", "08:10"]);
    }

    #[test]
    fn test_span_label() {
        let model = ChartModel::build(&seq(&[120, 150]), false);
        assert_eq!(
            model.span_label.as_deref(),
            Some("Mar 1, 2025 - Mar 1, 2025")
        );
    }

    proptest! {
        #[test]
        fn caption_sign_matches_value_delta(
            first in 1u16..=400,
            last in 0u16..=400,
        ) {
            let caption = TrendCaption::from_readings(&seq(&[first, last]));
            let expected = (f64::from(last) - f64::from(first)).signum();
            if (f64::from(last) - f64::from(first)).abs() / f64::from(first) >= 0.0005 {
                prop_assert_eq!(caption.percent.signum(), expected);
            }
        }
    }
}

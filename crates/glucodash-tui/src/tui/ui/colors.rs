//! Value-to-color mappings for readings, zones, and provenance badges.

use ratatui::style::Color;

use glucodash_core::stats::TrendDirection;
use glucodash_core::zones::Zone;
use glucodash_types::DataSource;

use super::theme::AppTheme;

/// Color for a glucose zone badge.
pub fn zone_color(zone: Zone, theme: &AppTheme) -> Color {
    match zone {
        Zone::Low => theme.danger,
        Zone::Normal => theme.success,
        Zone::Elevated => theme.warning,
        Zone::High => theme.danger,
    }
}

/// Color for the provenance badge: real sources read calm, demo data amber.
pub fn source_color(source: DataSource, theme: &AppTheme) -> Color {
    match source {
        DataSource::Live => theme.success,
        DataSource::Historical => theme.primary,
        DataSource::Synthetic | DataSource::None => theme.warning,
        _ => theme.warning,
    }
}

/// Color for the chart trend caption.
pub fn trend_color(direction: TrendDirection, theme: &AppTheme) -> Color {
    match direction {
        TrendDirection::Rising => theme.success,
        TrendDirection::Falling => theme.danger,
        TrendDirection::Stable => theme.text_secondary,
    }
}

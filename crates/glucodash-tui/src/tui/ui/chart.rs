//! Trend chart rendering.
//!
//! Turns the pure [`ChartModel`] into a ratatui `Chart`: the glucose trace,
//! the fixed 55 mg/dL low marker, and the optional 70-180 target band drawn
//! as a pair of dashed boundary lines.

use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};

use glucodash_core::chart::{ChartModel, Y_BOUNDS, Y_TICKS};

use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::App;

/// Draw the chart for the active range. The caller guarantees an entry is
/// loaded for it.
pub(super) fn draw_chart(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let Some(entry) = app.active_entry() else {
        return;
    };
    let model = ChartModel::build(&entry.readings, app.show_target_band);

    let [x0, x1] = model.x_bounds;
    let low_line = [(x0, model.low_marker), (x1, model.low_marker)];
    let band_lines = model
        .target_band
        .map(|(low, high)| ([(x0, low), (x1, low)], [(x0, high), (x1, high)]));

    let mut datasets = Vec::new();
    if let Some((band_low, band_high)) = &band_lines {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.success))
                .data(band_low),
        );
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.success))
                .data(band_high),
        );
    }
    datasets.push(
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.danger))
            .data(&low_line),
    );
    datasets.push(
        Dataset::default()
            .name("mg/dL")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.primary))
            .data(&model.points),
    );

    let x_labels: Vec<Span> = model
        .x_labels
        .iter()
        .map(|label| Span::styled(label.clone(), Style::default().fg(theme.text_muted)))
        .collect();
    let y_labels: Vec<Span> = Y_TICKS
        .iter()
        .map(|tick| Span::styled(tick.to_string(), Style::default().fg(theme.text_muted)))
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" Glucose Trend ({}) ", app.active_range.label()))
                .title_style(theme.title_style())
                .borders(Borders::ALL)
                .border_type(BORDER_TYPE)
                .border_style(theme.border_active_style()),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.border_inactive))
                .bounds(model.x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.border_inactive))
                .bounds(Y_BOUNDS)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

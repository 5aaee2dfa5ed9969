//! Dashboard tab: stat cards, range selector, and the trend chart.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use glucodash_types::Range;

use super::chart;
use super::colors::{source_color, trend_color, zone_color};
use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::App;

/// Create a bordered stat card with a value-colored border.
fn reading_card(
    title: &str,
    value: &str,
    color: Color,
    caption: Option<(&str, Color)>,
    theme: &AppTheme,
) -> Paragraph<'static> {
    let mut spans = vec![Span::styled(
        value.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];

    if let Some((caption_str, caption_color)) = caption {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            caption_str.to_string(),
            Style::default().fg(caption_color),
        ));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BORDER_TYPE)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", title))
                .title_style(Style::default().fg(theme.text_primary)),
        )
}

/// Draw the dashboard tab.
pub(super) fn draw(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // stat cards
            Constraint::Length(1), // range selector + source badge
            Constraint::Min(8),    // chart
            Constraint::Length(1), // trend caption footer
        ])
        .split(area);

    draw_stat_cards(frame, rows[0], app, theme);
    draw_range_selector(frame, rows[1], app, theme);
    draw_chart_area(frame, rows[2], app, theme);
    draw_chart_footer(frame, rows[3], app, theme);
}

fn draw_stat_cards(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let stats = app.stats(time::OffsetDateTime::now_utc());

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(24),
            Constraint::Percentage(19),
            Constraint::Percentage(19),
            Constraint::Percentage(19),
            Constraint::Percentage(19),
        ])
        .split(area);

    // Current value with its zone badge
    let (value, color, zone) = match (stats.current, stats.zone) {
        (Some(v), Some(zone)) => (
            format!("{} mg/dL", v),
            zone_color(zone, theme),
            Some((zone.label(), zone_color(zone, theme))),
        ),
        _ => ("--".to_string(), theme.text_muted, None),
    };
    frame.render_widget(reading_card("Current", &value, color, zone, theme), cols[0]);

    let avg = stats
        .average_24h
        .map_or("--".to_string(), |v| format!("{} mg/dL", v));
    frame.render_widget(
        reading_card("24h Average", &avg, theme.primary, None, theme),
        cols[1],
    );

    let high_low = match (stats.high_24h, stats.low_24h) {
        (Some(high), Some(low)) => format!("{} / {}", high, low),
        _ => "--".to_string(),
    };
    frame.render_widget(
        reading_card("24h High/Low", &high_low, theme.info, None, theme),
        cols[2],
    );

    let trend = format!("{} {}", stats.direction.arrow(), stats.direction.label());
    frame.render_widget(
        reading_card(
            "Trend",
            &trend,
            trend_color(stats.direction, theme),
            None,
            theme,
        ),
        cols[3],
    );

    let updated = stats.recency.unwrap_or_else(|| "--".to_string());
    frame.render_widget(
        reading_card("Updated", &updated, theme.text_secondary, None, theme),
        cols[4],
    );
}

fn draw_range_selector(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let mut spans = vec![Span::styled(
        " Range: ",
        Style::default().fg(theme.text_muted),
    )];
    for range in Range::ALL {
        if range == app.active_range {
            spans.push(Span::styled(
                format!("[{}]", range),
                theme.selected_style(),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {} ", range),
                Style::default().fg(theme.text_secondary),
            ));
        }
        spans.push(Span::raw(" "));
    }

    if let Some(entry) = app.active_entry() {
        spans.push(Span::styled(
            format!("  {}", entry.source.label()),
            Style::default().fg(source_color(entry.source, theme)),
        ));
        if !entry.is_fresh() {
            spans.push(Span::styled(
                format!("  {} refreshing", app.spinner_char()),
                Style::default().fg(theme.text_muted),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_chart_area(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    if app.active_entry().is_some() {
        chart::draw_chart(frame, area, app, theme);
        return;
    }

    let block = Block::default()
        .title(format!(" Glucose Trend ({}) ", app.active_range.label()))
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_inactive_style());

    let lines = if app.loading == Some(app.active_range) {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} Loading glucose data...", app.spinner_char()),
                Style::default().fg(theme.text_muted),
            )),
        ]
    } else if let Some(error) = &app.fetch_error {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Failed to load glucose data",
                Style::default().fg(theme.danger).bold(),
            )),
            Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme.text_muted),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(theme.text_muted)),
                Span::styled("r", theme.title_style()),
                Span::styled(" to retry", Style::default().fg(theme.text_muted)),
            ]),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "No data available",
                Style::default().fg(theme.text_muted),
            )),
        ]
    };

    let msg = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(msg, area);
}

fn draw_chart_footer(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let Some(entry) = app.active_entry() else {
        return;
    };
    let model = glucodash_core::chart::ChartModel::build(&entry.readings, app.show_target_band);

    let direction = model.trend.direction();
    let mut spans = vec![Span::styled(
        format!(" {} {}", direction.arrow(), model.trend.label()),
        Style::default().fg(trend_color(direction, theme)),
    )];
    if let Some(span_label) = &model.span_label {
        spans.push(Span::styled(
            format!("  {}", span_label),
            Style::default().fg(theme.text_muted),
        ));
    }
    if app.fetch_error.is_some() {
        spans.push(Span::styled(
            "  (refresh failed, showing cached data)",
            Style::default().fg(theme.warning),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

//! UI rendering for the TUI dashboard.
//!
//! The layout is a tab bar, an optional banner line, the active tab's body,
//! and a one-line key hint footer.

pub mod chart;
pub mod chat;
pub mod colors;
pub mod dashboard;
pub mod settings;
pub mod theme;

use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Tabs};

use super::app::{App, BannerKind, Tab};
use theme::AppTheme;

/// Draw the whole UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let theme = AppTheme::default();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tab bar
            Constraint::Length(1), // banner (blank when none)
            Constraint::Min(0),    // body
            Constraint::Length(1), // key hints
        ])
        .split(frame.area());

    draw_tab_bar(frame, rows[0], app, &theme);
    draw_banner(frame, rows[1], app, &theme);

    match app.tab {
        Tab::Dashboard => dashboard::draw(frame, rows[2], app, &theme),
        Tab::Chat => chat::draw(frame, rows[2], app, &theme),
        Tab::Settings => settings::draw(frame, rows[2], app, &theme),
    }

    draw_hints(frame, rows[3], app, &theme);
}

fn draw_tab_bar(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.title())))
        .collect();
    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme.text_secondary))
        .highlight_style(theme.selected_style())
        .divider("|");
    frame.render_widget(tabs, area);
}

fn draw_banner(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let Some(banner) = &app.banner else {
        return;
    };
    let (color, icon) = match banner.kind {
        BannerKind::Success => (theme.success, "[ok]"),
        BannerKind::Error => (theme.danger, "[!]"),
        BannerKind::Info => (theme.info, "[i]"),
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", icon), Style::default().fg(color).bold()),
        Span::styled(banner.text.clone(), Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_hints(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let hints = if app.editing {
        " Enter submit | Esc cancel"
    } else {
        match app.tab {
            Tab::Dashboard => " q quit | Tab switch | 1-4 range | r refresh | t band",
            Tab::Chat => " q quit | Tab switch | i type | 1-4 insights | Esc stop",
            Tab::Settings => " q quit | Tab switch | c connect | d disconnect | i paste | s status",
        }
    };
    let para = Paragraph::new(hints).style(Style::default().fg(theme.text_muted));
    frame.render_widget(para, area);
}

//! Settings tab: CGM account connection panel.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use time::macros::format_description;

use glucodash_core::connect::LinkState;

use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::App;

/// Draw the settings tab.
pub(super) fn draw(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // connection panel
            Constraint::Length(3), // callback paste box
        ])
        .split(area);

    draw_connection_panel(frame, rows[0], app, theme);
    draw_callback_input(frame, rows[1], app, theme);
}

fn draw_connection_panel(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let block = Block::default()
        .title(" Dexcom Connection ")
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_active_style());

    let state_color = match &app.link {
        LinkState::Connected { .. } => theme.success,
        LinkState::Error(_) => theme.danger,
        LinkState::Disconnected => theme.text_muted,
        _ => theme.warning,
    };

    let state_label = if app.link.is_busy() {
        format!("{} {}", app.spinner_char(), app.link.label())
    } else {
        app.link.label()
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Status: ", Style::default().fg(theme.text_muted)),
            Span::styled(state_label, Style::default().fg(state_color).bold()),
        ]),
    ];

    if let Some(username) = &app.username {
        lines.push(Line::from(vec![
            Span::styled("  Account: ", Style::default().fg(theme.text_muted)),
            Span::styled(username.clone(), Style::default().fg(theme.text_primary)),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("  Token valid: ", Style::default().fg(theme.text_muted)),
        Span::styled(
            if app.status.token_valid { "yes" } else { "no" },
            Style::default().fg(if app.status.token_valid {
                theme.success
            } else {
                theme.text_secondary
            }),
        ),
    ]));

    if let Some(expires_at) = app.status.expires_at {
        let formatted = expires_at
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute] UTC"
            ))
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled("  Token expires: ", Style::default().fg(theme.text_muted)),
            Span::styled(formatted, Style::default().fg(theme.text_secondary)),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("  Session user: ", Style::default().fg(theme.text_muted)),
        Span::styled(app.user_id.clone(), Style::default().fg(theme.text_secondary)),
    ]));

    if let Some(error) = &app.status_error {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Status check failed: ", Style::default().fg(theme.danger)),
            Span::styled(error.clone(), Style::default().fg(theme.text_muted)),
        ]));
    }

    if let Some(url) = &app.auth_url {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  If the browser did not open, authorize here:",
            Style::default().fg(theme.text_muted),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", url),
            Style::default().fg(theme.info),
        )));
        lines.push(Line::from(Span::styled(
            "  Then paste the redirect URL below and press Enter.",
            Style::default().fg(theme.text_muted),
        )));
    } else {
        lines.push(Line::from(""));
        let hint = if app.link.is_connected() {
            "  Press d to disconnect this account."
        } else {
            "  Press c to connect your Dexcom account."
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(theme.text_muted),
        )));
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(para, area);
}

fn draw_callback_input(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let awaiting = app.link == LinkState::AwaitingCallback;
    let border_style = if app.editing && awaiting {
        theme.border_active_style()
    } else {
        theme.border_inactive_style()
    };

    let content = if app.editing || !app.input.is_empty() {
        Line::from(vec![
            Span::styled(app.input.clone(), Style::default().fg(theme.text_primary)),
            Span::styled(
                if app.editing { "_" } else { "" },
                Style::default().fg(theme.primary),
            ),
        ])
    } else if awaiting {
        Line::from(Span::styled(
            "press i, then paste the redirect URL",
            Style::default().fg(theme.text_muted),
        ))
    } else {
        Line::from(Span::styled(
            "(used during the connect flow)",
            Style::default().fg(theme.text_muted),
        ))
    };

    let input = Paragraph::new(content).block(
        Block::default()
            .title(" Redirect URL ")
            .title_style(Style::default().fg(theme.text_secondary))
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(border_style),
    );
    frame.render_widget(input, area);
}

//! Assistant tab: transcript, quick-insight shortcuts, and the input box.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use glucodash_core::chat::{ChatRole, QuickInsight};

use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::App;

/// Draw the chat tab.
pub(super) fn draw(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // quick insights
            Constraint::Min(4),    // transcript
            Constraint::Length(3), // input box
        ])
        .split(area);

    draw_insights(frame, rows[0], app, theme);
    draw_transcript(frame, rows[1], app, theme);
    draw_input(frame, rows[2], app, theme);
}

fn draw_insights(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let mut spans = vec![Span::styled(
        " Quick insights: ",
        Style::default().fg(theme.text_muted),
    )];
    for (i, insight) in QuickInsight::ALL.iter().enumerate() {
        spans.push(Span::styled(
            format!("{}", i + 1),
            theme.title_style(),
        ));
        spans.push(Span::styled(
            format!(" {}  ", insight.label()),
            Style::default().fg(theme.text_secondary),
        ));
    }
    if app.transcript.is_pending() {
        spans.push(Span::styled(
            format!(" {} thinking...", app.spinner_char()),
            Style::default().fg(theme.warning),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_transcript(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let block = Block::default()
        .title(" Health Assistant ")
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_inactive_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for message in app.transcript.messages() {
        let (who, color) = match message.role {
            ChatRole::User => ("You", theme.info),
            ChatRole::Assistant => ("Assistant", theme.success),
        };
        let mut spans = vec![
            Span::styled(format!("{}: ", who), Style::default().fg(color).bold()),
            Span::styled(
                message.content.clone(),
                Style::default().fg(theme.text_primary),
            ),
        ];
        if message.streaming {
            spans.push(Span::styled("▌", Style::default().fg(theme.success)));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    // Keep the tail of the conversation in view.
    let height = inner.height as usize;
    let scroll = lines.len().saturating_sub(height);
    #[allow(clippy::cast_possible_truncation)]
    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    frame.render_widget(para, inner);
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let (border_style, hint) = if app.editing {
        (theme.border_active_style(), "")
    } else {
        (theme.border_inactive_style(), "press i to type")
    };

    let content = if app.editing || !app.input.is_empty() {
        Line::from(vec![
            Span::styled(app.input.clone(), Style::default().fg(theme.text_primary)),
            Span::styled(
                if app.editing { "_" } else { "" },
                Style::default().fg(theme.primary),
            ),
        ])
    } else {
        Line::from(Span::styled(hint, Style::default().fg(theme.text_muted)))
    };

    let input = Paragraph::new(content).block(
        Block::default()
            .title(" Message ")
            .title_style(Style::default().fg(theme.text_secondary))
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(border_style),
    );
    frame.render_widget(input, area);
}

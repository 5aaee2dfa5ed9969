//! Keyboard input handling for the TUI.
//!
//! This module translates keyboard events into high-level actions and
//! applies those actions to the application state, returning the backend
//! command to issue (if any).
//!
//! # Key Bindings
//!
//! | Key       | Action                         |
//! |-----------|--------------------------------|
//! | `q`       | Quit                           |
//! | `1`-`4`   | Select range (quick insights on the chat tab) |
//! | `r`       | Refresh active range           |
//! | `p`       | Prefetch all ranges            |
//! | `t`       | Toggle target band             |
//! | `Tab` / `l` | Next tab                     |
//! | `BackTab` / `h` | Previous tab             |
//! | `c`       | Connect account                |
//! | `d`       | Disconnect account             |
//! | `s`       | Refresh connection status      |
//! | `i` / `/` | Edit input (chat / callback)   |
//! | `Esc`     | Stop stream / dismiss banner   |

use crossterm::event::KeyCode;

use glucodash_core::chat::QuickInsight;
use glucodash_core::connect::LinkState;
use glucodash_core::messages::Command;
use glucodash_types::Range;

use super::app::{App, Tab};

/// User actions that can be triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Switch to the next tab.
    NextTab,
    /// Switch to the previous tab.
    PreviousTab,
    /// Show a different range on the chart.
    SelectRange(Range),
    /// Refresh the active range.
    Refresh,
    /// Warm the cache for all ranges.
    PrefetchAll,
    /// Toggle the target-band shading.
    ToggleTargetBand,
    /// Start the account connect flow.
    Connect,
    /// Unlink the account.
    Disconnect,
    /// Re-poll the connection status.
    RefreshStatus,
    /// Start editing the text input.
    EditInput,
    /// Input character for text input.
    TextInput(char),
    /// Backspace for text input.
    TextBackspace,
    /// Submit text input.
    TextSubmit,
    /// Cancel text input.
    TextCancel,
    /// Send a canned quick-insight prompt.
    Insight(QuickInsight),
    /// Escape: stop the stream or dismiss the banner.
    Escape,
    /// No action (unrecognized key).
    None,
}

/// Map a key code to an action.
///
/// # Arguments
///
/// * `key` - The key code from a keyboard event
/// * `editing_text` - Whether the user is currently editing text input
/// * `on_chat_tab` - Whether the chat tab is active (digits become insights)
pub fn handle_key(key: KeyCode, editing_text: bool, on_chat_tab: bool) -> Action {
    // If editing text, handle text input specially
    if editing_text {
        return match key {
            KeyCode::Enter => Action::TextSubmit,
            KeyCode::Esc => Action::TextCancel,
            KeyCode::Backspace => Action::TextBackspace,
            KeyCode::Char(c) => Action::TextInput(c),
            _ => Action::None,
        };
    }

    match key {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Tab | KeyCode::Char('l') => Action::NextTab,
        KeyCode::BackTab | KeyCode::Char('h') => Action::PreviousTab,
        KeyCode::Char('1') if on_chat_tab => Action::Insight(QuickInsight::DailySummary),
        KeyCode::Char('2') if on_chat_tab => Action::Insight(QuickInsight::TrendAnalysis),
        KeyCode::Char('3') if on_chat_tab => Action::Insight(QuickInsight::PatternReview),
        KeyCode::Char('4') if on_chat_tab => Action::Insight(QuickInsight::Recommendations),
        KeyCode::Char('1') => Action::SelectRange(Range::H3),
        KeyCode::Char('2') => Action::SelectRange(Range::H6),
        KeyCode::Char('3') => Action::SelectRange(Range::H12),
        KeyCode::Char('4') => Action::SelectRange(Range::H24),
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('p') => Action::PrefetchAll,
        KeyCode::Char('t') => Action::ToggleTargetBand,
        KeyCode::Char('c') => Action::Connect,
        KeyCode::Char('d') => Action::Disconnect,
        KeyCode::Char('s') => Action::RefreshStatus,
        KeyCode::Char('i') | KeyCode::Char('/') => Action::EditInput,
        KeyCode::Esc => Action::Escape,
        _ => Action::None,
    }
}

/// Apply an action to the application state.
///
/// Returns the command to send to the worker, if the action requires one.
pub fn apply_action(app: &mut App, action: Action) -> Option<Command> {
    match action {
        Action::Quit => {
            app.quit();
            None
        }
        Action::NextTab => {
            app.tab = app.tab.next();
            app.editing = false;
            // Status is re-polled whenever the settings view is shown.
            (app.tab == Tab::Settings).then_some(Command::RefreshStatus)
        }
        Action::PreviousTab => {
            app.tab = app.tab.previous();
            app.editing = false;
            (app.tab == Tab::Settings).then_some(Command::RefreshStatus)
        }
        Action::SelectRange(range) => app.select_range(range),
        Action::Refresh => {
            let range = app.active_range;
            if app.active_entry().is_none() {
                app.loading = Some(range);
            }
            Some(Command::FetchReadings { range })
        }
        Action::PrefetchAll => Some(Command::PrefetchAll),
        Action::ToggleTargetBand => {
            app.show_target_band = !app.show_target_band;
            None
        }
        Action::Connect => {
            // Disabled-button guard: one flow at a time.
            if app.link.is_busy() || app.link.is_connected() {
                return None;
            }
            app.link = LinkState::Connecting;
            Some(Command::BeginConnect)
        }
        Action::Disconnect => {
            if app.link.is_busy() || !app.link.is_connected() {
                return None;
            }
            app.link = LinkState::Disconnecting;
            Some(Command::Disconnect)
        }
        Action::RefreshStatus => Some(Command::RefreshStatus),
        Action::EditInput => {
            if matches!(app.tab, Tab::Chat | Tab::Settings) {
                app.editing = true;
            }
            None
        }
        Action::TextInput(c) => {
            app.input.push(c);
            None
        }
        Action::TextBackspace => {
            app.input.pop();
            None
        }
        Action::TextSubmit => submit_input(app),
        Action::TextCancel => {
            app.editing = false;
            None
        }
        Action::Insight(insight) => {
            let text = app.transcript.prepare_send(insight.prompt())?;
            Some(Command::SendChat { text })
        }
        Action::Escape => {
            if app.transcript.is_pending() {
                // Freeze locally right away; the worker kills the timer.
                app.transcript.stop();
                Some(Command::StopChat)
            } else {
                app.banner = None;
                None
            }
        }
        Action::None => None,
    }
}

/// Route a submitted input buffer to the chat or the callback exchange.
fn submit_input(app: &mut App) -> Option<Command> {
    app.editing = false;
    match app.tab {
        Tab::Settings => {
            if app.link != LinkState::AwaitingCallback || app.input.trim().is_empty() {
                return None;
            }
            // Consume the pasted redirect; the query parameters never stay
            // visible anywhere.
            let pasted = std::mem::take(&mut app.input);
            Some(Command::CompleteCallback { pasted })
        }
        _ => {
            let text = app.transcript.prepare_send(&app.input)?;
            app.input.clear();
            Some(Command::SendChat { text })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glucodash_core::messages::AppEvent;
    use tokio::sync::mpsc;

    use crate::config::Config;

    fn test_app() -> App {
        let (_tx, rx) = mpsc::channel(8);
        App::new(&Config::default(), rx)
    }

    #[test]
    fn test_handle_key_quit() {
        assert_eq!(handle_key(KeyCode::Char('q'), false, false), Action::Quit);
    }

    #[test]
    fn test_handle_key_ranges() {
        assert_eq!(
            handle_key(KeyCode::Char('1'), false, false),
            Action::SelectRange(Range::H3)
        );
        assert_eq!(
            handle_key(KeyCode::Char('4'), false, false),
            Action::SelectRange(Range::H24)
        );
    }

    #[test]
    fn test_handle_key_digits_on_chat_tab_are_insights() {
        assert_eq!(
            handle_key(KeyCode::Char('1'), false, true),
            Action::Insight(QuickInsight::DailySummary)
        );
        assert_eq!(
            handle_key(KeyCode::Char('4'), false, true),
            Action::Insight(QuickInsight::Recommendations)
        );
    }

    #[test]
    fn test_handle_key_editing_captures_text() {
        assert_eq!(
            handle_key(KeyCode::Char('q'), true, false),
            Action::TextInput('q')
        );
        assert_eq!(handle_key(KeyCode::Enter, true, false), Action::TextSubmit);
        assert_eq!(handle_key(KeyCode::Esc, true, false), Action::TextCancel);
        assert_eq!(
            handle_key(KeyCode::Backspace, true, false),
            Action::TextBackspace
        );
    }

    #[test]
    fn test_tab_switch_to_settings_polls_status() {
        let mut app = test_app();
        app.tab = Tab::Chat;
        let cmd = apply_action(&mut app, Action::NextTab);
        assert_eq!(app.tab, Tab::Settings);
        assert!(matches!(cmd, Some(Command::RefreshStatus)));

        // Leaving settings does not poll.
        let cmd = apply_action(&mut app, Action::NextTab);
        assert_eq!(app.tab, Tab::Dashboard);
        assert!(cmd.is_none());
    }

    #[test]
    fn test_connect_guarded_while_busy() {
        let mut app = test_app();
        assert!(matches!(
            apply_action(&mut app, Action::Connect),
            Some(Command::BeginConnect)
        ));
        assert_eq!(app.link, LinkState::Connecting);

        // Second press while the flow is in flight is a no-op.
        assert!(apply_action(&mut app, Action::Connect).is_none());
    }

    #[test]
    fn test_disconnect_requires_connection() {
        let mut app = test_app();
        assert!(apply_action(&mut app, Action::Disconnect).is_none());

        app.link = LinkState::Connected { optimistic: false };
        assert!(matches!(
            apply_action(&mut app, Action::Disconnect),
            Some(Command::Disconnect)
        ));
        assert_eq!(app.link, LinkState::Disconnecting);
    }

    #[test]
    fn test_chat_submit_sends_and_clears_input() {
        let mut app = test_app();
        app.tab = Tab::Chat;
        app.editing = true;
        app.input = "how is my glucose?".to_string();

        let cmd = apply_action(&mut app, Action::TextSubmit);
        match cmd {
            Some(Command::SendChat { text }) => assert_eq!(text, "how is my glucose?"),
            other => panic!("expected SendChat, got {:?}", other),
        }
        assert!(app.input.is_empty());
        assert!(!app.editing);
        assert_eq!(app.transcript.messages().len(), 2);
    }

    #[test]
    fn test_blank_chat_submit_is_noop() {
        let mut app = test_app();
        app.tab = Tab::Chat;
        app.editing = true;
        app.input = "   ".to_string();

        assert!(apply_action(&mut app, Action::TextSubmit).is_none());
        assert_eq!(app.transcript.messages().len(), 1);
    }

    #[test]
    fn test_callback_submit_only_while_awaiting() {
        let mut app = test_app();
        app.tab = Tab::Settings;
        app.input = "code=abc&state=xyz".to_string();

        // Not awaiting a callback: nothing happens.
        assert!(apply_action(&mut app, Action::TextSubmit).is_none());

        app.link = LinkState::AwaitingCallback;
        app.input = "code=abc&state=xyz".to_string();
        let cmd = apply_action(&mut app, Action::TextSubmit);
        match cmd {
            Some(Command::CompleteCallback { pasted }) => {
                assert_eq!(pasted, "code=abc&state=xyz");
            }
            other => panic!("expected CompleteCallback, got {:?}", other),
        }
        // The pasted parameters are consumed, not left on screen.
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_escape_stops_stream_then_dismisses_banner() {
        let mut app = test_app();
        app.transcript.prepare_send("q").unwrap();
        let id = uuid::Uuid::new_v4();
        app.handle_event(AppEvent::ChatStreamStarted { id });

        let cmd = apply_action(&mut app, Action::Escape);
        assert!(matches!(cmd, Some(Command::StopChat)));
        assert!(!app.transcript.is_pending());

        app.set_banner(super::super::app::BannerKind::Info, "note");
        assert!(apply_action(&mut app, Action::Escape).is_none());
        assert!(app.banner.is_none());
    }

    #[test]
    fn test_insight_goes_through_send_guard() {
        let mut app = test_app();
        let cmd = apply_action(&mut app, Action::Insight(QuickInsight::DailySummary));
        assert!(matches!(cmd, Some(Command::SendChat { .. })));

        // A second insight while pending is swallowed by the guard.
        assert!(apply_action(&mut app, Action::Insight(QuickInsight::TrendAnalysis)).is_none());
    }
}

//! Application state for the TUI.
//!
//! This module contains the core state management for the terminal user
//! interface: the per-range reading entries mirrored from worker events,
//! the connection state, the chat transcript, and UI navigation. All
//! transitions are pure functions of [`AppEvent`]s and user actions, which
//! keeps them testable without a terminal or a backend.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use glucodash_core::chat::ChatTranscript;
use glucodash_core::client::ConnectionStatus;
use glucodash_core::connect::LinkState;
use glucodash_core::feed::RangeCacheEntry;
use glucodash_core::messages::{AppEvent, Command};
use glucodash_core::stats::DashboardStats;
use glucodash_core::zones::Zones;
use glucodash_types::Range;

use crate::config::Config;

/// How long a banner notice stays on screen.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

/// Spinner animation frames.
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// UI tab selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// Stat cards and the trend chart.
    #[default]
    Dashboard,
    /// The assistant transcript.
    Chat,
    /// Connection settings.
    Settings,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Chat, Tab::Settings];

    /// Display title for the tab bar.
    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Chat => "Assistant",
            Tab::Settings => "Settings",
        }
    }

    /// Cycle forward.
    pub fn next(self) -> Self {
        match self {
            Tab::Dashboard => Tab::Chat,
            Tab::Chat => Tab::Settings,
            Tab::Settings => Tab::Dashboard,
        }
    }

    /// Cycle backward.
    pub fn previous(self) -> Self {
        match self {
            Tab::Dashboard => Tab::Settings,
            Tab::Chat => Tab::Dashboard,
            Tab::Settings => Tab::Chat,
        }
    }
}

/// Visual flavor of a banner notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
    Info,
}

/// A transient notice shown under the tab bar.
#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    shown_at: Instant,
}

impl Banner {
    fn new(kind: BannerKind, text: String) -> Self {
        Self {
            kind,
            text,
            shown_at: Instant::now(),
        }
    }

    /// Whether the banner has outlived its display window.
    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() > BANNER_TTL
    }
}

/// The full state behind the terminal UI.
pub struct App {
    /// Currently selected tab.
    pub tab: Tab,
    /// Range shown on the chart.
    pub active_range: Range,
    /// Whether the 70-180 band is drawn.
    pub show_target_band: bool,
    /// Per-range entries mirrored from worker events.
    pub entries: HashMap<Range, RangeCacheEntry>,
    /// Range with a fetch in flight that has nothing cached to show.
    pub loading: Option<Range>,
    /// Last fetch error for the active range.
    pub fetch_error: Option<String>,
    /// UI-level connect flow state.
    pub link: LinkState,
    /// The backend's last authoritative connection status.
    pub status: ConnectionStatus,
    /// Last status poll failure, shown on the settings panel.
    pub status_error: Option<String>,
    /// Username of the linked account, once resolved.
    pub username: Option<String>,
    /// Authorization URL of the flow in progress, for manual opening.
    pub auth_url: Option<String>,
    /// The chat transcript.
    pub transcript: ChatTranscript,
    /// Shared text input buffer (chat message or pasted callback).
    pub input: String,
    /// Whether keystrokes go into the input buffer.
    pub editing: bool,
    /// Transient notice, if any.
    pub banner: Option<Banner>,
    /// Zone evaluator for status classification.
    pub zones: Zones,
    /// Session user identifier (display only; the worker owns the calls).
    pub user_id: String,
    /// Receiver for worker events.
    pub event_rx: mpsc::Receiver<AppEvent>,
    spinner_frame: usize,
    should_quit: bool,
}

impl App {
    /// Create the application state from configuration.
    pub fn new(config: &Config, event_rx: mpsc::Receiver<AppEvent>) -> Self {
        let zones = if config.ui.tight_zones {
            Zones::tight()
        } else {
            Zones::default()
        };
        Self {
            tab: Tab::default(),
            active_range: config.ui.default_range,
            show_target_band: config.ui.show_target_band,
            entries: HashMap::new(),
            loading: Some(config.ui.default_range),
            fetch_error: None,
            link: LinkState::default(),
            status: ConnectionStatus::disconnected(),
            status_error: None,
            username: None,
            auth_url: None,
            transcript: ChatTranscript::new(),
            input: String::new(),
            editing: false,
            banner: None,
            zones,
            user_id: config.api.user_id.clone(),
            event_rx,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    /// Whether the event loop should exit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Request exit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Advance the spinner animation.
    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    /// Current spinner glyph.
    pub fn spinner_char(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    /// Drop the banner once its display window has passed.
    pub fn clean_expired_banner(&mut self) {
        if self.banner.as_ref().is_some_and(Banner::is_expired) {
            self.banner = None;
        }
    }

    /// Show a transient notice.
    pub fn set_banner(&mut self, kind: BannerKind, text: impl Into<String>) {
        self.banner = Some(Banner::new(kind, text.into()));
    }

    /// The entry for the active range, if loaded.
    pub fn active_entry(&self) -> Option<&RangeCacheEntry> {
        self.entries.get(&self.active_range)
    }

    /// The entry backing the 24h aggregates, if loaded.
    pub fn day_entry(&self) -> Option<&RangeCacheEntry> {
        self.entries.get(&Range::H24)
    }

    /// Derive the stat-card metrics from the current entries.
    pub fn stats(&self, now: time::OffsetDateTime) -> DashboardStats {
        let active = self.active_entry().map(|e| e.readings.as_slice()).unwrap_or(&[]);
        let day = self.day_entry().map(|e| e.readings.as_slice()).unwrap_or(&[]);
        DashboardStats::derive(active, day, now, &self.zones)
    }

    /// Switch the chart to a range. Returns the command to issue, if the
    /// cached entry is missing or stale.
    pub fn select_range(&mut self, range: Range) -> Option<Command> {
        self.active_range = range;
        self.fetch_error = None;
        self.loading = None;
        match self.entries.get(&range) {
            // Fresh data on hand: nothing to do.
            Some(entry) if entry.is_fresh() => None,
            // Stale data: show it and refresh in the background.
            Some(_) => Some(Command::FetchReadings { range }),
            None => {
                self.loading = Some(range);
                Some(Command::FetchReadings { range })
            }
        }
    }

    /// Apply a worker event to the state.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ReadingsLoaded { entry } => {
                if self.loading == Some(entry.range) {
                    self.loading = None;
                }
                if entry.range == self.active_range {
                    self.fetch_error = None;
                }
                self.entries.insert(entry.range, entry);
            }
            AppEvent::ReadingsError {
                range,
                error,
                fallback,
            } => {
                if self.loading == Some(range) {
                    self.loading = None;
                }
                if let Some(entry) = fallback {
                    self.entries.insert(range, entry);
                }
                if range == self.active_range {
                    self.fetch_error = Some(error);
                }
            }
            AppEvent::StatusRefreshed { status } => {
                // The poll always overwrites the status; the flow overlay is
                // only replaced when no operation is mid-flight.
                self.status = status;
                self.status_error = None;
                if !self.link.is_busy() && self.link != LinkState::AwaitingCallback {
                    self.link = LinkState::from_status(&self.status);
                }
                if !self.status.connected {
                    self.username = None;
                }
            }
            AppEvent::StatusError { error } => {
                self.status_error = Some(error);
            }
            AppEvent::AccountResolved { username } => {
                self.username = Some(username);
            }
            AppEvent::AuthorizationOpened { url } => {
                self.link = LinkState::AwaitingCallback;
                self.auth_url = Some(url);
                self.set_banner(
                    BannerKind::Info,
                    "Browser opened. Authorize, then paste the redirect URL on the Settings tab.",
                );
            }
            AppEvent::ConnectFailed { error } => {
                self.link = LinkState::Error(error.clone());
                self.auth_url = None;
                self.set_banner(BannerKind::Error, error);
            }
            AppEvent::ExchangeStarted => {
                self.link = LinkState::Exchanging;
            }
            AppEvent::ExchangeCompleted { user_id } => {
                // Optimistic until the authoritative poll lands.
                self.link = LinkState::Connected { optimistic: true };
                self.status = ConnectionStatus::optimistic();
                self.auth_url = None;
                self.set_banner(BannerKind::Success, format!("Connected as {}", user_id));
            }
            AppEvent::ExchangeFailed { error } => {
                self.link = LinkState::Error(error.clone());
                self.auth_url = None;
                self.set_banner(BannerKind::Error, error);
            }
            AppEvent::Disconnected => {
                self.status = ConnectionStatus::disconnected();
                self.link = LinkState::Disconnected;
                self.username = None;
                self.set_banner(BannerKind::Info, "Account disconnected");
            }
            AppEvent::DisconnectFailed { error } => {
                self.link = LinkState::from_status(&self.status);
                self.set_banner(BannerKind::Error, error);
            }
            AppEvent::ChatStreamStarted { id } => {
                self.transcript.begin_assistant(id);
            }
            AppEvent::ChatDelta { id, content } => {
                self.transcript.apply_delta(id, content);
            }
            AppEvent::ChatStreamFinished { id } => {
                self.transcript.finish_stream(id);
            }
            AppEvent::ChatFailed { error } => {
                tracing::warn!(error = %error, "Chat send failed");
                self.transcript.fail();
            }
        }
    }
}

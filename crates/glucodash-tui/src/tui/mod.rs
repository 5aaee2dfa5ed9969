//! Main entry point for the TUI dashboard.
//!
//! This module ties together all the TUI components and provides the main
//! event loop for the terminal user interface. It handles:
//!
//! - Terminal setup and restoration
//! - Channel creation for worker communication
//! - The main event loop with input handling and rendering
//! - Graceful shutdown coordination

pub mod app;
pub mod input;
pub mod ui;
pub mod worker;

pub use app::App;
pub use worker::ApiWorker;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;

use glucodash_core::client::ApiClient;
use glucodash_core::feed::GlucoseFeed;
use glucodash_core::messages::{AppEvent, Command};

use crate::config::Config;
use app::Tab;

/// Set up the terminal for TUI rendering.
///
/// Enables raw mode and switches to the alternate screen buffer.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It:
/// 1. Creates communication channels between UI and worker
/// 2. Spawns the background API worker
/// 3. Runs the main event loop
/// 4. Ensures graceful shutdown
pub async fn run(config: Config) -> Result<()> {
    // Create communication channels
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(32);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    let client = ApiClient::new(&config.api.base_url)?;
    info!("Backend: {}", client.base_url());
    let feed = GlucoseFeed::new(client);

    // Create and spawn the background worker. It polls the connection
    // status and warms the reading cache on startup.
    let worker = ApiWorker::new(
        cmd_rx,
        event_tx,
        feed,
        config.api.user_id.clone(),
        config.ui.default_range,
    );
    let worker_handle = tokio::spawn(worker.run());

    // Create the application
    let mut app = App::new(&config, event_rx);

    // Set up terminal
    let mut terminal = setup_terminal()?;

    // Run the main event loop
    let result = run_event_loop(&mut terminal, &mut app, &cmd_tx).await;

    // Send shutdown command to worker
    let _ = cmd_tx.try_send(Command::Shutdown);

    // Restore terminal
    restore_terminal()?;

    // Wait for worker to complete
    let _ = worker_handle.await;

    result
}

/// Main event loop for the TUI.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_tx: &mpsc::Sender<Command>,
) -> Result<()> {
    while !app.should_quit() {
        // Tick spinner animation and expire stale banners
        app.tick_spinner();
        app.clean_expired_banner();

        // Draw the UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for keyboard events with timeout
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = input::handle_key(key.code, app.editing, app.tab == Tab::Chat);
            if let Some(cmd) = input::apply_action(app, action) {
                let _ = command_tx.try_send(cmd);
            }
        }

        // Non-blocking receive of worker events
        while let Ok(event) = app.event_rx.try_recv() {
            app.handle_event(event);
        }
    }

    Ok(())
}

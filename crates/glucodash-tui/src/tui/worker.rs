//! Background worker for backend API operations.
//!
//! This module contains the [`ApiWorker`] which performs all HTTP calls in a
//! background task, keeping the UI loop responsive. The worker communicates
//! with the UI thread via channels:
//!
//! - Receives [`Command`]s from the UI to perform operations
//! - Sends [`AppEvent`]s back to report results and status updates
//!
//! The worker also drives the chat reveal timer: once a reply arrives, a
//! spawned task emits one word-prefix delta per tick until the reply is
//! fully shown or the stream is cancelled.

use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use glucodash_core::chat::{RevealPlan, REVEAL_INITIAL_DELAY, REVEAL_WORD_INTERVAL};
use glucodash_core::connect::parse_callback;
use glucodash_core::feed::GlucoseFeed;
use glucodash_core::messages::{AppEvent, Command};
use glucodash_types::Range;

/// Background worker that handles backend API operations.
///
/// The worker receives commands from the UI thread, performs HTTP calls
/// asynchronously, and sends events back to update the UI state. The
/// session user identifier is held here once and threaded into every call.
pub struct ApiWorker {
    /// Receiver for commands from the UI thread.
    command_rx: mpsc::Receiver<Command>,
    /// Sender for events back to the UI thread.
    event_tx: mpsc::Sender<AppEvent>,
    /// The fetch/cache layer.
    feed: GlucoseFeed,
    /// Session user identifier.
    user_id: String,
    /// Range the dashboard opens on; fetched eagerly at startup.
    initial_range: Range,
    /// Cancellation token for the active chat reveal.
    chat_cancel: CancellationToken,
}

impl ApiWorker {
    /// Create a new worker.
    pub fn new(
        command_rx: mpsc::Receiver<Command>,
        event_tx: mpsc::Sender<AppEvent>,
        feed: GlucoseFeed,
        user_id: String,
        initial_range: Range,
    ) -> Self {
        Self {
            command_rx,
            event_tx,
            feed,
            user_id,
            initial_range,
            chat_cancel: CancellationToken::new(),
        }
    }

    /// Run the worker's main loop.
    ///
    /// This method consumes the worker and runs until a [`Command::Shutdown`]
    /// is received or the command channel is closed.
    pub async fn run(mut self) {
        info!("ApiWorker started");

        // Startup: authoritative status poll, the visible ranges, then a
        // best-effort warm of everything else.
        self.handle_refresh_status().await;
        self.handle_fetch(self.initial_range).await;
        if self.initial_range != Range::H24 {
            self.handle_fetch(Range::H24).await;
        }
        self.feed.prefetch_all();

        loop {
            match self.command_rx.recv().await {
                Some(Command::Shutdown) => {
                    info!("ApiWorker received shutdown command");
                    break;
                }
                Some(cmd) => {
                    self.handle_command(cmd).await;
                }
                None => {
                    info!("Command channel closed, shutting down worker");
                    break;
                }
            }
        }

        self.chat_cancel.cancel();
        info!("ApiWorker stopped");
    }

    /// Handle a single command from the UI.
    async fn handle_command(&mut self, cmd: Command) {
        debug!(?cmd, "Handling command");

        match cmd {
            Command::FetchReadings { range } => {
                self.handle_fetch(range).await;
            }
            Command::PrefetchAll => {
                self.feed.prefetch_all();
            }
            Command::RefreshStatus => {
                self.handle_refresh_status().await;
            }
            Command::BeginConnect => {
                self.handle_begin_connect().await;
            }
            Command::CompleteCallback { pasted } => {
                self.handle_complete_callback(&pasted).await;
            }
            Command::Disconnect => {
                self.handle_disconnect().await;
            }
            Command::SendChat { text } => {
                self.handle_send_chat(&text).await;
            }
            Command::StopChat => {
                self.chat_cancel.cancel();
            }
            Command::Shutdown => {
                // Handled in the main loop.
            }
        }
    }

    /// Fetch readings for a range, serving cache first.
    ///
    /// A cached entry is pushed to the UI immediately; if it is stale, a
    /// refresh follows and pushes again. On failure the UI gets the cached
    /// entry (if any) as the fallback alongside the error.
    async fn handle_fetch(&self, range: Range) {
        if let Some(entry) = self.feed.cached(range) {
            let fresh = entry.is_fresh();
            let _ = self.event_tx.send(AppEvent::ReadingsLoaded { entry }).await;
            if fresh {
                return;
            }
        }

        match self.feed.fetch(range).await {
            Ok(entry) => {
                let _ = self.event_tx.send(AppEvent::ReadingsLoaded { entry }).await;
            }
            Err(e) => {
                warn!(range = %range, error = %e, "Failed to fetch readings");
                let _ = self
                    .event_tx
                    .send(AppEvent::ReadingsError {
                        range,
                        error: e.to_string(),
                        fallback: self.feed.cached(range),
                    })
                    .await;
            }
        }
    }

    /// Poll the authoritative connection status, and resolve the account
    /// name when the link is valid.
    async fn handle_refresh_status(&self) {
        let client = self.feed.client();
        match client.status(&self.user_id).await {
            Ok(status) => {
                let connected = status.connected && status.token_valid;
                let _ = self.event_tx.send(AppEvent::StatusRefreshed { status }).await;

                if connected {
                    let username = match client.user_info(&self.user_id).await {
                        Ok(info) => info
                            .user
                            .filter(|_| info.success)
                            .map(|u| u.username)
                            .filter(|name| !name.is_empty()),
                        Err(e) => {
                            debug!(error = %e, "Failed to fetch user info");
                            None
                        }
                    };
                    let _ = self
                        .event_tx
                        .send(AppEvent::AccountResolved {
                            username: username.unwrap_or_else(|| self.user_id.clone()),
                        })
                        .await;
                }
            }
            Err(e) => {
                debug!(error = %e, "Failed to check connection status");
                let _ = self
                    .event_tx
                    .send(AppEvent::StatusError {
                        error: e.to_string(),
                    })
                    .await;
            }
        }
    }

    /// Request an authorization URL and send the browser there.
    async fn handle_begin_connect(&self) {
        match self.feed.client().authorization_url(&self.user_id).await {
            Ok(url) => {
                if let Err(e) = open::that(&url) {
                    // The URL is still shown on the settings panel for
                    // manual opening.
                    warn!(error = %e, "Failed to open browser");
                }
                let _ = self
                    .event_tx
                    .send(AppEvent::AuthorizationOpened { url })
                    .await;
            }
            Err(e) => {
                let _ = self
                    .event_tx
                    .send(AppEvent::ConnectFailed {
                        error: e.to_string(),
                    })
                    .await;
            }
        }
    }

    /// Parse the pasted redirect and exchange the authorization code.
    async fn handle_complete_callback(&self, pasted: &str) {
        let params = match parse_callback(pasted) {
            Ok(params) => params,
            Err(e) => {
                // Denied and malformed callbacks surface the same way: a
                // banner, and the flow can be retried from the start.
                let _ = self
                    .event_tx
                    .send(AppEvent::ConnectFailed {
                        error: e.to_string(),
                    })
                    .await;
                return;
            }
        };

        let _ = self.event_tx.send(AppEvent::ExchangeStarted).await;
        match self
            .feed
            .client()
            .exchange_token(&params.code, &params.state, &self.user_id)
            .await
        {
            Ok(outcome) => {
                let user_id = outcome.user_id.unwrap_or_else(|| self.user_id.clone());
                let _ = self
                    .event_tx
                    .send(AppEvent::ExchangeCompleted { user_id })
                    .await;
                // Reconcile the optimistic state right away.
                self.handle_refresh_status().await;
            }
            Err(e) => {
                warn!(error = %e, "Token exchange failed");
                let _ = self
                    .event_tx
                    .send(AppEvent::ExchangeFailed {
                        error: format!("Failed to exchange authorization code: {}", e),
                    })
                    .await;
            }
        }
    }

    /// Unlink the account.
    async fn handle_disconnect(&self) {
        match self.feed.client().disconnect(&self.user_id).await {
            Ok(()) => {
                let _ = self.event_tx.send(AppEvent::Disconnected).await;
            }
            Err(e) => {
                let _ = self
                    .event_tx
                    .send(AppEvent::DisconnectFailed {
                        error: e.to_string(),
                    })
                    .await;
            }
        }
    }

    /// Post a chat message and, on success, drive the word-by-word reveal.
    async fn handle_send_chat(&mut self, text: &str) {
        let reply = match self.feed.client().chat(text, &self.user_id).await {
            Ok(reply) if reply.success => reply,
            Ok(reply) => {
                let _ = self
                    .event_tx
                    .send(AppEvent::ChatFailed {
                        error: reply
                            .error
                            .unwrap_or_else(|| "Failed to get response".to_string()),
                    })
                    .await;
                return;
            }
            Err(e) => {
                let _ = self
                    .event_tx
                    .send(AppEvent::ChatFailed {
                        error: e.to_string(),
                    })
                    .await;
                return;
            }
        };

        // One reveal at a time: cancel any stragglers, then hand the new
        // stream its own token.
        self.chat_cancel.cancel();
        let token = CancellationToken::new();
        self.chat_cancel = token.clone();

        let id = Uuid::new_v4();
        let _ = self.event_tx.send(AppEvent::ChatStreamStarted { id }).await;

        let event_tx = self.event_tx.clone();
        let plan = RevealPlan::new(&reply.response);
        tokio::spawn(async move {
            // Cancellation freezes the stream: whatever prefix is on screen
            // stays, and the finish event clears the streaming flag.
            'reveal: {
                tokio::select! {
                    () = token.cancelled() => break 'reveal,
                    () = sleep(REVEAL_INITIAL_DELAY) => {}
                }

                for i in 0..plan.len() {
                    tokio::select! {
                        () = token.cancelled() => break 'reveal,
                        () = sleep(REVEAL_WORD_INTERVAL) => {
                            let _ = event_tx
                                .send(AppEvent::ChatDelta { id, content: plan.prefix(i) })
                                .await;
                        }
                    }
                }
            }

            let _ = event_tx.send(AppEvent::ChatStreamFinished { id }).await;
        });
    }
}

//! Message types for UI/worker communication.
//!
//! The dashboard runs as two tasks: the UI event loop and a background
//! worker that owns all network I/O. They talk over a pair of mpsc channels:
//!
//! ```text
//! +------------------+     Command      +------------------+
//! |    UI Thread     | --------------> |    ApiWorker     |
//! |    (ratatui)     |                 |  (tokio runtime) |
//! |                  | <-------------- |                  |
//! +------------------+     AppEvent    +------------------+
//! ```
//!
//! - [`Command`]: user-initiated actions that require backend calls
//! - [`AppEvent`]: results and progress reported back to the UI

use uuid::Uuid;

use glucodash_types::Range;

use crate::client::ConnectionStatus;
use crate::feed::RangeCacheEntry;

/// Commands sent from the UI thread to the background worker.
#[derive(Debug, Clone)]
pub enum Command {
    /// Fetch readings for a range (cache-through).
    FetchReadings {
        /// The lookback window to fetch.
        range: Range,
    },

    /// Warm the cache for all ranges, best-effort.
    PrefetchAll,

    /// Re-poll the authoritative connection status.
    RefreshStatus,

    /// Start the connect flow: request an authorization URL and open the
    /// browser at it.
    BeginConnect,

    /// Complete the connect flow from a pasted redirect URL or query string.
    CompleteCallback {
        /// Whatever the user pasted after authorizing.
        pasted: String,
    },

    /// Unlink the CGM account.
    Disconnect,

    /// Post a chat message to the assistant endpoint.
    SendChat {
        /// The message text (already validated by the transcript guard).
        text: String,
    },

    /// Cancel the active streaming reveal, if any.
    StopChat,

    /// Shut down the worker task.
    Shutdown,
}

/// Events sent from the background worker to the UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Readings fetched (or refreshed) for a range.
    ReadingsLoaded {
        /// The cache entry now current for its range.
        entry: RangeCacheEntry,
    },

    /// A fetch failed; `fallback` carries the cached entry when one exists.
    ReadingsError {
        range: Range,
        error: String,
        fallback: Option<RangeCacheEntry>,
    },

    /// Authoritative connection status from the backend.
    StatusRefreshed { status: ConnectionStatus },

    /// Status poll failed.
    StatusError { error: String },

    /// The linked account's username was resolved.
    AccountResolved { username: String },

    /// The browser was sent to the authorization URL.
    AuthorizationOpened { url: String },

    /// The connect flow failed before or at the redirect.
    ConnectFailed { error: String },

    /// Token exchange started for a pasted callback.
    ExchangeStarted,

    /// Token exchange succeeded; the link is optimistically connected until
    /// the next status poll.
    ExchangeCompleted {
        /// Account identifier resolved by the backend.
        user_id: String,
    },

    /// Token exchange failed.
    ExchangeFailed { error: String },

    /// The account was unlinked.
    Disconnected,

    /// Unlinking failed.
    DisconnectFailed { error: String },

    /// The assistant answered; a reveal is starting under this message id.
    ChatStreamStarted { id: Uuid },

    /// The next word-prefix of the streaming reveal.
    ChatDelta { id: Uuid, content: String },

    /// The reveal reached the end of the reply.
    ChatStreamFinished { id: Uuid },

    /// The send failed; the transcript should show the apology message.
    ChatFailed { error: String },
}

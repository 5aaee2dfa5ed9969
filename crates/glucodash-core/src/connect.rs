//! CGM account connect flow.
//!
//! The flow mirrors the OAuth-style authorize/callback/exchange sequence:
//! request an authorization URL, send the browser there, and when the
//! provider redirects back, consume the `code`/`state`/`error` query
//! parameters and exchange the code with the backend. In a terminal the
//! redirect cannot land on a route, so the user pastes the redirected URL
//! (or just its query string) and [`parse_callback`] takes it from there.
//!
//! Status is re-polled at startup and whenever the settings view is shown,
//! overwriting the local view each time. After a successful exchange the
//! state is optimistically `Connected` until the next authoritative poll.

use thiserror::Error;
use url::Url;

use crate::client::ConnectionStatus;

/// State of the account link, as seen by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LinkState {
    /// No account linked.
    #[default]
    Disconnected,
    /// Requesting an authorization URL.
    Connecting,
    /// Browser sent to the provider; waiting for the pasted redirect.
    AwaitingCallback,
    /// Exchanging the authorization code.
    Exchanging,
    /// Account linked. `optimistic` is set between a successful exchange and
    /// the next authoritative status poll; it never gates any action.
    Connected { optimistic: bool },
    /// Unlinking.
    Disconnecting,
    /// The flow failed; retrying restarts from the beginning.
    Error(String),
}

impl LinkState {
    /// Display label for the settings panel.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            LinkState::Disconnected => "Not connected".to_string(),
            LinkState::Connecting => "Requesting authorization...".to_string(),
            LinkState::AwaitingCallback => "Waiting for authorization".to_string(),
            LinkState::Exchanging => "Completing connection...".to_string(),
            LinkState::Connected { optimistic: false } => "Connected".to_string(),
            LinkState::Connected { optimistic: true } => "Connected (confirming)".to_string(),
            LinkState::Disconnecting => "Disconnecting...".to_string(),
            LinkState::Error(e) => format!("Error: {}", e),
        }
    }

    /// Whether an operation is in flight (buttons should be disabled).
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            LinkState::Connecting | LinkState::Exchanging | LinkState::Disconnecting
        )
    }

    /// Whether the link is currently considered connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, LinkState::Connected { .. })
    }

    /// The state implied by an authoritative status poll.
    #[must_use]
    pub fn from_status(status: &ConnectionStatus) -> Self {
        if status.connected {
            LinkState::Connected { optimistic: false }
        } else {
            LinkState::Disconnected
        }
    }
}

/// The parameters extracted from a successful authorization redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    /// The authorization code to exchange.
    pub code: String,
    /// The anti-forgery state echoed by the provider.
    pub state: String,
}

/// Ways the pasted redirect can fail to yield exchange parameters.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// The provider reported an error (typically the user denied access).
    #[error("Authorization denied: {0}")]
    Denied(String),

    /// The redirect carried no usable `code`/`state` pair.
    #[error("Invalid callback parameters")]
    MissingParams,

    /// The pasted text is not a parseable URL or query string.
    #[error("Callback could not be parsed: {0}")]
    Malformed(#[from] url::ParseError),
}

/// Extract `code`/`state` from a pasted redirect URL or bare query string.
///
/// Accepts a full URL (`https://app/callback?code=...&state=...`), a bare
/// query string with or without a leading `?`, and reports a provider
/// `error` parameter as [`CallbackError::Denied`].
pub fn parse_callback(input: &str) -> Result<CallbackParams, CallbackError> {
    let trimmed = input.trim();
    let url = if trimmed.contains("://") {
        Url::parse(trimmed)?
    } else {
        let query = trimmed.trim_start_matches('?');
        Url::parse(&format!("http://callback.invalid/?{}", query))?
    };

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(reason) = error {
        return Err(CallbackError::Denied(reason));
    }

    match (code, state) {
        (Some(code), Some(state)) if !code.is_empty() && !state.is_empty() => {
            Ok(CallbackParams { code, state })
        }
        _ => Err(CallbackError::MissingParams),
    }
}

//! Error types for glucodash-core.
//!
//! Every failure here is recoverable at the view layer: a fetch error falls
//! back to cached readings or an inline error panel, a connect-flow error
//! becomes a banner, and a chat error becomes an apology message in the
//! transcript. Nothing is fatal to the process.

use thiserror::Error;

/// Error type for backend operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The backend is not reachable.
    #[error("Backend not reachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP request failed after the backend was reached.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The base URL is not a usable http(s) URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The backend returned a non-success status.
    #[error("API error: {message}")]
    Api { status: u16, message: String },

    /// The connect endpoint answered without an authorization URL.
    #[error("No authorization URL received")]
    NoAuthorizationUrl,

    /// The assistant endpoint answered `success: false`.
    #[error("Assistant rejected the message: {0}")]
    ChatRejected(String),
}

impl Error {
    /// Whether this error means the backend could not be reached at all
    /// (as opposed to reaching it and being refused).
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Error::Unreachable { .. })
    }
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            status: 400,
            message: "Invalid range".to_string(),
        };
        assert_eq!(err.to_string(), "API error: Invalid range");
    }

    #[test]
    fn test_chat_rejected_display() {
        let err = Error::ChatRejected("model unavailable".to_string());
        assert!(err.to_string().contains("model unavailable"));
    }
}

//! HTTP client for the glucodash backend API.
//!
//! All communication with the backend is JSON over HTTP against a
//! configurable base URL. The client exposes one typed method per endpoint;
//! callers decide how to recover from failures (the feed falls back to its
//! cache, the UI shows banners).
//!
//! # Example
//!
//! ```no_run
//! use glucodash_core::client::ApiClient;
//! use glucodash_types::Range;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new("http://localhost:8000")?;
//!
//! let payload = client.readings(Range::H24).await?;
//! println!("{} readings from {}", payload.data.len(), payload.source);
//!
//! Ok(())
//! # }
//! ```

use reqwest::Client;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use glucodash_types::{DataSource, GlucoseReading, Range};

use crate::error::{Error, Result};

/// Default base URL for a locally running backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP client for the glucodash backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

// ==========================================================================
// Response Types
// ==========================================================================

/// Glucose readings payload for one range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlucoseResponse {
    /// Provenance of the readings.
    pub source: DataSource,
    /// The readings, ordered by timestamp ascending.
    pub data: Vec<GlucoseReading>,
    /// The range this payload answers.
    pub range: Range,
    /// Optional human-readable note about the source selection.
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply from the assistant endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Whether the assistant produced an answer.
    pub success: bool,
    /// The answer text (empty on failure).
    #[serde(default)]
    pub response: String,
    /// Error description when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

/// Answer from the connect endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectUrl {
    /// Where to send the browser for authorization.
    #[serde(default)]
    pub authorization_url: Option<String>,
}

/// The backend's current view of the CGM account link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Whether an account is linked.
    #[serde(default)]
    pub connected: bool,
    /// Whether the stored token is currently valid.
    #[serde(default)]
    pub token_valid: bool,
    /// When the token expires, if known.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl ConnectionStatus {
    /// A fully disconnected status.
    #[must_use]
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// The optimistic placeholder used right after a successful token
    /// exchange, before the authoritative poll resolves.
    #[must_use]
    pub fn optimistic() -> Self {
        Self {
            connected: true,
            token_valid: true,
            expires_at: None,
        }
    }
}

/// Account information for a linked user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub success: bool,
    #[serde(default)]
    pub user: Option<AccountInfo>,
}

/// The linked account's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub username: String,
}

/// Outcome of the token exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeOutcome {
    /// The account identifier the backend resolved for this connection.
    #[serde(default)]
    pub user_id: Option<String>,
}

// ==========================================================================
// ApiClient Implementation
// ==========================================================================

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the backend (e.g. "http://localhost:8000")
    pub fn new(base_url: &str) -> Result<Self> {
        // Normalize URL (remove trailing slash)
        let base_url = base_url.trim_end_matches('/').to_string();

        // Validate URL format
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(Error::Request)?;

        Ok(Self { client, base_url })
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch glucose readings for a range.
    pub async fn readings(&self, range: Range) -> Result<GlucoseResponse> {
        let url = format!("{}/glucose?range={}", self.base_url, range);
        self.get(&url).await
    }

    /// Send a chat message to the assistant endpoint.
    pub async fn chat(&self, message: &str, user_id: &str) -> Result<ChatReply> {
        let url = format!("{}/chat", self.base_url);
        let body = serde_json::json!({
            "message": message,
            "user_id": user_id,
        });
        self.post_json(&url, &body).await
    }

    /// Request an authorization URL to start the connect flow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoAuthorizationUrl`] when the backend answers
    /// without a URL.
    pub async fn authorization_url(&self, user_id: &str) -> Result<String> {
        let url = format!("{}/dexcom/connect?user_id={}", self.base_url, user_id);
        let answer: ConnectUrl = self.get(&url).await?;
        answer.authorization_url.ok_or(Error::NoAuthorizationUrl)
    }

    /// Poll the backend's authoritative view of the account link.
    pub async fn status(&self, user_id: &str) -> Result<ConnectionStatus> {
        let url = format!("{}/dexcom/status/{}", self.base_url, user_id);
        self.get(&url).await
    }

    /// Fetch the linked account's identity.
    pub async fn user_info(&self, user_id: &str) -> Result<UserInfo> {
        let url = format!("{}/dexcom/user-info/{}", self.base_url, user_id);
        self.get(&url).await
    }

    /// Unlink the account.
    pub async fn disconnect(&self, user_id: &str) -> Result<()> {
        let url = format!("{}/dexcom/disconnect/{}", self.base_url, user_id);
        let response =
            self.client
                .post(&url)
                .send()
                .await
                .map_err(|e| Error::Unreachable {
                    url: url.clone(),
                    source: e,
                })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message: Self::error_message(response).await.unwrap_or_else(|| status.to_string()),
            })
        }
    }

    /// Exchange an authorization code for a linked connection.
    pub async fn exchange_token(
        &self,
        code: &str,
        state: &str,
        user_id: &str,
    ) -> Result<ExchangeOutcome> {
        let url = format!("{}/dexcom/exchange-token", self.base_url);
        let body = serde_json::json!({
            "code": code,
            "state": state,
            "user_id": user_id,
        });
        self.post_json(&url, &body).await
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Unreachable {
                url: url.to_string(),
                source: e,
            })?;

        Self::handle_response(response).await
    }

    async fn post_json<T: serde::de::DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Unreachable {
                url: url.to_string(),
                source: e,
            })?;

        Self::handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(Error::Request)
        } else {
            let message = Self::error_message(response)
                .await
                .unwrap_or_else(|| status.to_string());

            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Pull a human-readable message out of an error body.
    ///
    /// The backend reports errors under either an `error` or a `detail` key.
    async fn error_message(response: reqwest::Response) -> Option<String> {
        let value = response.json::<serde_json::Value>().await.ok()?;
        value
            .get("error")
            .or_else(|| value.get("detail"))
            .and_then(|v| v.as_str())
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new("http://localhost:8000");
        assert!(client.is_ok());

        let client = client.unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_client_normalizes_url() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_client_invalid_url() {
        let result = ApiClient::new("localhost:8000");
        assert!(result.is_err());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_connection_status_defaults() {
        let json = r#"{}"#;
        let status: ConnectionStatus = serde_json::from_str(json).unwrap();
        assert!(!status.connected);
        assert!(!status.token_valid);
        assert!(status.expires_at.is_none());
    }

    #[test]
    fn test_connection_status_full() {
        let json =
            r#"{"connected":true,"token_valid":true,"expires_at":"2025-07-01T00:00:00+00:00"}"#;
        let status: ConnectionStatus = serde_json::from_str(json).unwrap();
        assert!(status.connected);
        assert!(status.token_valid);
        assert!(status.expires_at.is_some());
    }

    #[test]
    fn test_optimistic_status_is_connected() {
        let status = ConnectionStatus::optimistic();
        assert!(status.connected);
        assert!(status.token_valid);
    }

    #[test]
    fn test_glucose_response_decoding() {
        let json = r#"{
            "source": "synthetic",
            "data": [{"ts":"2025-03-01T08:00:00Z","mgdl":110}],
            "range": "3h",
            "message": "Using synthetic data - no real data available"
        }"#;
        let payload: GlucoseResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.source, DataSource::Synthetic);
        assert_eq!(payload.range, Range::H3);
        assert_eq!(payload.data.len(), 1);
        assert!(payload.message.is_some());
    }

    #[test]
    fn test_chat_reply_failure_shape() {
        let json = r#"{"success":false,"error":"model unavailable"}"#;
        let reply: ChatReply = serde_json::from_str(json).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.response, "");
        assert_eq!(reply.error.as_deref(), Some("model unavailable"));
    }
}

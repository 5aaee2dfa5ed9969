//! Client library for the glucodash glucose-monitoring backend.
//!
//! This crate provides everything the dashboard needs short of rendering:
//! the HTTP API client, the per-range reading cache with background
//! prefetch, derived dashboard metrics, a pure chart model, the CGM
//! connect flow, and the chat transcript with its streaming-reveal
//! bookkeeping.
//!
//! # Features
//!
//! - **API client**: typed JSON-over-HTTP calls against a configurable base URL
//! - **Fetch/cache layer**: per-range cache, freshness windows, sequenced
//!   same-range fetches, best-effort prefetch of all ranges
//! - **Derived metrics**: current value, 24h average/high/low, trend
//!   direction, zone classification, recency strings
//! - **Chart model**: plot points, fixed reference levels, trend caption
//! - **Connect flow**: authorize/callback/exchange state machine
//! - **Chat**: append-only transcript with a cancellable word-by-word reveal
//!
//! # Quick Start
//!
//! ```no_run
//! use glucodash_core::{ApiClient, GlucoseFeed};
//! use glucodash_types::Range;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:8000")?;
//!     let feed = GlucoseFeed::new(client);
//!
//!     // Warm every range in the background, then fetch the active one.
//!     feed.prefetch_all();
//!     let entry = feed.fetch(Range::H12).await?;
//!     println!("{} readings ({})", entry.readings.len(), entry.source);
//!
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod chat;
pub mod client;
pub mod connect;
pub mod error;
pub mod feed;
pub mod messages;
pub mod stats;
pub mod zones;

pub use chart::{ChartModel, TrendCaption, LOW_ALERT_MGDL, TARGET_RANGE, Y_BOUNDS, Y_TICKS};
pub use chat::{ChatMessage, ChatRole, ChatTranscript, QuickInsight, RevealPlan};
pub use client::{ApiClient, ChatReply, ConnectionStatus, GlucoseResponse, DEFAULT_BASE_URL};
pub use connect::{parse_callback, CallbackError, CallbackParams, LinkState};
pub use error::{Error, Result};
pub use feed::{GlucoseFeed, RangeCache, RangeCacheEntry};
pub use messages::{AppEvent, Command};
pub use stats::{DashboardStats, TrendDirection};
pub use zones::{Zone, ZoneConfig, Zones};

// Re-export from glucodash-types
pub use glucodash_types::{DataSource, GlucoseReading, Range};

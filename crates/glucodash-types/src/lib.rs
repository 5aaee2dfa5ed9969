//! Platform-agnostic types for the glucodash glucose feed.
//!
//! This crate provides the shared data vocabulary used by the client
//! library (`glucodash-core`) and the terminal dashboard (`glucodash-tui`).
//!
//! # Features
//!
//! - [`GlucoseReading`]: a timestamped mg/dL point as delivered by the feed
//! - [`Range`]: the four fixed lookback windows (3h/6h/12h/24h)
//! - [`DataSource`]: provenance tag for a glucose payload
//! - [`ParseError`]: error type for range and value parsing
//!
//! # Example
//!
//! ```
//! use glucodash_types::{DataSource, Range};
//!
//! let range: Range = "6h".parse().unwrap();
//! assert_eq!(range.hours(), 6);
//! assert!(DataSource::from("real_csv").is_real());
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{DataSource, GlucoseReading, Range};

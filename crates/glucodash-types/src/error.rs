//! Error types for glucose data parsing.

use thiserror::Error;

/// Errors that can occur when parsing glucose feed data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The range string is not one of the known lookback windows.
    #[error("Unknown range: {0:?} (expected one of 3h, 6h, 12h, 24h)")]
    UnknownRange(String),

    /// A field carried a value outside its valid domain.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

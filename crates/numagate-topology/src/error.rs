//! Error types for the topology data model.

use thiserror::Error;

/// Result type alias for data-model parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while parsing reported values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("unsupported quantity suffix: {0}")]
    UnsupportedSuffix(String),

    #[error("quantity out of range: {0}")]
    OutOfRange(String),
}

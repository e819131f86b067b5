//! Error types for JSON payload handling.

use thiserror::Error;

/// Errors raised while encoding or decoding JSON payloads.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value contains something that has no JSON representation.
    #[error("value is not JSON serializable: {0}")]
    Unsupported(String),

    /// The payload is not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Syntax(#[from] serde_json::Error),

    /// A tagged timestamp does not match `%Y-%m-%dT%H:%M:%S.%fZ`.
    #[error("time data '{value}' does not match format '%Y-%m-%dT%H:%M:%S.%fZ'")]
    InvalidTimestamp {
        /// The stored timestamp text.
        value: String,
    },

    /// A tagged decimal cannot be read as a finite float.
    #[error("could not convert '{0}' to a float")]
    InvalidDecimal(String),

    /// A tagged object carries a recognized `__class__` but no usable `__value__`.
    #[error("tagged '{class}' object has no usable __value__")]
    MissingTaggedValue {
        /// The `__class__` tag of the object.
        class: String,
    },
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

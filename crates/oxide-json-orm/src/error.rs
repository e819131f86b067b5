//! Error types for the ORM layer.

use oxide_json_core::CodecError;
use thiserror::Error;

/// ORM-specific errors.
#[derive(Debug, Error)]
pub enum OrmError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A payload could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// No object found matching the query.
    #[error("object not found")]
    NotFound,

    /// The column type has no mutation tracking associated with it.
    #[error("column '{column}' of type {data_type} is not mutable")]
    NotMutable {
        /// Column name.
        column: String,
        /// Declared column type.
        data_type: String,
    },

    /// A value cannot be wrapped in a tracking container.
    #[error("attribute '{key}' does not accept objects of type {found}")]
    NotCoercible {
        /// Attribute or key being assigned.
        key: String,
        /// Kind of the rejected value.
        found: &'static str,
    },

    /// A list index is out of range.
    #[error("list index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Length of the list.
        len: usize,
    },

    /// Invalid field name or value.
    #[error("invalid field: {0}")]
    InvalidField(String),
}

/// Result type alias for ORM operations.
pub type Result<T> = std::result::Result<T, OrmError>;

//! SDK error types.
//!
//! Provides error types for domain value handling.

/// SDK errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
    /// Identifier was empty or malformed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Unknown order status string.
    #[error("invalid order status: {0}")]
    InvalidStatus(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

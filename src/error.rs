//! Error types for collection operations.

use thiserror::Error;

/// Main error type for collection operations.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Index {index} out of bounds (len {len})")]
    OutOfBounds { index: usize, len: usize },

    #[error("Record must be a JSON object, got {0}")]
    NotAnObject(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Subscription dropped")]
    SubscriptionDropped,
}

impl CollectionError {
    /// The offending index, if this is an out-of-bounds error.
    pub fn index(&self) -> Option<usize> {
        match self {
            CollectionError::OutOfBounds { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CollectionError {
    fn from(e: serde_json::Error) -> Self {
        CollectionError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for CollectionError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        CollectionError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for CollectionError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        CollectionError::Deserialization(e.to_string())
    }
}

/// Result type for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;

//! Error types for cache operations
//!
//! This module defines all error types that can occur
//! during cache operations and Redis interactions.

use thiserror::Error;

/// Cache system errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// The store could not be reached while it was being constructed
    #[error("Redis connection error: {0}")]
    ConnectionError(#[source] redis::RedisError),

    /// The connection was established but PING did not answer PONG
    #[error("Redis liveness probe failed: expected PONG, got {0:?}")]
    PingFailed(String),

    #[error("Cache store unavailable during {operation}: {message}")]
    StoreUnavailable {
        operation: &'static str,
        message: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[source] serde_json::Error),

    #[error("Deserialization error for key [{key}]: {source}")]
    DeserializationError {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid TTL value: {0}")]
    InvalidTtl(u64),

    #[error("Invalid cache key: {0}")]
    InvalidKey(String),
}

impl CacheError {
    pub(crate) fn unavailable(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable {
            operation,
            message: err.to_string(),
        }
    }

    /// True for construction-time failures (connect or ping)
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionError(_) | Self::PingFailed(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    pub fn is_deserialization_error(&self) -> bool {
        matches!(self, Self::DeserializationError { .. })
    }
}

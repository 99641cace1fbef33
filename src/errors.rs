//! Error types for the flight-insights crate
//!
//! This module contains all error types that can be returned by insight queries.

use cache_system::CacheError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    /// Bad input or no matching records. Never cached.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl InsightsError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

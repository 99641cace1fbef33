//! Cache system for memoizing deterministic computations
//!
//! This crate provides a storage-agnostic cache contract, Redis and
//! in-memory implementations of it, versioned key derivation and a
//! cache-aside [`Memoizer`].
//!
//! ```rust
//! use cache_system::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new(Ttl::DEFAULT));
//! let memoizer = Memoizer::new(store, KeyDeriver::new("flights"));
//!
//! let delay: Result<f64, CacheError> = memoizer.memoize(
//!     "FlightInsights::avg_dep_delay_per_airline",
//!     |args| args.arg("VX"),
//!     || Ok(12.5),
//! );
//! assert_eq!(delay.unwrap(), 12.5);
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod clock;
pub mod codec;
pub mod errors;
pub mod key;
pub mod memoize;
pub mod memory;
pub mod prelude;
pub mod redis_store;
pub mod store;
pub mod ttl;

// Re-export centralized config
pub use config::{CacheBackend, CacheConfig};

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::CacheError;
pub use key::{CacheKey, KEY_SCHEMA_VERSION, KeyArgs, KeyDeriver};
pub use memoize::Memoizer;
pub use memory::InMemoryStore;
pub use redis_store::RedisStore;
pub use store::{CacheStore, CacheStoreExt, open_store};
pub use ttl::Ttl;

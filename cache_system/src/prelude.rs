//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::errors::CacheError;
pub use crate::key::{CacheKey, KeyArgs, KeyDeriver};
pub use crate::memoize::Memoizer;
pub use crate::memory::InMemoryStore;
pub use crate::redis_store::RedisStore;
pub use crate::store::{CacheStore, CacheStoreExt, open_store};
pub use crate::ttl::Ttl;

// Re-export centralized config
pub use config::{CacheBackend, CacheConfig};

// Common external dependencies
pub use redis;
pub use serde::{Deserialize, Serialize};
pub use serde_json;

//! The storage-agnostic cache contract
//!
//! Backends implement [`CacheStore`] over raw payload bytes. Typed access
//! goes through [`CacheStoreExt`], which runs values through the codec and is
//! available on every store, including `dyn CacheStore`.

use crate::codec;
use crate::errors::CacheError;
use crate::memory::InMemoryStore;
use crate::redis_store::RedisStore;
use crate::ttl::Ttl;
use config::{CacheBackend, CacheConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// A time-expiring key-value store.
///
/// Every operation either succeeds or reports why the backing store could
/// not serve it; implementations never turn a failure into a miss.
pub trait CacheStore: Send + Sync {
    /// Short backend name for logs ("redis", "memory")
    fn name(&self) -> &'static str;

    /// TTL used when `set` is called without one
    fn default_ttl(&self) -> Ttl;

    /// Store `payload` under `key`, replacing any prior value
    fn set_bytes(&self, key: &str, payload: Vec<u8>, ttl: Ttl) -> Result<(), CacheError>;

    /// Fetch the payload under `key`. Expired and never-set keys are both `None`.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Remove every entry this store manages
    fn clear(&self) -> Result<(), CacheError>;
}

/// Typed `set`/`get` on top of [`CacheStore`]
pub trait CacheStoreExt: CacheStore {
    /// Encode and store `value`; `None` uses the store's default TTL
    fn set<T>(&self, key: &str, value: &T, ttl: Option<Ttl>) -> Result<(), CacheError>
    where
        T: Serialize + ?Sized,
    {
        let ttl = ttl.unwrap_or_else(|| self.default_ttl());
        let payload = codec::encode(value)?;
        self.set_bytes(key, payload, ttl)?;

        crate::debug_log!(
            "[{}] Set key: [{}] with expiration: {}",
            self.name(),
            key,
            ttl
        );
        Ok(())
    }

    /// Fetch and decode the value under `key`
    fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        match self.get_bytes(key)? {
            Some(payload) => {
                crate::debug_log!("[{}] Cache hit for key: [{}]", self.name(), key);
                codec::decode(key, &payload).map(Some)
            }
            None => {
                crate::debug_log!("[{}] Cache miss for key: [{}]", self.name(), key);
                Ok(None)
            }
        }
    }
}

impl<S: CacheStore + ?Sized> CacheStoreExt for S {}

/// Open the store selected by `config`.
///
/// Returns `Ok(None)` when caching is disabled. Redis stores are connected
/// and pinged before this returns.
pub fn open_store(config: &CacheConfig) -> Result<Option<Arc<dyn CacheStore>>, CacheError> {
    if !config.enabled {
        tracing::info!("Cache disabled, computations will run uncached");
        return Ok(None);
    }

    let store: Arc<dyn CacheStore> = match config.backend {
        CacheBackend::Redis => Arc::new(RedisStore::connect(config)?),
        CacheBackend::Memory => Arc::new(InMemoryStore::from_config(config)?),
    };
    Ok(Some(store))
}

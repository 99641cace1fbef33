//! Cache-aside memoization of deterministic computations
//!
//! A [`Memoizer`] is handed to whatever owns the computations, at
//! construction time. Without a store it simply runs them.
//!
//! There is no locking around get-miss-compute-set: two callers missing on
//! the same key both compute and the later `set` wins.

use crate::errors::CacheError;
use crate::key::{KeyArgs, KeyDeriver};
use crate::store::{CacheStore, CacheStoreExt};
use config::CacheConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct Memoizer {
    store: Option<Arc<dyn CacheStore>>,
    keys: KeyDeriver,
}

impl Debug for Memoizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoizer")
            .field("store", &self.store.as_ref().map(|s| s.name()))
            .field("key_prefix", &self.keys.prefix())
            .finish()
    }
}

impl Memoizer {
    pub fn new(store: Arc<dyn CacheStore>, keys: KeyDeriver) -> Self {
        Self {
            store: Some(store),
            keys,
        }
    }

    /// A memoizer that always runs the computation
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_optional_store(store: Option<Arc<dyn CacheStore>>, keys: KeyDeriver) -> Self {
        Self { store, keys }
    }

    /// Open the configured store (if any) and key under the configured prefix
    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        let store = crate::store::open_store(config)?;
        Ok(Self::with_optional_store(
            store,
            KeyDeriver::new(&config.key_prefix),
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Option<&Arc<dyn CacheStore>> {
        self.store.as_ref()
    }

    pub fn key_deriver(&self) -> &KeyDeriver {
        &self.keys
    }

    /// Run `compute` through the cache.
    ///
    /// `args` receives an empty [`KeyArgs`] and adds the call's arguments; it
    /// is only invoked when a store is configured. On a hit the cached value
    /// is returned and `compute` is not called. On a miss `compute` runs and a
    /// successful result is stored with the store's default TTL. Errors from
    /// `compute` and from the store reach the caller; failed computations are
    /// never stored.
    pub fn memoize<T, E, A, F>(&self, operation: &str, args: A, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        A: FnOnce(KeyArgs) -> KeyArgs,
        F: FnOnce() -> Result<T, E>,
    {
        let Some(store) = &self.store else {
            return compute();
        };

        let key = self.keys.derive(operation, args(KeyArgs::new()))?;

        if let Some(cached) = store.get::<T>(key.as_str())? {
            return Ok(cached);
        }

        crate::trace_log!("Computing {} for key: [{}]", operation, key);
        let value = compute()?;
        store.set(key.as_str(), &value, None)?;
        Ok(value)
    }

    /// Clear the underlying store; a no-op when caching is disabled
    pub fn clear(&self) -> Result<(), CacheError> {
        match &self.store {
            Some(store) => store.clear(),
            None => Ok(()),
        }
    }
}

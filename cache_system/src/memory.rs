//! Process-local cache store
//!
//! Entries expire lazily: an expired entry is dropped the next time it is
//! read, or by [`InMemoryStore::purge_expired`].

use crate::clock::{Clock, SystemClock};
use crate::errors::CacheError;
use crate::store::CacheStore;
use crate::ttl::Ttl;
use config::CacheConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

#[derive(Debug)]
struct Entry {
    payload: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    /// Expired once `now` reaches the expiry instant
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    default_ttl: Ttl,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new(default_ttl: Ttl) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(default_ttl: Ttl, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
            clock,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        Ok(Self::new(Ttl::minutes(config.default_ttl_minutes)?))
    }

    fn entries(
        &self,
        operation: &'static str,
    ) -> Result<MutexGuard<'_, HashMap<String, Entry>>, CacheError> {
        self.entries
            .lock()
            .map_err(|e| CacheError::unavailable(operation, e))
    }

    /// Number of unexpired entries
    pub fn len(&self) -> Result<usize, CacheError> {
        let now = self.clock.now();
        let entries = self.entries("len")?;
        Ok(entries.values().filter(|e| !e.is_expired(now)).count())
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let now = self.clock.now();
        let mut entries = self.entries("purge_expired")?;
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        Ok(before - entries.len())
    }
}

impl CacheStore for InMemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn default_ttl(&self) -> Ttl {
        self.default_ttl
    }

    fn set_bytes(&self, key: &str, payload: Vec<u8>, ttl: Ttl) -> Result<(), CacheError> {
        let expires_at = self
            .clock
            .now()
            .checked_add(ttl.as_duration())
            .ok_or(CacheError::InvalidTtl(ttl.as_minutes()))?;
        self.entries("set")?
            .insert(key.to_string(), Entry { payload, expires_at });
        Ok(())
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = self.clock.now();
        let mut entries = self.entries("get")?;

        match entries.get(key) {
            None => return Ok(None),
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.payload.clone())),
            Some(_) => {}
        }

        entries.remove(key);
        Ok(None)
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries("clear")?.clear();
        tracing::info!("Cleared all keys from in-memory cache");
        Ok(())
    }
}

//! Redis-backed cache store
//!
//! One blocking connection per store, shared by all callers behind a mutex.
//! Single-key atomicity comes from Redis itself; nothing here spans keys.

use crate::errors::CacheError;
use crate::store::CacheStore;
use crate::ttl::Ttl;
use config::CacheConfig;
use redis::{Client, Connection};
use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard, TryLockError};

/// Redis-based cache store
pub struct RedisStore {
    connection: Mutex<Connection>,
    config: CacheConfig,
    default_ttl: Ttl,
}

impl Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = match self.connection.try_lock() {
            Ok(_) => "idle",
            Err(TryLockError::WouldBlock) => "busy",
            Err(TryLockError::Poisoned(_)) => "poisoned",
        };

        f.debug_struct("RedisStore")
            .field("url", &self.config.redis_url())
            .field("default_ttl", &self.default_ttl)
            .field("connection", &connection_status)
            .finish()
    }
}

impl RedisStore {
    /// Connect to Redis and verify it answers PING with PONG.
    ///
    /// Fails with [`CacheError::ConnectionError`] if the server cannot be
    /// reached and [`CacheError::PingFailed`] if it answers anything else.
    pub fn connect(config: &CacheConfig) -> Result<Self, CacheError> {
        let default_ttl = Ttl::minutes(config.default_ttl_minutes)?;

        let client = Client::open(config.redis_url()).map_err(CacheError::ConnectionError)?;
        let mut connection = client
            .get_connection_with_timeout(config.connection_timeout())
            .map_err(CacheError::ConnectionError)?;
        connection
            .set_read_timeout(Some(config.operation_timeout()))
            .map_err(CacheError::ConnectionError)?;
        connection
            .set_write_timeout(Some(config.operation_timeout()))
            .map_err(CacheError::ConnectionError)?;

        let pong: String = redis::cmd("PING")
            .query(&mut connection)
            .map_err(CacheError::ConnectionError)?;
        if pong != "PONG" {
            return Err(CacheError::PingFailed(pong));
        }

        tracing::info!(
            host = %config.host,
            port = config.port,
            db = config.db,
            "Successfully connected to Redis"
        );

        Ok(Self {
            connection: Mutex::new(connection),
            config: config.clone(),
            default_ttl,
        })
    }

    fn connection(&self, operation: &'static str) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.connection
            .lock()
            .map_err(|e| CacheError::unavailable(operation, e))
    }

    /// Ping Redis to check connectivity
    pub fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection("ping")?;
        let pong: String = redis::cmd("PING")
            .query(&mut *conn)
            .map_err(|e| CacheError::unavailable("ping", e))?;

        if pong != "PONG" {
            return Err(CacheError::StoreUnavailable {
                operation: "ping",
                message: format!("unexpected reply {pong:?}"),
            });
        }
        Ok(())
    }

    /// Get current configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl CacheStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn default_ttl(&self) -> Ttl {
        self.default_ttl
    }

    fn set_bytes(&self, key: &str, payload: Vec<u8>, ttl: Ttl) -> Result<(), CacheError> {
        let mut conn = self.connection("set")?;

        redis::cmd("SET")
            .arg(key)
            .arg(payload)
            .arg("EX")
            .arg(ttl.as_secs())
            .query::<()>(&mut *conn)
            .map_err(|e| CacheError::unavailable("set", e))
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.connection("get")?;

        redis::cmd("GET")
            .arg(key)
            .query::<Option<Vec<u8>>>(&mut *conn)
            .map_err(|e| CacheError::unavailable("get", e))
    }

    /// `FLUSHDB`: only the configured logical database is emptied
    fn clear(&self) -> Result<(), CacheError> {
        let mut conn = self.connection("clear")?;

        redis::cmd("FLUSHDB")
            .query::<()>(&mut *conn)
            .map_err(|e| CacheError::unavailable("clear", e))?;

        tracing::info!(db = self.config.db, "Cleared all keys from Redis");
        Ok(())
    }
}

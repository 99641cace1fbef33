//! # Configuration Management for flight-insights
//!
//! This crate provides the centralized configuration structures shared by the
//! cache system and the flight analytics layer.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::CacheConfig;
//!
//! let cache_config = CacheConfig::new("localhost".to_string(), 6379, 0, 60)
//!     .with_key_prefix("flights")
//!     .with_connection_timeout(3000);
//!
//! assert_eq!(cache_config.redis_url(), "redis://localhost:6379/0");
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [cache]
//! host = "localhost"
//! port = 6379
//! db = 0
//! default_ttl_minutes = 60
//! key_prefix = "flight_insights"
//! connection_timeout_ms = 5000
//! operation_timeout_ms = 5000
//! enabled = true
//! backend = "redis"
//! ```
//!
//! ### Environment Configuration
//! `REDIS_HOST`, `REDIS_PORT`, `REDIS_DB` and `CACHE_EXP_IN_MINS` are honored,
//! along with `CACHE_ENABLED`, `CACHE_BACKEND` and `CACHE_KEY_PREFIX`.
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // .env, then FLIGHT_INSIGHTS_CONFIG, then ./flight_insights.toml, then the environment
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path, str::FromStr, time::Duration};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./flight_insights.toml";
const CONFIG_PATH_VAR: &str = "FLIGHT_INSIGHTS_CONFIG";

/// TTL applied when the cache is configured from environment variables and
/// `CACHE_EXP_IN_MINS` is not set.
pub const ENV_DEFAULT_TTL_MINUTES: u64 = 1;

/// Largest TTL accepted, in minutes.
///
/// Redis rejects an `EX` whose expiry in milliseconds, plus the server's
/// current time, does not fit an `i64`. Half that range leaves room for the
/// clock.
pub const MAX_TTL_MINUTES: u64 = i64::MAX as u64 / 1000 / 60 / 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Which store backs the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// External Redis server
    #[default]
    Redis,
    /// Process-local store, mostly useful for tests and demos
    Memory,
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid(format!(
                "Unknown cache backend: {other}"
            ))),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub host: String,
    pub port: u16,
    /// Logical database index; `FLUSHDB` is scoped to it
    pub db: i64,
    pub default_ttl_minutes: u64,
    pub key_prefix: String,
    pub connection_timeout_ms: u64,
    pub operation_timeout_ms: u64,
    pub enabled: bool,
    pub backend: CacheBackend,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            default_ttl_minutes: 60,
            key_prefix: "flight_insights".to_string(),
            connection_timeout_ms: 5000,
            operation_timeout_ms: 5000,
            enabled: true,
            backend: CacheBackend::Redis,
        }
    }
}

impl AppConfig {
    /// Load configuration from .env, a TOML file, or the process environment
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let config = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)?
        } else {
            Self {
                cache: CacheConfig::from_env()?,
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new(host: String, port: u16, db: i64, default_ttl_minutes: u64) -> Self {
        Self {
            host,
            port,
            db,
            default_ttl_minutes,
            ..Self::default()
        }
    }

    /// Read the cache configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unset variables fall back to the defaults, except the TTL which
    /// falls back to [`ENV_DEFAULT_TTL_MINUTES`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            host: lookup("REDIS_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "REDIS_PORT", defaults.port)?,
            db: parse_var(&lookup, "REDIS_DB", defaults.db)?,
            default_ttl_minutes: parse_var(&lookup, "CACHE_EXP_IN_MINS", ENV_DEFAULT_TTL_MINUTES)?,
            key_prefix: lookup("CACHE_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            enabled: match lookup("CACHE_ENABLED") {
                Some(raw) => parse_bool("CACHE_ENABLED", &raw)?,
                None => defaults.enabled,
            },
            backend: match lookup("CACHE_BACKEND") {
                Some(raw) => raw.parse()?,
                None => defaults.backend,
            },
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    pub fn with_key_prefix(mut self, key_prefix: &str) -> Self {
        self.key_prefix = key_prefix.to_string();
        self
    }

    pub fn with_connection_timeout(mut self, timeout_ms: u64) -> Self {
        self.connection_timeout_ms = timeout_ms;
        self
    }

    pub fn with_operation_timeout(mut self, timeout_ms: u64) -> Self {
        self.operation_timeout_ms = timeout_ms;
        self
    }

    pub fn with_backend(mut self, backend: CacheBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Build the Redis connection string (redis://host:port/db)
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Validate cache configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Cache host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "Cache port cannot be zero".to_string(),
            ));
        }
        if self.db < 0 {
            return Err(ConfigError::Invalid(
                "Cache db index cannot be negative".to_string(),
            ));
        }
        if self.default_ttl_minutes == 0 {
            return Err(ConfigError::Invalid(
                "Cache default_ttl_minutes must be greater than 0".to_string(),
            ));
        }
        if self.default_ttl_minutes > MAX_TTL_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "Cache default_ttl_minutes cannot exceed {MAX_TTL_MINUTES}"
            )));
        }
        if self.connection_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "Cache connection_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.operation_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "Cache operation_timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("{name}={raw:?}: {e}"))),
        None => Ok(default),
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(format!(
            "{name}={raw:?} is not a boolean"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 6379);
        assert_eq!(config.db, 0);
        assert_eq!(config.default_ttl_minutes, 60);
        assert!(config.enabled);
        assert_eq!(config.backend, CacheBackend::Redis);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_without_overrides_uses_one_minute_ttl() {
        let config = CacheConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 6379);
        assert_eq!(config.db, 0);
        assert_eq!(config.default_ttl_minutes, ENV_DEFAULT_TTL_MINUTES);
    }

    #[test]
    fn test_env_overrides() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            ("REDIS_HOST", "cache.internal"),
            ("REDIS_PORT", "6380"),
            ("REDIS_DB", "3"),
            ("CACHE_EXP_IN_MINS", "15"),
            ("CACHE_BACKEND", "memory"),
            ("CACHE_ENABLED", "false"),
        ]))
        .unwrap();

        assert_eq!(config.host, "cache.internal");
        assert_eq!(config.port, 6380);
        assert_eq!(config.db, 3);
        assert_eq!(config.default_ttl_minutes, 15);
        assert_eq!(config.backend, CacheBackend::Memory);
        assert!(!config.enabled);
        assert_eq!(config.redis_url(), "redis://cache.internal:6380/3");
    }

    #[test]
    fn test_env_rejects_garbage() {
        let err = CacheConfig::from_lookup(lookup_from(&[("REDIS_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("REDIS_PORT")));

        let err = CacheConfig::from_lookup(lookup_from(&[("CACHE_EXP_IN_MINS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = CacheConfig::from_lookup(lookup_from(&[("CACHE_BACKEND", "memcached")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_ttl_upper_bound() {
        let huge = u64::MAX.to_string();
        let err = CacheConfig::from_lookup(lookup_from(&[
            ("CACHE_EXP_IN_MINS", huge.as_str()),
            ("CACHE_BACKEND", "memory"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("default_ttl_minutes")));

        let over = CacheConfig::new("localhost".to_string(), 6379, 0, MAX_TTL_MINUTES + 1);
        assert!(over.validate().is_err());

        let max = CacheConfig::new("localhost".to_string(), 6379, 0, MAX_TTL_MINUTES);
        assert!(max.validate().is_ok());
        assert!(max.default_ttl_minutes * 60 <= i64::MAX as u64 / 1000);
    }

    #[test]
    fn test_toml_partial_section() {
        let config = AppConfig::from_toml_str(
            r#"
            [cache]
            host = "redis.example"
            default_ttl_minutes = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.host, "redis.example");
        assert_eq!(config.cache.port, 6379);
        assert_eq!(config.cache.default_ttl_minutes, 5);
    }

    #[test]
    fn test_toml_validation() {
        let err = AppConfig::from_toml_str(
            r#"
            [cache]
            host = ""
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_builders() {
        let config = CacheConfig::new("10.0.0.5".to_string(), 6379, 2, 30)
            .with_key_prefix("ops")
            .with_connection_timeout(250)
            .with_operation_timeout(750)
            .with_backend(CacheBackend::Memory)
            .disabled();

        assert_eq!(config.key_prefix, "ops");
        assert_eq!(config.connection_timeout(), Duration::from_millis(250));
        assert_eq!(config.operation_timeout(), Duration::from_millis(750));
        assert_eq!(config.backend, CacheBackend::Memory);
        assert!(!config.enabled);
    }
}

//! Time-to-live expressed in whole minutes

use crate::errors::CacheError;
use std::fmt;
use std::time::Duration;

/// Expiry applied to a cache entry.
///
/// TTLs are whole minutes at the API boundary; stores convert to seconds
/// themselves. Zero and anything above [`Ttl::MAX_MINUTES`] are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ttl {
    minutes: u64,
}

impl Ttl {
    pub const DEFAULT: Ttl = Ttl { minutes: 60 };

    /// Expiry in milliseconds must fit an `i64`
    pub const MAX_MINUTES: u64 = config::MAX_TTL_MINUTES;

    pub fn minutes(minutes: u64) -> Result<Self, CacheError> {
        if minutes == 0 || minutes > Self::MAX_MINUTES {
            return Err(CacheError::InvalidTtl(minutes));
        }
        Ok(Self { minutes })
    }

    pub fn as_minutes(&self) -> u64 {
        self.minutes
    }

    /// Expiry in seconds, as sent with `SET ... EX`
    pub fn as_secs(&self) -> u64 {
        self.minutes.saturating_mul(60)
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.as_secs())
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minutes", self.minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_to_seconds() {
        let ttl = Ttl::minutes(1).unwrap();
        assert_eq!(ttl.as_secs(), 60);
        assert_eq!(ttl.as_duration(), Duration::from_secs(60));
        assert_eq!(Ttl::default().as_secs(), 3600);
    }

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(Ttl::minutes(0), Err(CacheError::InvalidTtl(0))));
    }

    #[test]
    fn test_upper_bound() {
        assert!(matches!(
            Ttl::minutes(u64::MAX),
            Err(CacheError::InvalidTtl(u64::MAX))
        ));
        assert!(Ttl::minutes(Ttl::MAX_MINUTES + 1).is_err());

        let max = Ttl::minutes(Ttl::MAX_MINUTES).unwrap();
        assert!(max.as_secs() <= i64::MAX as u64 / 1000);
        assert_eq!(max.as_duration(), Duration::from_secs(max.as_secs()));
    }
}

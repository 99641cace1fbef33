//! Convenience re-exports for common flight-insights usage
//!
//! # Example
//!
//! ```rust
//! use flight_insights::prelude::*;
//!
//! let insights = FlightInsights::uncached(FlightTable::default());
//! assert!(!insights.memoizer().is_enabled());
//! ```

pub use crate::data_source::{FlightAttribute, FlightDataSource, FlightRecord, FlightTable};
pub use crate::errors::InsightsError;
pub use crate::insights::FlightInsights;
pub use crate::timing::timed;

// Re-export centralized config
pub use config::{AppConfig, CacheBackend, CacheConfig, ConfigError};

// Re-export cache system
pub use cache_system::prelude::*;

//! # flight-insights
//!
//! Delay and traffic statistics over flight records, memoized behind a
//! time-expiring Redis cache.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flight_insights::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!
//!     let flights = FlightTable::new(vec![
//!         FlightRecord::new("VX", 10, "SFO", 6, Some(12.0)),
//!         FlightRecord::new("VX", 11, "LAX", 7, Some(3.0)),
//!     ]);
//!
//!     let insights = FlightInsights::from_config(flights, &config.cache)?;
//!
//!     let avg = insights.avg_dep_delay_per_airline("VX", None)?;
//!     let summer = insights.avg_dep_delay_per_airline("VX", Some(&[6, 7, 8][..]))?;
//!     let departures = insights.total_flights_per_origin_airport("SFO")?;
//!     println!("VX: {avg:.1} min avg, {summer:.1} in summer; SFO: {departures} flights");
//!
//!     Ok(())
//! }
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

pub mod data_source;
pub mod errors;
pub mod insights;
pub mod prelude;
pub mod timing;

// Re-export the main public types for convenience
pub use data_source::{FlightAttribute, FlightDataSource, FlightRecord, FlightTable};
pub use errors::InsightsError;
pub use insights::FlightInsights;

// Re-export centralized config
pub use config::{AppConfig, CacheBackend, CacheConfig};

// Re-export internal crates used in the public API
pub use cache_system;
pub use config;

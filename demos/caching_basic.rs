//! # Basic Caching Example
//!
//! This example demonstrates memoized flight insights:
//! - Loading cache configuration (.env, TOML or environment)
//! - Falling back to an in-memory store when Redis is not running
//! - Cache hits vs misses, measured by wall time
//! - Clearing the cache
//!
//! ```text
//! docker run -d --name redis -p 6379:6379 redis:7-alpine
//! RUST_LOG=info cargo run --example caching_basic
//! ```

use flight_insights::prelude::*;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn sample_flights() -> FlightTable {
    let airlines = ["VX", "AA", "DL", "UA"];
    let airports = ["SFO", "LAX", "JFK", "ATL"];

    (0..200_000u32)
        .map(|i| {
            let airline = airlines[(i % 4) as usize];
            let origin = airports[((i / 4) % 4) as usize];
            let delay = match i % 7 {
                0 => None,
                n => Some(f64::from(n * 9 % 41) - 10.0),
            };
            FlightRecord::new(airline, 100 + i % 500, origin, 1 + i % 12, delay)
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("flight-insights Basic Caching Example");
    println!("=====================================");

    let config = AppConfig::load()?;
    let flights = sample_flights();

    let insights = match FlightInsights::from_config(flights.clone(), &config.cache) {
        Ok(insights) => insights,
        Err(InsightsError::Cache(e)) if e.is_connection_error() => {
            println!("Redis connection failed: {e}");
            println!("Falling back to an in-memory cache");
            let memory = config.cache.clone().with_backend(CacheBackend::Memory);
            FlightInsights::from_config(flights, &memory)?
        }
        Err(e) => return Err(e.into()),
    };
    println!("Cache: {:?}\n", insights.memoizer());

    for round in ["miss", "hit"] {
        let start = Instant::now();
        let avg = insights.avg_dep_delay_per_airline("VX", None)?;
        let summer = insights.avg_dep_delay_per_airline("VX", Some(&[6, 7, 8][..]))?;
        let max = insights.max_dep_delay_per_airline("VX", None)?;
        let december = insights.max_dep_delay_per_airline("VX", Some(&[12][..]))?;
        let sfo = insights.total_flights_per_origin_airport("SFO")?;

        println!("Round ({round}) took {:?}", start.elapsed());
        println!("  Average departure delay for VX: {} minutes", avg as i64);
        println!("  Average departure delay for VX in summer: {} minutes", summer as i64);
        println!("  Max departure delay for VX: {} minutes", max as i64);
        println!("  Max departure delay for VX in December: {} minutes", december as i64);
        println!("  Total flights for SFO: {sfo}\n");
    }

    match insights.avg_dep_delay_per_airline("ZZ", None) {
        Err(e) => println!("Unknown airline is rejected and not cached: {e}"),
        Ok(v) => println!("Unexpected result for ZZ: {v}"),
    }

    insights.memoizer().clear()?;
    println!("Cache cleared");

    Ok(())
}

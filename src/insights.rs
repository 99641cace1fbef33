//! Delay and traffic statistics over a flight data source
//!
//! Every query validates its input, then runs through the [`Memoizer`]
//! under a fully qualified operation id.

use crate::data_source::{FlightAttribute, FlightDataSource};
use crate::errors::InsightsError;
use crate::timing::timed;
use cache_system::Memoizer;
use config::CacheConfig;

const AVG_DEP_DELAY: &str = "FlightInsights::avg_dep_delay_per_airline";
const MAX_DEP_DELAY: &str = "FlightInsights::max_dep_delay_per_airline";
const TOTAL_FLIGHTS: &str = "FlightInsights::total_flights_per_origin_airport";

/// Analytical queries over flight data
#[derive(Debug)]
pub struct FlightInsights<S> {
    source: S,
    memoizer: Memoizer,
}

impl<S: FlightDataSource> FlightInsights<S> {
    pub fn new(source: S, memoizer: Memoizer) -> Self {
        Self { source, memoizer }
    }

    /// Every query recomputes
    pub fn uncached(source: S) -> Self {
        Self::new(source, Memoizer::disabled())
    }

    /// Connect the cache described by `config` (or none, if it is disabled)
    pub fn from_config(source: S, config: &CacheConfig) -> Result<Self, InsightsError> {
        let memoizer = Memoizer::from_config(config)?;
        crate::debug_log!("FlightInsights built with {:?}", memoizer);
        Ok(Self::new(source, memoizer))
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn memoizer(&self) -> &Memoizer {
        &self.memoizer
    }

    /// Average positive departure delay in minutes for `airline`,
    /// optionally restricted to `months`
    pub fn avg_dep_delay_per_airline(
        &self,
        airline: &str,
        months: Option<&[u32]>,
    ) -> Result<f64, InsightsError> {
        timed("avg_dep_delay_per_airline", || -> Result<f64, InsightsError> {
            let months = validate_airline_query(airline, months)?;

            self.memoizer.memoize(
                AVG_DEP_DELAY,
                |args| args.arg(airline).named("months", &months),
                || {
                    self.airline_rows(airline, months.as_deref())?
                        .filter_positive_delays()
                        .mean(FlightAttribute::DepartureDelay)
                        .ok_or_else(|| no_positive_delays(airline))
                },
            )
        })
    }

    /// Largest departure delay in minutes for `airline`,
    /// optionally restricted to `months`
    pub fn max_dep_delay_per_airline(
        &self,
        airline: &str,
        months: Option<&[u32]>,
    ) -> Result<f64, InsightsError> {
        timed("max_dep_delay_per_airline", || -> Result<f64, InsightsError> {
            let months = validate_airline_query(airline, months)?;

            self.memoizer.memoize(
                MAX_DEP_DELAY,
                |args| args.arg(airline).named("months", &months),
                || {
                    self.airline_rows(airline, months.as_deref())?
                        .filter_positive_delays()
                        .max(FlightAttribute::DepartureDelay)
                        .ok_or_else(|| no_positive_delays(airline))
                },
            )
        })
    }

    /// Number of distinct flight numbers departing from `airport`
    pub fn total_flights_per_origin_airport(&self, airport: &str) -> Result<u64, InsightsError> {
        timed("total_flights_per_origin_airport", || -> Result<u64, InsightsError> {
            if airport.trim().is_empty() {
                return Err(InsightsError::validation("Airport name cannot be empty"));
            }

            self.memoizer.memoize(
                TOTAL_FLIGHTS,
                |args| args.arg(airport),
                || {
                    let rows = self.source.filter_by_origin_airport(airport);
                    if rows.is_empty() {
                        return Err(InsightsError::validation(format!(
                            "No data found for airport: {airport}"
                        )));
                    }
                    Ok(rows.count_unique(FlightAttribute::FlightNumber))
                },
            )
        })
    }

    fn airline_rows(&self, airline: &str, months: Option<&[u32]>) -> Result<S, InsightsError> {
        let mut rows = self.source.filter_by_airline(airline);
        if let Some(months) = months {
            rows = rows.filter_by_months(months);
        }

        if rows.is_empty() {
            let detail = months
                .map(|m| format!(" with months: {m:?}"))
                .unwrap_or_default();
            return Err(InsightsError::validation(format!(
                "No data found for airline: {airline}{detail}"
            )));
        }
        Ok(rows)
    }
}

/// Check the airline and normalize the month filter.
///
/// Months come back sorted and de-duplicated so equivalent filters share a
/// cache entry; an empty list means no filter.
fn validate_airline_query(
    airline: &str,
    months: Option<&[u32]>,
) -> Result<Option<Vec<u32>>, InsightsError> {
    if airline.trim().is_empty() {
        return Err(InsightsError::validation("Airline name cannot be empty"));
    }

    let Some(months) = months.filter(|m| !m.is_empty()) else {
        return Ok(None);
    };
    if months.iter().any(|m| !(1..=12).contains(m)) {
        return Err(InsightsError::validation(
            "Months must be integers between 1 and 12",
        ));
    }

    let mut months = months.to_vec();
    months.sort_unstable();
    months.dedup();
    crate::trace_log!("Normalized month filter for {}: {:?}", airline, months);
    Ok(Some(months))
}

fn no_positive_delays(airline: &str) -> InsightsError {
    InsightsError::validation(format!(
        "No positive departure delays for airline: {airline}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_airline_query() {
        assert!(validate_airline_query("", None).unwrap_err().is_validation());
        assert!(validate_airline_query("   ", None).unwrap_err().is_validation());
        assert!(validate_airline_query("VX", Some(&[0][..])).unwrap_err().is_validation());
        assert!(validate_airline_query("VX", Some(&[13][..])).unwrap_err().is_validation());

        assert_eq!(validate_airline_query("VX", None).unwrap(), None);
        assert_eq!(validate_airline_query("VX", Some(&[][..])).unwrap(), None);
        assert_eq!(
            validate_airline_query("VX", Some(&[8, 6, 7, 6][..])).unwrap(),
            Some(vec![6, 7, 8])
        );
    }
}

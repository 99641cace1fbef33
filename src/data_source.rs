//! Flight records and the data source contract
//!
//! Insights only speak in [`FlightAttribute`]s. Each data source maps those
//! logical attributes onto however it actually stores rows.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Logical flight attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightAttribute {
    Airline,
    DepartureDelay,
    Month,
    OriginAirport,
    FlightNumber,
}

/// One flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub airline: String,
    pub flight_number: u32,
    pub origin_airport: String,
    /// 1 through 12
    pub month: u32,
    /// Minutes; negative for early departures, `None` when not reported
    pub departure_delay: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DistinctValue<'a> {
    Text(&'a str),
    Integer(u32),
    Float(u64),
}

impl FlightRecord {
    pub fn new(
        airline: &str,
        flight_number: u32,
        origin_airport: &str,
        month: u32,
        departure_delay: Option<f64>,
    ) -> Self {
        Self {
            airline: airline.to_string(),
            flight_number,
            origin_airport: origin_airport.to_string(),
            month,
            departure_delay,
        }
    }

    /// Numeric value of `attribute`, if it has one
    pub fn numeric(&self, attribute: FlightAttribute) -> Option<f64> {
        match attribute {
            FlightAttribute::DepartureDelay => self.departure_delay,
            FlightAttribute::Month => Some(f64::from(self.month)),
            FlightAttribute::FlightNumber => Some(f64::from(self.flight_number)),
            FlightAttribute::Airline | FlightAttribute::OriginAirport => None,
        }
    }

    fn distinct(&self, attribute: FlightAttribute) -> Option<DistinctValue<'_>> {
        match attribute {
            FlightAttribute::Airline => Some(DistinctValue::Text(&self.airline)),
            FlightAttribute::OriginAirport => Some(DistinctValue::Text(&self.origin_airport)),
            FlightAttribute::Month => Some(DistinctValue::Integer(self.month)),
            FlightAttribute::FlightNumber => Some(DistinctValue::Integer(self.flight_number)),
            FlightAttribute::DepartureDelay => self
                .departure_delay
                .map(|d| DistinctValue::Float(d.to_bits())),
        }
    }
}

/// Filtering and aggregation over flight records.
///
/// Filters return a narrowed source and leave `self` untouched. Aggregates
/// skip records where the attribute has no value.
pub trait FlightDataSource: Sized {
    fn filter_by_airline(&self, airline: &str) -> Self;

    fn filter_by_months(&self, months: &[u32]) -> Self;

    /// Only flights that left late
    fn filter_positive_delays(&self) -> Self;

    fn filter_by_origin_airport(&self, airport: &str) -> Self;

    /// `None` when no record has a value for `attribute`
    fn mean(&self, attribute: FlightAttribute) -> Option<f64>;

    /// `None` when no record has a value for `attribute`
    fn max(&self, attribute: FlightAttribute) -> Option<f64>;

    fn count_unique(&self, attribute: FlightAttribute) -> u64;

    fn is_empty(&self) -> bool;
}

/// In-memory flight table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightTable {
    records: Vec<FlightRecord>,
}

impl FlightTable {
    pub fn new(records: Vec<FlightRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn filtered<P>(&self, predicate: P) -> Self
    where
        P: Fn(&FlightRecord) -> bool,
    {
        Self {
            records: self.records.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    fn values(&self, attribute: FlightAttribute) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(move |r| r.numeric(attribute))
    }
}

impl FromIterator<FlightRecord> for FlightTable {
    fn from_iter<I: IntoIterator<Item = FlightRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FlightDataSource for FlightTable {
    fn filter_by_airline(&self, airline: &str) -> Self {
        self.filtered(|r| r.airline == airline)
    }

    fn filter_by_months(&self, months: &[u32]) -> Self {
        self.filtered(|r| months.contains(&r.month))
    }

    fn filter_positive_delays(&self) -> Self {
        self.filtered(|r| r.departure_delay.is_some_and(|d| d > 0.0))
    }

    fn filter_by_origin_airport(&self, airport: &str) -> Self {
        self.filtered(|r| r.origin_airport == airport)
    }

    fn mean(&self, attribute: FlightAttribute) -> Option<f64> {
        let (sum, count) = self
            .values(attribute)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    fn max(&self, attribute: FlightAttribute) -> Option<f64> {
        self.values(attribute).reduce(f64::max)
    }

    fn count_unique(&self, attribute: FlightAttribute) -> u64 {
        self.records
            .iter()
            .filter_map(|r| r.distinct(attribute))
            .collect::<HashSet<_>>()
            .len() as u64
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

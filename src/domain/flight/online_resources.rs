//! Data fetched from online sources for one flight.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Loosely-typed records returned by an upstream data source.
///
/// The upstream owns the schema, so records are kept as raw JSON values.
pub type Records = Vec<Value>;

/// Outcome of one upstream fetch.
///
/// A failed fetch keeps its reason for logging but serializes as an empty
/// list, the same as a successful fetch that found nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(Records),
    Unavailable { reason: String },
}

impl FetchOutcome {
    /// Creates an unavailable outcome.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Records fetched, empty when the fetch failed.
    pub fn records(&self) -> &[Value] {
        match self {
            Self::Fetched(records) => records,
            Self::Unavailable { .. } => &[],
        }
    }

    /// Returns true if the upstream call failed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Failure reason, if the fetch failed.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Fetched(_) => None,
            Self::Unavailable { reason } => Some(reason),
        }
    }
}

impl Default for FetchOutcome {
    fn default() -> Self {
        Self::Fetched(Vec::new())
    }
}

impl<E: fmt::Display> From<Result<Records, E>> for FetchOutcome {
    fn from(result: Result<Records, E>) -> Self {
        match result {
            Ok(records) => Self::Fetched(records),
            Err(err) => Self::unavailable(err.to_string()),
        }
    }
}

impl Serialize for FetchOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records().serialize(serializer)
    }
}

/// PIREPs around the two ends of the route.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PirepData {
    pub departure: FetchOutcome,
    pub destination: FetchOutcome,
}

/// Weather products for all airports of the flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherData {
    pub metar: FetchOutcome,
    pub taf: FetchOutcome,
    pub pireps: PirepData,
}

/// Everything fetched from online sources for one flight.
///
/// `notams`, `navaid_info` and `airspace_info` have no upstream yet and stay
/// empty; they are serialized anyway so the response shape never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OnlineResources {
    pub weather: WeatherData,
    pub notams: Records,
    pub airport_info: FetchOutcome,
    pub navaid_info: Map<String, Value>,
    pub airspace_info: Map<String, Value>,
}

impl OnlineResources {
    /// Upstream fields that failed, with their failure reasons.
    pub fn unavailable_sources(&self) -> Vec<(&'static str, &str)> {
        [
            ("metar", &self.weather.metar),
            ("taf", &self.weather.taf),
            ("pireps.departure", &self.weather.pireps.departure),
            ("pireps.destination", &self.weather.pireps.destination),
            ("airport_info", &self.airport_info),
        ]
        .into_iter()
        .filter_map(|(name, outcome)| outcome.failure_reason().map(|reason| (name, reason)))
        .collect()
    }
}

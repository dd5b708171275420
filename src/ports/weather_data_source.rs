//! Weather Data Source Port - Interface for the aviation weather data API.
//!
//! Each operation is one independent read against the upstream. Failures are
//! returned as `WeatherError` so callers can tell "the upstream had nothing"
//! (`Ok(vec![])`) from "the upstream could not be reached" (`Err(_)`).
//!
//! Records are kept as raw JSON because the upstream owns their schema.

use async_trait::async_trait;

use crate::domain::flight::Records;

/// Default METAR look-back window in hours.
pub const DEFAULT_METAR_HOURS: u32 = 2;

/// Default PIREP search radius in statute miles.
pub const DEFAULT_PIREP_DISTANCE_MILES: u32 = 50;

/// Port for aviation weather and airport data.
///
/// Codes and ids are comma-separated lists, e.g. `"KRNT,KORD"`, passed through
/// to the upstream unchanged.
#[async_trait]
pub trait WeatherDataSource: Send + Sync {
    /// METAR observations for the given airports over the last `hours` hours.
    async fn get_metar(&self, airport_codes: &str, hours: u32) -> Result<Records, WeatherError>;

    /// Terminal aerodrome forecasts for the given airports.
    async fn get_taf(&self, airport_codes: &str) -> Result<Records, WeatherError>;

    /// Recent pilot reports within `distance_miles` of a single airport.
    async fn get_pireps(
        &self,
        airport_code: &str,
        distance_miles: u32,
    ) -> Result<Records, WeatherError>;

    /// Airport information for the given airports.
    async fn get_airport_info(&self, airport_codes: &str) -> Result<Records, WeatherError>;

    /// Navigational aid information for the given navaid ids.
    async fn get_navaid_info(&self, navaid_ids: &str) -> Result<Records, WeatherError>;
}

/// Weather data source errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeatherError {
    /// Request did not complete within the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not a JSON array of records.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl WeatherError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

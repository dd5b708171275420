//! Aviation weather API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::ports::{DEFAULT_METAR_HOURS, DEFAULT_PIREP_DISTANCE_MILES};

/// Aviation weather data API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the data API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// METAR look-back window in hours
    #[serde(default = "default_metar_hours")]
    pub metar_hours: u32,

    /// PIREP search radius in statute miles
    #[serde(default = "default_pirep_distance")]
    pub pirep_distance_miles: u32,

    /// PIREP maximum report age in hours
    #[serde(default = "default_pirep_age")]
    pub pirep_age_hours: u32,
}

impl WeatherConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate weather API configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("weather.base_url"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("weather.timeout_secs"));
        }
        Ok(())
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            metar_hours: default_metar_hours(),
            pirep_distance_miles: default_pirep_distance(),
            pirep_age_hours: default_pirep_age(),
        }
    }
}

fn default_base_url() -> String {
    "https://aviationweather.gov/api/data".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_metar_hours() -> u32 {
    DEFAULT_METAR_HOURS
}

fn default_pirep_distance() -> u32 {
    DEFAULT_PIREP_DISTANCE_MILES
}

fn default_pirep_age() -> u32 {
    6
}

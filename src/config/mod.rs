//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `FLIGHT_BRIEFING` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use flight_briefing::config::AppConfig;
//!
//! let config = AppConfig::load_validated().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod agent;
mod error;
mod server;
mod weather;

pub use agent::AgentConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use weather::WeatherConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Aviation weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,

    /// AI agent backend configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `FLIGHT_BRIEFING` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FLIGHT_BRIEFING__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FLIGHT_BRIEFING__AGENT__AGENT_ID=asst_...` -> `agent.agent_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FLIGHT_BRIEFING")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration and validate it in one step
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadError` if values cannot be parsed and
    /// `ConfigError::ValidationFailed` if a value is invalid.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// The agent section is where startup fails most often: endpoint, agent
    /// identity and access token have no defaults.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.weather.validate()?;
        self.agent.validate(self.is_production())?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

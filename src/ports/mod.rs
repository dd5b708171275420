//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `WeatherDataSource` - Aviation weather and airport data API
//! - `AgentBackend` / `AgentConnector` - Conversational agent service

mod agent_backend;
mod weather_data_source;

pub use agent_backend::{
    AgentBackend, AgentConnector, AgentError, AgentRun, MessageRole, RunError, RunStatus,
    ThreadMessage,
};
pub use weather_data_source::{
    WeatherDataSource, WeatherError, DEFAULT_METAR_HOURS, DEFAULT_PIREP_DISTANCE_MILES,
};

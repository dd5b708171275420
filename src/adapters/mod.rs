//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `aviation_weather` - Weather and airport data API client
//! - `agent` - AI agent backend (Azure AI Foundry Agents)
//! - `http` - REST API served to the briefing front end

pub mod agent;
pub mod aviation_weather;
pub mod http;

pub use agent::{FoundryConnector, MockAgentBackend, MockAgentConnector};
pub use aviation_weather::{AviationWeatherClient, MockWeatherSource};
pub use http::{app_router, FlightAppState};

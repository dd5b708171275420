//! Agent Backend Adapters.
//!
//! Implementations of the AgentBackend and AgentConnector ports.
//!
//! - `FoundryConnector` / `FoundryAgentBackend` - Azure AI Foundry Agents REST API
//! - `MockAgentBackend` / `MockAgentConnector` - Configurable mocks for testing

mod foundry_backend;
mod mock_backend;

pub use foundry_backend::{FoundryAgentBackend, FoundryConnector};
pub use mock_backend::{AgentCall, MockAgentBackend, MockAgentConnector, MockStep};

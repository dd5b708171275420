//! AI agent backend configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI agent backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Project endpoint of the agent service
    pub project_endpoint: Option<String>,

    /// Identity of the pre-provisioned agent that runs the briefing
    pub agent_id: Option<String>,

    /// Bearer token for the agent service
    pub access_token: Option<Secret<String>>,

    /// API version sent with every request
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Response wait timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Interval between run status polls in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl AgentConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Project endpoint without a trailing slash, or empty when unset
    pub fn endpoint(&self) -> &str {
        self.project_endpoint
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
    }

    /// Agent identity, or empty when unset
    pub fn agent_id(&self) -> &str {
        self.agent_id.as_deref().unwrap_or_default()
    }

    /// Check if the access token is configured
    pub fn has_access_token(&self) -> bool {
        self.access_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }

    /// Validate agent configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        let endpoint = self.endpoint();
        if endpoint.is_empty() {
            return Err(ValidationError::MissingRequired("PROJECT_ENDPOINT"));
        }
        if self.agent_id().is_empty() {
            return Err(ValidationError::MissingRequired("AGENT_ID"));
        }
        if !self.has_access_token() {
            return Err(ValidationError::MissingRequired("ACCESS_TOKEN"));
        }

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("agent.project_endpoint"));
        }
        if production && !endpoint.starts_with("https://") {
            return Err(ValidationError::EndpointMustBeHttps);
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("agent.timeout_secs"));
        }
        if self.poll_interval_ms == 0 || self.poll_interval() > self.timeout() {
            return Err(ValidationError::InvalidPollInterval);
        }

        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            project_endpoint: None,
            agent_id: None,
            access_token: None,
            api_version: default_api_version(),
            timeout_secs: default_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    500
}

//! Foundry Agent Backend - Implementation of AgentBackend for the Azure AI
//! Foundry Agents REST API.
//!
//! Threads, messages and runs map one-to-one onto the service's resources.
//! Runs are polled at a fixed interval until they reach a terminal status,
//! bounded by the configured response timeout.
//!
//! # Configuration
//!
//! ```ignore
//! let connector = FoundryConnector::new(config.agent.clone());
//! let backend = connector.connect().await?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AgentConfig;
use crate::ports::{
    AgentBackend, AgentConnector, AgentError, AgentRun, MessageRole, RunError, RunStatus,
    ThreadMessage,
};

/// Builds `FoundryAgentBackend` connections from configuration.
#[derive(Debug, Clone)]
pub struct FoundryConnector {
    config: AgentConfig,
}

impl FoundryConnector {
    pub fn new(config: AgentConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AgentConnector for FoundryConnector {
    async fn connect(&self) -> Result<Arc<dyn AgentBackend>, AgentError> {
        let token = self
            .config
            .access_token
            .clone()
            .filter(|t| !t.expose_secret().is_empty())
            .ok_or_else(|| AgentError::connection("no access token configured"))?;

        let client = Client::builder()
            .timeout(self.config.timeout())
            .build()
            .map_err(|e| AgentError::connection(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(endpoint = %self.config.endpoint(), "Connected to agent backend");

        Ok(Arc::new(FoundryAgentBackend {
            client,
            endpoint: self.config.endpoint().to_string(),
            api_version: self.config.api_version.clone(),
            token,
            timeout: self.config.timeout(),
            poll_interval: self.config.poll_interval(),
        }))
    }
}

/// One authenticated connection to a Foundry project.
pub struct FoundryAgentBackend {
    client: Client,
    endpoint: String,
    api_version: String,
    token: Secret<String>,
    timeout: Duration,
    poll_interval: Duration,
}

impl FoundryAgentBackend {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    /// Adds credentials and api-version, sends, and checks the status.
    async fn send(&self, request: RequestBuilder) -> Result<Response, AgentError> {
        let response = request
            .bearer_auth(self.token.expose_secret())
            .query(&[("api-version", self.api_version.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    AgentError::network(format!("Connection failed: {}", e))
                } else {
                    AgentError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(AgentError::AuthenticationFailed),
            code => Err(AgentError::Status { status: code, body }),
        }
    }

    async fn send_json<T: for<'de> Deserialize<'de>>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, AgentError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| AgentError::parse(format!("Failed to parse response: {}", e)))
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<RunObject, AgentError> {
        let url = self.url(&format!("threads/{}/runs/{}", thread_id, run_id));
        self.send_json(self.client.get(url)).await
    }

    /// Polls a run until it is terminal.
    async fn poll_run(&self, thread_id: &str, mut run: RunObject) -> Result<RunObject, AgentError> {
        while !run.status.is_terminal() {
            sleep(self.poll_interval).await;
            run = self.get_run(thread_id, &run.id).await?;
            tracing::debug!(run_id = %run.id, status = ?run.status, "Polled agent run");
        }
        Ok(run)
    }

    /// Reads every message page, oldest first. Stops on the last page, an
    /// empty page, or a cursor that does not advance.
    async fn collect_pages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AgentError> {
        let url = self.url(&format!("threads/{}/messages", thread_id));
        let mut messages = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).query(&[("order", "asc")]);
            if let Some(ref cursor) = after {
                request = request.query(&[("after", cursor.as_str())]);
            }

            let page: MessageList = self.send_json(request).await?;
            if page.data.is_empty() {
                break;
            }
            let next = page.last_id.clone();
            messages.extend(page.data.into_iter().filter_map(MessageObject::into_thread_message));

            match next {
                Some(cursor) if page.has_more && after.as_deref() != Some(cursor.as_str()) => {
                    after = Some(cursor)
                }
                Some(cursor) if page.has_more => {
                    tracing::warn!(thread_id = %thread_id, cursor = %cursor, "Message cursor did not advance");
                    break;
                }
                _ => break,
            }
        }

        Ok(messages)
    }
}

#[async_trait]
impl AgentBackend for FoundryAgentBackend {
    async fn create_thread(&self) -> Result<String, AgentError> {
        let thread: ThreadObject = self
            .send_json(self.client.post(self.url("threads")).json(&serde_json::json!({})))
            .await?;
        Ok(thread.id)
    }

    async fn post_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), AgentError> {
        let url = self.url(&format!("threads/{}/messages", thread_id));
        self.send(self.client.post(url).json(&CreateMessageRequest { role, content }))
            .await?;
        Ok(())
    }

    async fn create_and_process_run(
        &self,
        thread_id: &str,
        agent_id: &str,
    ) -> Result<AgentRun, AgentError> {
        let url = self.url(&format!("threads/{}/runs", thread_id));
        let run: RunObject = self
            .send_json(self.client.post(url).json(&CreateRunRequest {
                assistant_id: agent_id,
            }))
            .await?;

        let run = tokio::time::timeout(self.timeout, self.poll_run(thread_id, run))
            .await
            .map_err(|_| AgentError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })??;

        Ok(AgentRun {
            id: run.id,
            status: run.status,
            last_error: run.last_error,
        })
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AgentError> {
        tokio::time::timeout(self.timeout, self.collect_pages(thread_id))
            .await
            .map_err(|_| AgentError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })?
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<(), AgentError> {
        let url = self.url(&format!("threads/{}", thread_id));
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

// ----- Foundry Agents API Types -----

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    role: MessageRole,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunObject {
    id: String,
    status: RunStatus,
    #[serde(default)]
    last_error: Option<RunError>,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    data: Vec<MessageObject>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    last_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageObject {
    id: String,
    role: String,
    #[serde(default)]
    run_id: Option<String>,
    #[serde(default)]
    content: Vec<MessageContent>,
}

impl MessageObject {
    /// Converts to a port message; messages with an unknown role are dropped.
    fn into_thread_message(self) -> Option<ThreadMessage> {
        let role = match self.role.as_str() {
            "user" => MessageRole::User,
            "assistant" => MessageRole::Assistant,
            _ => return None,
        };
        let text_chunks = self
            .content
            .into_iter()
            .filter_map(|c| match c {
                MessageContent::Text { text } => Some(text.value),
                MessageContent::Other => None,
            })
            .collect();

        Some(ThreadMessage {
            id: self.id,
            role,
            run_id: self.run_id.filter(|id| !id.is_empty()),
            text_chunks,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MessageContent {
    Text { text: TextValue },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}

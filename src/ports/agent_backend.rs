//! Agent Backend Port - Interface for a stateful conversational agent service.
//!
//! The backend scopes each exchange in a thread: messages are posted to the
//! thread, a run executes the agent against the thread's history, and the
//! agent's replies are read back as new thread messages.
//!
//! # Design
//!
//! - `AgentBackend` is one established connection (credential + HTTP client)
//! - `AgentConnector` builds that connection; it is called lazily and at most
//!   once per successful connection by the briefing client
//! - `create_and_process_run` returns only once the run is terminal
//!
//! # Example
//!
//! ```ignore
//! let thread_id = backend.create_thread().await?;
//! backend.post_message(&thread_id, MessageRole::User, "Brief me").await?;
//! let run = backend.create_and_process_run(&thread_id, "asst_123").await?;
//! let messages = backend.list_messages(&thread_id).await?;
//! backend.delete_thread(&thread_id).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Port for one established connection to the agent backend.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Opens a new conversation thread and returns its id.
    async fn create_thread(&self) -> Result<String, AgentError>;

    /// Appends a message to a thread.
    async fn post_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), AgentError>;

    /// Starts a run of the agent on a thread and waits until it is terminal.
    async fn create_and_process_run(
        &self,
        thread_id: &str,
        agent_id: &str,
    ) -> Result<AgentRun, AgentError>;

    /// All messages of a thread, oldest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AgentError>;

    /// Deletes a thread and everything in it.
    async fn delete_thread(&self, thread_id: &str) -> Result<(), AgentError>;
}

/// Builds the backend connection on first use.
#[async_trait]
pub trait AgentConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn AgentBackend>, AgentError>;
}

/// Role of a thread message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Pilot-side input.
    User,
    /// Agent output.
    Assistant,
}

/// Status of an agent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Expired,
    Incomplete,
    /// A status this client does not know; treated as still running.
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Returns true once the run will not change any more.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Cancelled
                | RunStatus::Failed
                | RunStatus::Completed
                | RunStatus::Expired
                | RunStatus::Incomplete
        )
    }
}

/// Error detail reported by the backend for a failed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code.is_empty(), self.message.is_empty()) {
            (false, false) => write!(f, "{}: {}", self.code, self.message),
            (true, false) => write!(f, "{}", self.message),
            (false, true) => write!(f, "{}", self.code),
            (true, true) => write!(f, "unknown error"),
        }
    }
}

/// One run of an agent on a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRun {
    pub id: String,
    pub status: RunStatus,
    pub last_error: Option<RunError>,
}

impl AgentRun {
    /// Creates a run with the given status and no error.
    pub fn new(id: impl Into<String>, status: RunStatus) -> Self {
        Self {
            id: id.into(),
            status,
            last_error: None,
        }
    }

    /// Sets the backend's error detail.
    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.last_error = Some(RunError {
            code: code.into(),
            message: message.into(),
        });
        self
    }

    /// Error detail as text, for messages shown to the pilot.
    pub fn error_detail(&self) -> String {
        self.last_error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "no error detail reported".to_string())
    }
}

/// A message in a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    /// Run that produced the message; `None` for messages posted by the client.
    pub run_id: Option<String>,
    /// Text content chunks in order.
    pub text_chunks: Vec<String>,
}

impl ThreadMessage {
    /// Creates a message.
    pub fn new(
        id: impl Into<String>,
        role: MessageRole,
        run_id: Option<&str>,
        text_chunks: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            run_id: run_id.map(str::to_string),
            text_chunks,
        }
    }

    /// The last text chunk, which holds the complete value of the message.
    pub fn final_text(&self) -> Option<&str> {
        self.text_chunks.last().map(String::as_str)
    }
}

/// Agent backend errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// The connection (credential or HTTP client) could not be built.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The credential was rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request or run did not finish in time.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Backend answered with an unexpected status.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Failed to parse backend response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl AgentError {
    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

//! BriefingClient - Turns a FlightInfo into a narrative briefing through the
//! agent backend.
//!
//! Each call runs one exchange: create a thread, post the rendered prompt,
//! run the agent, collect its replies and delete the thread. The backend
//! connection is built on first use and shared by every later exchange.
//!
//! `analyze` never fails. Run failures and exchange errors come back as
//! briefing text so the flight record can still be returned to the pilot.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::domain::briefing::{render_prompt, ExchangeState};
use crate::domain::flight::FlightInfo;
use crate::domain::foundation::{StateMachine, TransitionError};
use crate::ports::{AgentBackend, AgentConnector, AgentError, MessageRole, RunStatus, ThreadMessage};

/// Briefing text when the run produced no assistant message.
pub const NO_RESPONSE: &str = "No response generated.";

/// Errors that abort an exchange.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to render prompt: {0}")]
    Prompt(#[from] serde_json::Error),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    State(#[from] TransitionError),
}

/// Client for briefing exchanges with a pre-provisioned agent.
///
/// Construct once at startup and share behind an `Arc`.
pub struct BriefingClient {
    connector: Arc<dyn AgentConnector>,
    connection: OnceCell<Arc<dyn AgentBackend>>,
    agent_id: String,
}

impl BriefingClient {
    pub fn new(connector: Arc<dyn AgentConnector>, agent_id: impl Into<String>) -> Self {
        Self {
            connector,
            connection: OnceCell::new(),
            agent_id: agent_id.into(),
        }
    }

    /// Returns true once the backend connection has been built.
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    /// Produces the briefing text for a flight.
    pub async fn analyze(&self, info: &FlightInfo) -> String {
        match self.try_analyze(info).await {
            Ok(briefing) => briefing,
            Err(e) => {
                tracing::error!("Error during analysis workflow: {}", e);
                format!("Error during analysis workflow: {}", e)
            }
        }
    }

    async fn try_analyze(&self, info: &FlightInfo) -> Result<String, AnalysisError> {
        let backend = self.backend().await?;
        let prompt = render_prompt(info)?;

        let mut exchange = BriefingExchange::new(backend);
        let result = exchange.run(&prompt, &self.agent_id).await;
        exchange.close().await;
        result
    }

    /// Shared connection, built by the first caller. Concurrent first callers
    /// wait for that one attempt; a failed attempt leaves the cell empty.
    async fn backend(&self) -> Result<Arc<dyn AgentBackend>, AgentError> {
        self.connection
            .get_or_try_init(|| async {
                let backend = self.connector.connect().await?;
                tracing::info!(agent_id = %self.agent_id, "Agent backend connection established");
                Ok::<_, AgentError>(backend)
            })
            .await
            .map(Arc::clone)
    }
}

/// One thread exchange, tracked through `ExchangeState`.
pub(crate) struct BriefingExchange {
    backend: Arc<dyn AgentBackend>,
    state: ExchangeState,
    thread_id: Option<String>,
}

impl BriefingExchange {
    pub(crate) fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self {
            backend,
            state: ExchangeState::default(),
            thread_id: None,
        }
    }

    pub(crate) fn state(&self) -> ExchangeState {
        self.state
    }

    fn advance(&mut self, next: ExchangeState) -> Result<(), TransitionError> {
        self.state = self.state.transition_to(next)?;
        Ok(())
    }

    /// Runs the exchange up to collecting the response. Does not clean up.
    pub(crate) async fn run(&mut self, prompt: &str, agent_id: &str) -> Result<String, AnalysisError> {
        let thread_id = self.backend.create_thread().await?;
        self.thread_id = Some(thread_id.clone());
        self.advance(ExchangeState::ThreadCreated)?;
        tracing::debug!(thread_id = %thread_id, "Created agent thread");

        self.backend
            .post_message(&thread_id, MessageRole::User, prompt)
            .await?;
        self.advance(ExchangeState::MessagePosted)?;

        self.advance(ExchangeState::RunStarted)?;
        let run = self
            .backend
            .create_and_process_run(&thread_id, agent_id)
            .await?;

        match run.status {
            RunStatus::Failed => {
                self.advance(ExchangeState::RunFailed)?;
                tracing::warn!(run_id = %run.id, "Agent run failed: {}", run.error_detail());
                return Ok(format!("Run failed: {}", run.error_detail()));
            }
            RunStatus::Completed => {}
            other => {
                tracing::warn!(run_id = %run.id, status = ?other, "Agent run ended without completing");
            }
        }
        self.advance(ExchangeState::RunCompleted)?;

        let messages = self.backend.list_messages(&thread_id).await?;
        self.advance(ExchangeState::ResponseCollected)?;

        Ok(collect_response(&messages, &run.id))
    }

    /// Deletes the thread, if one was created, and ends the exchange.
    /// A failed delete is logged and otherwise ignored.
    pub(crate) async fn close(&mut self) {
        if let Some(thread_id) = self.thread_id.take() {
            if let Err(e) = self.backend.delete_thread(&thread_id).await {
                tracing::warn!(thread_id = %thread_id, "Failed to delete agent thread: {}", e);
            }
        }
        if let Ok(next) = self.state.transition_to(ExchangeState::ThreadDeleted) {
            self.state = next;
        }
    }
}

/// Joins the final text of every assistant message produced by `run_id`.
pub fn collect_response(messages: &[ThreadMessage], run_id: &str) -> String {
    let text = messages
        .iter()
        .filter(|m| m.role == MessageRole::Assistant && m.run_id.as_deref() == Some(run_id))
        .filter_map(ThreadMessage::final_text)
        .collect::<Vec<_>>()
        .join("\n");

    match text.trim() {
        "" => NO_RESPONSE.to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::agent::{AgentCall, MockAgentBackend, MockAgentConnector, MockStep};
    use crate::domain::flight::PilotProvidedData;
    use serde_json::json;
    use std::time::Duration;

    fn flight_info() -> FlightInfo {
        let pilot: PilotProvidedData = serde_json::from_value(json!({
            "pilotName": "Amelia Earhart",
            "departureAirport": "KRNT",
            "destinationAirport": "KORD"
        }))
        .unwrap();
        FlightInfo::new(pilot)
    }

    fn client_for(backend: &MockAgentBackend) -> (BriefingClient, MockAgentConnector) {
        let connector = MockAgentConnector::new(backend.clone());
        let client = BriefingClient::new(Arc::new(connector.clone()), "asst_123");
        (client, connector)
    }

    #[tokio::test]
    async fn successful_exchange_returns_reply_and_deletes_thread() {
        let backend = MockAgentBackend::new().with_reply("  VFR conditions expected along the route.  ");
        let (client, _) = client_for(&backend);

        let briefing = client.analyze(&flight_info()).await;

        assert_eq!(briefing, "VFR conditions expected along the route.");
        assert_eq!(backend.delete_count(), 1);
        assert_eq!(backend.open_threads(), 0);
    }

    #[tokio::test]
    async fn posts_rendered_prompt_as_user_message() {
        let backend = MockAgentBackend::new().with_reply("ok");
        let (client, _) = client_for(&backend);
        let info = flight_info();

        client.analyze(&info).await;

        let expected = render_prompt(&info).unwrap();
        assert!(backend.get_calls().iter().any(|call| matches!(
            call,
            AgentCall::PostMessage { role: MessageRole::User, content, .. } if *content == expected
        )));
        assert!(backend.get_calls().iter().any(|call| matches!(
            call,
            AgentCall::ProcessRun { agent_id, .. } if agent_id == "asst_123"
        )));
    }

    #[tokio::test]
    async fn failed_run_reports_backend_error_detail() {
        let backend = MockAgentBackend::new()
            .with_reply("should be ignored")
            .with_failed_run("rate_limit_exceeded", "Quota exhausted");
        let (client, _) = client_for(&backend);

        let briefing = client.analyze(&flight_info()).await;

        assert_eq!(briefing, "Run failed: rate_limit_exceeded: Quota exhausted");
        assert_eq!(backend.delete_count(), 1);
    }

    #[tokio::test]
    async fn expired_run_still_collects_and_deletes_thread() {
        let backend = MockAgentBackend::new().with_run_status(RunStatus::Expired);
        let (client, _) = client_for(&backend);

        assert_eq!(client.analyze(&flight_info()).await, NO_RESPONSE);
        assert_eq!(backend.delete_count(), 1);
        assert_eq!(backend.open_threads(), 0);
    }

    #[tokio::test]
    async fn incomplete_run_returns_partial_reply() {
        let backend = MockAgentBackend::new()
            .with_reply("Partial briefing.")
            .with_run_status(RunStatus::Incomplete);
        let (client, _) = client_for(&backend);

        assert_eq!(client.analyze(&flight_info()).await, "Partial briefing.");
        assert_eq!(backend.delete_count(), 1);
    }

    #[tokio::test]
    async fn mid_exchange_error_still_deletes_thread() {
        let backend = MockAgentBackend::new()
            .with_failure(MockStep::ListMessages, AgentError::network("connection reset"));
        let mut exchange = BriefingExchange::new(Arc::new(backend.clone()));

        let result = exchange.run("prompt", "asst_123").await;
        assert!(result.is_err());
        assert_eq!(exchange.state(), ExchangeState::RunCompleted);

        exchange.close().await;
        assert_eq!(exchange.state(), ExchangeState::ThreadDeleted);
        assert_eq!(backend.delete_count(), 1);
    }

    #[tokio::test]
    async fn exchange_error_becomes_briefing_text() {
        let backend = MockAgentBackend::new()
            .with_failure(MockStep::ProcessRun, AgentError::Timeout { timeout_secs: 30 });
        let (client, _) = client_for(&backend);

        let briefing = client.analyze(&flight_info()).await;

        assert_eq!(
            briefing,
            "Error during analysis workflow: request timed out after 30s"
        );
        assert_eq!(backend.delete_count(), 1);
    }

    #[tokio::test]
    async fn every_exchange_outcome_ends_deleted() {
        let backends = [
            MockAgentBackend::new().with_reply("ok"),
            MockAgentBackend::new().with_failed_run("server_error", "boom"),
            MockAgentBackend::new().with_failure(MockStep::PostMessage, AgentError::network("x")),
            MockAgentBackend::new().with_failure(MockStep::CreateThread, AgentError::network("x")),
        ];

        for backend in backends {
            let mut exchange = BriefingExchange::new(Arc::new(backend));
            let _ = exchange.run("prompt", "asst_123").await;
            exchange.close().await;
            assert_eq!(exchange.state(), ExchangeState::ThreadDeleted);
        }
    }

    #[tokio::test]
    async fn no_thread_means_no_delete() {
        let backend = MockAgentBackend::new()
            .with_failure(MockStep::CreateThread, AgentError::AuthenticationFailed);
        let (client, _) = client_for(&backend);

        let briefing = client.analyze(&flight_info()).await;

        assert_eq!(briefing, "Error during analysis workflow: authentication failed");
        assert_eq!(backend.delete_count(), 0);
    }

    #[tokio::test]
    async fn delete_failure_is_swallowed() {
        let backend = MockAgentBackend::new()
            .with_reply("Briefing text")
            .with_failure(MockStep::DeleteThread, AgentError::network("gone"));
        let (client, _) = client_for(&backend);

        assert_eq!(client.analyze(&flight_info()).await, "Briefing text");
        assert_eq!(backend.delete_count(), 1);
    }

    #[tokio::test]
    async fn no_assistant_message_yields_placeholder() {
        let backend = MockAgentBackend::new();
        let (client, _) = client_for(&backend);

        assert_eq!(client.analyze(&flight_info()).await, NO_RESPONSE);
    }

    #[tokio::test]
    async fn only_this_runs_assistant_messages_are_collected() {
        let backend = MockAgentBackend::new()
            .with_preexisting_message(ThreadMessage::new(
                "msg_old",
                MessageRole::Assistant,
                Some("run_stale"),
                vec!["stale briefing".to_string()],
            ))
            .with_reply("First part.")
            .with_reply("Second part.");
        let (client, _) = client_for(&backend);

        assert_eq!(
            client.analyze(&flight_info()).await,
            "First part.\nSecond part."
        );
    }

    #[test]
    fn collect_response_takes_last_chunk_of_each_message() {
        let messages = vec![
            ThreadMessage::new("m1", MessageRole::User, None, vec!["prompt".to_string()]),
            ThreadMessage::new(
                "m2",
                MessageRole::Assistant,
                Some("run_1"),
                vec!["draft".to_string(), "final".to_string()],
            ),
            ThreadMessage::new("m3", MessageRole::Assistant, Some("run_1"), vec![]),
        ];

        assert_eq!(collect_response(&messages, "run_1"), "final");
        assert_eq!(collect_response(&messages, "run_2"), NO_RESPONSE);
    }

    #[tokio::test]
    async fn concurrent_first_use_connects_once() {
        let backend = MockAgentBackend::new()
            .with_reply("ok")
            .with_delay(Duration::from_millis(5));
        let connector = MockAgentConnector::new(backend).with_delay(Duration::from_millis(50));
        let client = Arc::new(BriefingClient::new(Arc::new(connector.clone()), "asst_123"));
        let info = Arc::new(flight_info());

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let client = client.clone();
                let info = info.clone();
                tokio::spawn(async move { client.analyze(&info).await })
            })
            .collect();
        for result in futures::future::join_all(tasks).await {
            assert_eq!(result.unwrap(), "ok");
        }

        assert_eq!(connector.connect_count(), 1);
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn failed_connection_is_retried_on_next_request() {
        let backend = MockAgentBackend::new().with_reply("ok");
        let connector = MockAgentConnector::new(backend).failing_first(1);
        let client = BriefingClient::new(Arc::new(connector.clone()), "asst_123");

        let first = client.analyze(&flight_info()).await;
        assert_eq!(
            first,
            "Error during analysis workflow: connection failed: mock credential unavailable"
        );
        assert!(!client.is_connected());

        assert_eq!(client.analyze(&flight_info()).await, "ok");
        assert_eq!(connector.connect_count(), 2);
    }
}

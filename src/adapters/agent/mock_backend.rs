//! Mock Agent Backend for testing.
//!
//! Provides configurable mock implementations of the AgentBackend and
//! AgentConnector ports, allowing tests to run without a real agent service.
//!
//! # Features
//!
//! - Configurable run outcome and assistant replies
//! - Messages left over from other runs
//! - Error injection per exchange step
//! - Call tracking for verification
//! - Connection counting with optional connect failures
//!
//! # Example
//!
//! ```ignore
//! let backend = MockAgentBackend::new().with_reply("VFR conditions expected.");
//! let connector = MockAgentConnector::new(backend.clone());
//! let client = BriefingClient::new(Arc::new(connector), "asst_123");
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AgentBackend, AgentConnector, AgentError, AgentRun, MessageRole, RunStatus, ThreadMessage,
};

/// One step of a thread exchange, for error injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockStep {
    CreateThread,
    PostMessage,
    ProcessRun,
    ListMessages,
    DeleteThread,
}

/// One recorded call to the mock backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentCall {
    CreateThread,
    PostMessage {
        thread_id: String,
        role: MessageRole,
        content: String,
    },
    ProcessRun {
        thread_id: String,
        agent_id: String,
    },
    ListMessages {
        thread_id: String,
    },
    DeleteThread {
        thread_id: String,
    },
}

/// Mock agent backend for testing.
#[derive(Debug, Clone)]
pub struct MockAgentBackend {
    run_status: RunStatus,
    run_error: Option<(String, String)>,
    replies: Vec<String>,
    preexisting: Vec<ThreadMessage>,
    failures: HashMap<MockStep, AgentError>,
    delay: Duration,
    threads: Arc<Mutex<HashMap<String, Vec<ThreadMessage>>>>,
    next_thread: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<AgentCall>>>,
}

impl Default for MockAgentBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAgentBackend {
    /// Creates a mock whose runs complete without replying.
    pub fn new() -> Self {
        Self {
            run_status: RunStatus::Completed,
            run_error: None,
            replies: Vec::new(),
            preexisting: Vec::new(),
            failures: HashMap::new(),
            delay: Duration::ZERO,
            threads: Arc::new(Mutex::new(HashMap::new())),
            next_thread: Arc::new(AtomicUsize::new(1)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds an assistant message the run will produce.
    pub fn with_reply(mut self, text: impl Into<String>) -> Self {
        self.replies.push(text.into());
        self
    }

    /// Sets the terminal status runs end in.
    pub fn with_run_status(mut self, status: RunStatus) -> Self {
        self.run_status = status;
        self
    }

    /// Makes runs fail with the given error detail.
    pub fn with_failed_run(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.run_status = RunStatus::Failed;
        self.run_error = Some((code.into(), message.into()));
        self
    }

    /// Seeds every new thread with a message, as if left by an earlier run.
    pub fn with_preexisting_message(mut self, message: ThreadMessage) -> Self {
        self.preexisting.push(message);
        self
    }

    /// Fails one exchange step.
    pub fn with_failure(mut self, step: MockStep, error: AgentError) -> Self {
        self.failures.insert(step, error);
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this backend.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<AgentCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the number of delete requests received.
    pub fn delete_count(&self) -> usize {
        self.get_calls()
            .iter()
            .filter(|call| matches!(call, AgentCall::DeleteThread { .. }))
            .count()
    }

    /// Returns the number of threads that exist and were not deleted.
    pub fn open_threads(&self) -> usize {
        self.threads.lock().unwrap().len()
    }

    async fn record(&self, step: MockStep, call: AgentCall) -> Result<(), AgentError> {
        self.calls.lock().unwrap().push(call);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.failures.get(&step) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn with_thread<T>(
        &self,
        thread_id: &str,
        f: impl FnOnce(&mut Vec<ThreadMessage>) -> T,
    ) -> Result<T, AgentError> {
        let mut threads = self.threads.lock().unwrap();
        threads
            .get_mut(thread_id)
            .map(f)
            .ok_or_else(|| AgentError::Status {
                status: 404,
                body: format!("thread {} not found", thread_id),
            })
    }
}

#[async_trait]
impl AgentBackend for MockAgentBackend {
    async fn create_thread(&self) -> Result<String, AgentError> {
        self.record(MockStep::CreateThread, AgentCall::CreateThread)
            .await?;

        let thread_id = format!("thread_{}", self.next_thread.fetch_add(1, Ordering::SeqCst));
        self.threads
            .lock()
            .unwrap()
            .insert(thread_id.clone(), self.preexisting.clone());
        Ok(thread_id)
    }

    async fn post_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), AgentError> {
        self.record(
            MockStep::PostMessage,
            AgentCall::PostMessage {
                thread_id: thread_id.to_string(),
                role,
                content: content.to_string(),
            },
        )
        .await?;

        self.with_thread(thread_id, |messages| {
            let id = format!("msg_{}", messages.len() + 1);
            messages.push(ThreadMessage::new(id, role, None, vec![content.to_string()]));
        })
    }

    async fn create_and_process_run(
        &self,
        thread_id: &str,
        agent_id: &str,
    ) -> Result<AgentRun, AgentError> {
        self.record(
            MockStep::ProcessRun,
            AgentCall::ProcessRun {
                thread_id: thread_id.to_string(),
                agent_id: agent_id.to_string(),
            },
        )
        .await?;

        let run_id = format!("run_{}", thread_id.trim_start_matches("thread_"));
        self.with_thread(thread_id, |messages| {
            for reply in &self.replies {
                let id = format!("msg_{}", messages.len() + 1);
                messages.push(ThreadMessage::new(
                    id,
                    MessageRole::Assistant,
                    Some(&run_id),
                    vec![reply.clone()],
                ));
            }
        })?;

        let run = AgentRun::new(run_id, self.run_status);
        Ok(match &self.run_error {
            Some((code, message)) => run.with_error(code.clone(), message.clone()),
            None => run,
        })
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AgentError> {
        self.record(
            MockStep::ListMessages,
            AgentCall::ListMessages {
                thread_id: thread_id.to_string(),
            },
        )
        .await?;

        self.with_thread(thread_id, |messages| messages.clone())
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<(), AgentError> {
        self.record(
            MockStep::DeleteThread,
            AgentCall::DeleteThread {
                thread_id: thread_id.to_string(),
            },
        )
        .await?;

        self.threads.lock().unwrap().remove(thread_id);
        Ok(())
    }
}

/// Mock connector handing out a shared `MockAgentBackend`.
#[derive(Debug, Clone)]
pub struct MockAgentConnector {
    backend: MockAgentBackend,
    delay: Duration,
    failures_remaining: Arc<AtomicUsize>,
    connects: Arc<AtomicUsize>,
}

impl MockAgentConnector {
    /// Creates a connector that always succeeds.
    pub fn new(backend: MockAgentBackend) -> Self {
        Self {
            backend,
            delay: Duration::ZERO,
            failures_remaining: Arc::new(AtomicUsize::new(0)),
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fails the first `count` connection attempts.
    pub fn failing_first(self, count: usize) -> Self {
        self.failures_remaining.store(count, Ordering::SeqCst);
        self
    }

    /// Sets simulated latency per connection attempt.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of connection attempts.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgentConnector for MockAgentConnector {
    async fn connect(&self) -> Result<Arc<dyn AgentBackend>, AgentError> {
        self.connects.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let failed = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(AgentError::connection("mock credential unavailable"));
        }

        Ok(Arc::new(self.backend.clone()))
    }
}

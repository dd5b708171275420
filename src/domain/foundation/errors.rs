//! Error types for the domain layer.

use thiserror::Error;

/// A state change that the state machine does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot transition from {from} to {to}")]
pub struct TransitionError {
    pub from: String,
    pub to: String,
}

impl TransitionError {
    /// Creates a transition error from the debug names of both states.
    pub fn new(from: impl std::fmt::Debug, to: impl std::fmt::Debug) -> Self {
        Self {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

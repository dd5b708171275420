//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state transitions
//! across lifecycle statuses (such as a briefing exchange with the agent backend).

use super::TransitionError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ExchangeState {
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             NoSession => vec![ThreadCreated, ThreadDeleted],
///             // ... etc
///         }
///     }
/// }
///
/// let next = state.transition_to(ExchangeState::ThreadCreated)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(TransitionError::new(self, target))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestStatus {
        Draft,
        Active,
        Completed,
        Archived,
    }

    impl StateMachine for TestStatus {
        fn valid_transitions(&self) -> Vec<Self> {
            use TestStatus::*;
            match self {
                Draft => vec![Active],
                Active => vec![Completed, Archived],
                Completed => vec![Archived],
                Archived => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        let status = TestStatus::Draft;
        assert_eq!(status.transition_to(TestStatus::Active), Ok(TestStatus::Active));
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let result = TestStatus::Draft.transition_to(TestStatus::Completed);
        assert_eq!(
            result,
            Err(TransitionError {
                from: "Draft".to_string(),
                to: "Completed".to_string(),
            })
        );
    }

    #[test]
    fn is_terminal_returns_true_for_archived() {
        assert!(TestStatus::Archived.is_terminal());
        assert!(!TestStatus::Draft.is_terminal());
        assert!(!TestStatus::Completed.is_terminal());
    }
}

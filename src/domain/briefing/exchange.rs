//! Lifecycle of one exchange with the agent backend.

use serde::Serialize;

use crate::domain::foundation::StateMachine;

/// Where an exchange with the agent backend currently stands.
///
/// The happy path runs top to bottom. Every non-terminal state may jump
/// straight to `ThreadDeleted`, which is how an exchange that hit an error
/// is closed; for an exchange that never got a thread it just marks the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeState {
    #[default]
    NoSession,
    ThreadCreated,
    MessagePosted,
    RunStarted,
    RunCompleted,
    RunFailed,
    ResponseCollected,
    ThreadDeleted,
}

impl StateMachine for ExchangeState {
    fn valid_transitions(&self) -> Vec<Self> {
        use ExchangeState::*;
        match self {
            NoSession => vec![ThreadCreated, ThreadDeleted],
            ThreadCreated => vec![MessagePosted, ThreadDeleted],
            MessagePosted => vec![RunStarted, ThreadDeleted],
            RunStarted => vec![RunCompleted, RunFailed, ThreadDeleted],
            RunCompleted => vec![ResponseCollected, ThreadDeleted],
            RunFailed => vec![ThreadDeleted],
            ResponseCollected => vec![ThreadDeleted],
            ThreadDeleted => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ExchangeState::*;

    const ALL: [ExchangeState; 8] = [
        NoSession,
        ThreadCreated,
        MessagePosted,
        RunStarted,
        RunCompleted,
        RunFailed,
        ResponseCollected,
        ThreadDeleted,
    ];

    #[test]
    fn happy_path_is_valid() {
        let mut state = ExchangeState::default();
        for next in [
            ThreadCreated,
            MessagePosted,
            RunStarted,
            RunCompleted,
            ResponseCollected,
            ThreadDeleted,
        ] {
            state = state.transition_to(next).unwrap();
        }
        assert!(state.is_terminal());
    }

    #[test]
    fn failed_run_goes_straight_to_cleanup() {
        let state = RunStarted.transition_to(RunFailed).unwrap();
        assert_eq!(state.valid_transitions(), vec![ThreadDeleted]);
        assert!(RunFailed.transition_to(ResponseCollected).is_err());
    }

    #[test]
    fn every_state_can_reach_thread_deleted() {
        for state in ALL.into_iter().filter(|s| *s != ThreadDeleted) {
            assert!(
                state.can_transition_to(&ThreadDeleted),
                "{:?} cannot be cleaned up",
                state
            );
        }
    }

    #[test]
    fn only_thread_deleted_is_terminal() {
        for state in ALL {
            assert_eq!(state.is_terminal(), state == ThreadDeleted);
        }
    }

    #[test]
    fn steps_cannot_be_skipped() {
        assert!(NoSession.transition_to(RunStarted).is_err());
        assert!(ThreadCreated.transition_to(RunCompleted).is_err());
        assert!(ThreadDeleted.transition_to(NoSession).is_err());
    }
}

//! Foundation module - Shared domain primitives.
//!
//! Contains the state machine trait and error types shared by the
//! flight and briefing domains.

mod errors;
mod state_machine;

pub use errors::TransitionError;
pub use state_machine::StateMachine;

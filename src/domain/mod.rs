//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (state machine, errors)
//! - `flight` - The per-request flight record and its sub-aggregates
//! - `briefing` - Agent exchange lifecycle and prompt rendering

pub mod briefing;
pub mod flight;
pub mod foundation;

//! Briefing module - how a flight record becomes an agent exchange.
//!
//! - `ExchangeState` - lifecycle of one thread on the agent backend
//! - `prompt` - size-bounded text rendering of a `FlightInfo`

mod exchange;
pub mod prompt;

pub use exchange::ExchangeState;
pub use prompt::render_prompt;

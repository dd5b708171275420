//! Application handlers.
//!
//! The briefing pipeline: aggregate online resources, analyze with the
//! agent, and the command handler that runs both for one request.

mod analyze_flight;
mod fetch_flight_data;
mod prepare_briefing;

pub use analyze_flight::{collect_response, AnalysisError, BriefingClient, NO_RESPONSE};
pub use fetch_flight_data::{combine_airport_codes, FlightDataAggregator};
pub use prepare_briefing::{PrepareBriefingCommand, PrepareBriefingHandler};

//! Flight module - the record assembled for each briefing request.
//!
//! - `PilotProvidedData` - what the pilot entered
//! - `OnlineResources` - what was fetched from the weather API
//! - `AIAnalysis` - what the agent produced
//! - `FlightInfo` - the three together

mod ai_analysis;
mod flight_info;
mod online_resources;
mod pilot_data;

pub use ai_analysis::AIAnalysis;
pub use flight_info::FlightInfo;
pub use online_resources::{FetchOutcome, OnlineResources, PirepData, Records, WeatherData};
pub use pilot_data::PilotProvidedData;

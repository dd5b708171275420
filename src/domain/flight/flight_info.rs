//! Root aggregate for one briefing request.

use serde::Serialize;

use super::{AIAnalysis, OnlineResources, PilotProvidedData};

/// Everything known about one flight: what the pilot entered, what was
/// fetched online and what the agent made of it.
///
/// Created fresh for each request, filled in place by the aggregator and the
/// briefing client, serialized once and dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightInfo {
    pub pilot_data: PilotProvidedData,
    pub online_resources: OnlineResources,
    pub ai_analysis: AIAnalysis,
}

impl FlightInfo {
    /// Creates a record with empty online resources and analysis.
    pub fn new(pilot_data: PilotProvidedData) -> Self {
        Self {
            pilot_data,
            online_resources: OnlineResources::default(),
            ai_analysis: AIAnalysis::default(),
        }
    }

    /// Builds a record from the raw request body.
    pub fn from_request(body: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_value(body)?))
    }
}

//! PrepareBriefingHandler - Command handler for one briefing request.
//!
//! Builds the FlightInfo from the pilot's input, fills in online resources,
//! then asks the agent for the narrative briefing.

use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::{BriefingClient, FlightDataAggregator};
use crate::domain::flight::{FlightInfo, PilotProvidedData};

/// Command to prepare a briefing for one flight.
#[derive(Debug, Clone)]
pub struct PrepareBriefingCommand {
    pub pilot_data: PilotProvidedData,
    pub request_id: Uuid,
}

impl PrepareBriefingCommand {
    /// Creates a command with a fresh request id.
    pub fn new(pilot_data: PilotProvidedData) -> Self {
        Self {
            pilot_data,
            request_id: Uuid::new_v4(),
        }
    }
}

/// Handler for briefing requests.
pub struct PrepareBriefingHandler {
    aggregator: FlightDataAggregator,
    briefing: Arc<BriefingClient>,
}

impl PrepareBriefingHandler {
    pub fn new(aggregator: FlightDataAggregator, briefing: Arc<BriefingClient>) -> Self {
        Self {
            aggregator,
            briefing,
        }
    }

    /// Runs the pipeline. Upstream and agent failures are absorbed into the
    /// returned record, so this always produces a complete FlightInfo.
    pub async fn handle(&self, cmd: PrepareBriefingCommand) -> FlightInfo {
        let span = tracing::info_span!("briefing", request_id = %cmd.request_id);

        async move {
            let mut info = FlightInfo::new(cmd.pilot_data);
            tracing::debug!(
                departure = %info.pilot_data.departure_airport(),
                destination = %info.pilot_data.destination_airport(),
                "Preparing flight briefing"
            );

            // 1. Online resources
            info.online_resources = self
                .aggregator
                .fetch_flight_data(
                    info.pilot_data.departure_airport(),
                    info.pilot_data.destination_airport(),
                    info.pilot_data.alternate_airports(),
                )
                .await;

            // 2. Narrative briefing
            info.ai_analysis.briefing = self.briefing.analyze(&info).await;

            tracing::debug!("Flight briefing prepared");
            info
        }
        .instrument(span)
        .await
    }
}

//! HTTP handlers for flight endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::{PrepareBriefingCommand, PrepareBriefingHandler};
use crate::domain::flight::PilotProvidedData;

use super::dto::{FlightResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct FlightAppState {
    briefing_handler: Arc<PrepareBriefingHandler>,
}

impl FlightAppState {
    pub fn new(briefing_handler: Arc<PrepareBriefingHandler>) -> Self {
        Self { briefing_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/flight - Prepare a briefing for one flight
pub async fn prepare_flight(
    State(state): State<FlightAppState>,
    Json(pilot_data): Json<PilotProvidedData>,
) -> Response {
    let cmd = PrepareBriefingCommand::new(pilot_data);
    let flight_info = state.briefing_handler.handle(cmd).await;

    (StatusCode::OK, Json(FlightResponse::success(flight_info))).into_response()
}

/// GET /health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

//! HTTP DTOs for flight endpoints.
//!
//! The request body is the pilot's input as-is (`PilotProvidedData`
//! deserializes its camelCase keys), so only response envelopes live here.

use serde::Serialize;

use crate::domain::flight::FlightInfo;

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for a prepared briefing.
#[derive(Debug, Clone, Serialize)]
pub struct FlightResponse {
    pub status: &'static str,
    pub flight_info: FlightInfo,
}

impl FlightResponse {
    pub fn success(flight_info: FlightInfo) -> Self {
        Self {
            status: "success",
            flight_info,
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

//! Axum router configuration for flight endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, prepare_flight, FlightAppState};

/// Create the flight API router.
///
/// # Routes
/// - `POST /api/flight` - Prepare a briefing
/// - `GET /health` - Liveness check
pub fn flight_routes() -> Router<FlightAppState> {
    Router::new()
        .route("/api/flight", post(prepare_flight))
        .route("/health", get(health))
}

/// Create the flight router with its state applied.
pub fn flight_router(state: FlightAppState) -> Router {
    flight_routes().with_state(state)
}

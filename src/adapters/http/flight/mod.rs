//! HTTP adapter for flight endpoints.
//!
//! - `POST /api/flight` - Aggregate online resources and the AI briefing
//!   for the submitted flight
//! - `GET /health` - Liveness check

mod dto;
mod handlers;
mod routes;

pub use dto::{FlightResponse, HealthResponse};
pub use handlers::FlightAppState;
pub use routes::{flight_router, flight_routes};

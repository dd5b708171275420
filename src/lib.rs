//! Flight Briefing - Pre-flight briefing service
//!
//! This crate aggregates aviation weather and airport data for a route and
//! hands it, with the pilot's flight plan, to an AI agent that writes the
//! narrative briefing.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

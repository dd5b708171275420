//! Result of the AI briefing.

use serde::Serialize;

/// Output of the agent analysis.
///
/// Only `briefing` is written by the pipeline. The structured fields are an
/// extension point for agents that return sectioned output; they are always
/// serialized, empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AIAnalysis {
    pub briefing: String,
    pub recommendations: Vec<String>,
    pub weather_analysis: String,
    pub route_analysis: String,
    pub risk_assessment: String,
    pub alternate_recommendations: Vec<String>,
}

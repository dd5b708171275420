//! Pilot-submitted flight parameters.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Flight parameters as entered by the pilot.
///
/// Accepts the camelCase keys the briefing form sends and serializes with
/// snake_case keys. Nothing is validated: a missing or `null` key becomes an
/// empty string, and numbers or booleans keep their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    default,
    rename_all(serialize = "snake_case", deserialize = "camelCase")
)]
pub struct PilotProvidedData {
    #[serde(deserialize_with = "lenient_string")]
    pilot_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pilot_qualifications: String,
    #[serde(deserialize_with = "lenient_string")]
    flight_rules: String,
    #[serde(deserialize_with = "lenient_string")]
    aircraft_type: String,
    #[serde(deserialize_with = "lenient_string")]
    aircraft_equipment: String,
    #[serde(deserialize_with = "lenient_string")]
    true_airspeed: String,
    #[serde(deserialize_with = "lenient_string")]
    departure_airport: String,
    #[serde(deserialize_with = "lenient_string")]
    destination_airport: String,
    #[serde(deserialize_with = "lenient_string")]
    takeoff_time: String,
    #[serde(deserialize_with = "lenient_string")]
    estimated_enroute: String,
    #[serde(deserialize_with = "lenient_string")]
    alternate_airports: String,
}

impl PilotProvidedData {
    pub fn pilot_name(&self) -> &str {
        &self.pilot_name
    }

    pub fn pilot_qualifications(&self) -> &str {
        &self.pilot_qualifications
    }

    pub fn flight_rules(&self) -> &str {
        &self.flight_rules
    }

    pub fn aircraft_type(&self) -> &str {
        &self.aircraft_type
    }

    pub fn aircraft_equipment(&self) -> &str {
        &self.aircraft_equipment
    }

    pub fn true_airspeed(&self) -> &str {
        &self.true_airspeed
    }

    pub fn departure_airport(&self) -> &str {
        &self.departure_airport
    }

    pub fn destination_airport(&self) -> &str {
        &self.destination_airport
    }

    pub fn takeoff_time(&self) -> &str {
        &self.takeoff_time
    }

    pub fn estimated_enroute(&self) -> &str {
        &self.estimated_enroute
    }

    /// Comma-separated alternate airport codes, possibly empty.
    pub fn alternate_airports(&self) -> &str {
        &self.alternate_airports
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

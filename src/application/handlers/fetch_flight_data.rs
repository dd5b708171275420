//! FlightDataAggregator - Fetches every online resource for one route.
//!
//! The five upstream calls run concurrently. Each one degrades on its own:
//! a failed call leaves its field `Unavailable` and never touches siblings.

use std::sync::Arc;

use crate::config::WeatherConfig;
use crate::domain::flight::{FetchOutcome, OnlineResources, PirepData, WeatherData};
use crate::ports::{WeatherDataSource, DEFAULT_METAR_HOURS, DEFAULT_PIREP_DISTANCE_MILES};

/// Composes weather source calls into `OnlineResources`.
#[derive(Clone)]
pub struct FlightDataAggregator {
    source: Arc<dyn WeatherDataSource>,
    metar_hours: u32,
    pirep_distance_miles: u32,
}

impl FlightDataAggregator {
    pub fn new(source: Arc<dyn WeatherDataSource>) -> Self {
        Self {
            source,
            metar_hours: DEFAULT_METAR_HOURS,
            pirep_distance_miles: DEFAULT_PIREP_DISTANCE_MILES,
        }
    }

    /// Creates an aggregator using the configured look-back and radius.
    pub fn from_config(source: Arc<dyn WeatherDataSource>, config: &WeatherConfig) -> Self {
        Self::new(source)
            .with_metar_hours(config.metar_hours)
            .with_pirep_distance(config.pirep_distance_miles)
    }

    pub fn with_metar_hours(mut self, hours: u32) -> Self {
        self.metar_hours = hours;
        self
    }

    pub fn with_pirep_distance(mut self, miles: u32) -> Self {
        self.pirep_distance_miles = miles;
        self
    }

    /// Fetches weather, PIREPs and airport info for a route.
    ///
    /// METAR, TAF and airport info cover the departure, destination and every
    /// alternate; PIREPs are searched around departure and destination only.
    pub async fn fetch_flight_data(
        &self,
        departure: &str,
        destination: &str,
        alternates: &str,
    ) -> OnlineResources {
        let codes = combine_airport_codes(departure, destination, alternates);

        let (metar, taf, airport_info, pireps_departure, pireps_destination) = tokio::join!(
            self.source.get_metar(&codes, self.metar_hours),
            self.source.get_taf(&codes),
            self.source.get_airport_info(&codes),
            self.source.get_pireps(departure, self.pirep_distance_miles),
            self.source.get_pireps(destination, self.pirep_distance_miles),
        );

        let resources = OnlineResources {
            weather: WeatherData {
                metar: FetchOutcome::from(metar),
                taf: FetchOutcome::from(taf),
                pireps: PirepData {
                    departure: FetchOutcome::from(pireps_departure),
                    destination: FetchOutcome::from(pireps_destination),
                },
            },
            airport_info: FetchOutcome::from(airport_info),
            ..Default::default()
        };

        let unavailable = resources.unavailable_sources();
        if unavailable.is_empty() {
            tracing::debug!(airports = %codes, "Fetched all online resources");
        } else {
            for (field, reason) in &unavailable {
                tracing::debug!(airports = %codes, field = %field, "Online resource unavailable: {}", reason);
            }
        }

        resources
    }
}

/// Joins departure, destination and the comma-separated alternates into one
/// code list. Blank entries are dropped; duplicates are kept.
pub fn combine_airport_codes(departure: &str, destination: &str, alternates: &str) -> String {
    [departure, destination]
        .into_iter()
        .chain(alternates.split(','))
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

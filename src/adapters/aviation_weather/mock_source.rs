//! Mock Weather Data Source for testing.
//!
//! Provides a configurable mock implementation of the WeatherDataSource port,
//! allowing tests to run without calling the real weather API.
//!
//! # Features
//!
//! - Canned records per product
//! - Error injection per product, optionally for one argument only
//! - Simulated latency
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let source = MockWeatherSource::new()
//!     .with_records(WeatherProduct::Metar, vec![json!({"icaoId": "KRNT"})])
//!     .with_failure_for(WeatherProduct::Pireps, "KORD", WeatherError::network("down"));
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::flight::Records;
use crate::ports::{WeatherDataSource, WeatherError};

/// The upstream products a weather source serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherProduct {
    Metar,
    Taf,
    Pireps,
    AirportInfo,
    NavaidInfo,
}

/// One recorded call to the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherCall {
    Metar { airport_codes: String, hours: u32 },
    Taf { airport_codes: String },
    Pireps { airport_code: String, distance_miles: u32 },
    AirportInfo { airport_codes: String },
    NavaidInfo { navaid_ids: String },
}

impl WeatherCall {
    /// Product requested by this call.
    pub fn product(&self) -> WeatherProduct {
        match self {
            WeatherCall::Metar { .. } => WeatherProduct::Metar,
            WeatherCall::Taf { .. } => WeatherProduct::Taf,
            WeatherCall::Pireps { .. } => WeatherProduct::Pireps,
            WeatherCall::AirportInfo { .. } => WeatherProduct::AirportInfo,
            WeatherCall::NavaidInfo { .. } => WeatherProduct::NavaidInfo,
        }
    }

    /// The code or id list passed to the call.
    pub fn argument(&self) -> &str {
        match self {
            WeatherCall::Metar { airport_codes, .. }
            | WeatherCall::Taf { airport_codes }
            | WeatherCall::AirportInfo { airport_codes } => airport_codes,
            WeatherCall::Pireps { airport_code, .. } => airport_code,
            WeatherCall::NavaidInfo { navaid_ids } => navaid_ids,
        }
    }
}

#[derive(Debug, Clone)]
struct InjectedFailure {
    product: WeatherProduct,
    argument: Option<String>,
    error: WeatherError,
}

/// Mock weather data source for testing.
#[derive(Debug, Clone, Default)]
pub struct MockWeatherSource {
    records: HashMap<WeatherProduct, Records>,
    failures: Vec<InjectedFailure>,
    delay: Duration,
    calls: Arc<Mutex<Vec<WeatherCall>>>,
}

impl MockWeatherSource {
    /// Creates a mock that answers every call with an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the records returned for a product.
    pub fn with_records(mut self, product: WeatherProduct, records: Vec<Value>) -> Self {
        self.records.insert(product, records);
        self
    }

    /// Fails every call for a product.
    pub fn with_failure(mut self, product: WeatherProduct, error: WeatherError) -> Self {
        self.failures.push(InjectedFailure {
            product,
            argument: None,
            error,
        });
        self
    }

    /// Fails calls for a product only when called with `argument`.
    pub fn with_failure_for(
        mut self,
        product: WeatherProduct,
        argument: impl Into<String>,
        error: WeatherError,
    ) -> Self {
        self.failures.push(InjectedFailure {
            product,
            argument: Some(argument.into()),
            error,
        });
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this source.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<WeatherCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns recorded calls for one product.
    pub fn calls_for(&self, product: WeatherProduct) -> Vec<WeatherCall> {
        self.get_calls()
            .into_iter()
            .filter(|call| call.product() == product)
            .collect()
    }

    async fn respond(&self, call: WeatherCall) -> Result<Records, WeatherError> {
        let product = call.product();
        let failure = self
            .failures
            .iter()
            .find(|f| {
                f.product == product
                    && f.argument.as_deref().map_or(true, |arg| arg == call.argument())
            })
            .map(|f| f.error.clone());

        self.calls.lock().unwrap().push(call);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(self.records.get(&product).cloned().unwrap_or_default()),
        }
    }
}

#[async_trait]
impl WeatherDataSource for MockWeatherSource {
    async fn get_metar(&self, airport_codes: &str, hours: u32) -> Result<Records, WeatherError> {
        self.respond(WeatherCall::Metar {
            airport_codes: airport_codes.to_string(),
            hours,
        })
        .await
    }

    async fn get_taf(&self, airport_codes: &str) -> Result<Records, WeatherError> {
        self.respond(WeatherCall::Taf {
            airport_codes: airport_codes.to_string(),
        })
        .await
    }

    async fn get_pireps(
        &self,
        airport_code: &str,
        distance_miles: u32,
    ) -> Result<Records, WeatherError> {
        self.respond(WeatherCall::Pireps {
            airport_code: airport_code.to_string(),
            distance_miles,
        })
        .await
    }

    async fn get_airport_info(&self, airport_codes: &str) -> Result<Records, WeatherError> {
        self.respond(WeatherCall::AirportInfo {
            airport_codes: airport_codes.to_string(),
        })
        .await
    }

    async fn get_navaid_info(&self, navaid_ids: &str) -> Result<Records, WeatherError> {
        self.respond(WeatherCall::NavaidInfo {
            navaid_ids: navaid_ids.to_string(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn returns_configured_records() {
        let source =
            MockWeatherSource::new().with_records(WeatherProduct::Taf, vec![json!({"id": 1})]);

        assert_eq!(source.get_taf("KRNT").await.unwrap(), vec![json!({"id": 1})]);
        assert!(source.get_metar("KRNT", 2).await.unwrap().is_empty());
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn argument_scoped_failure_only_hits_that_argument() {
        let source = MockWeatherSource::new().with_failure_for(
            WeatherProduct::Pireps,
            "KORD",
            WeatherError::network("down"),
        );

        assert!(source.get_pireps("KRNT", 50).await.is_ok());
        assert_eq!(
            source.get_pireps("KORD", 50).await,
            Err(WeatherError::network("down"))
        );
        assert_eq!(source.calls_for(WeatherProduct::Pireps).len(), 2);
    }
}

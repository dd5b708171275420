//! Aviation Weather Client - Implementation of WeatherDataSource over HTTP.
//!
//! Talks to the aviationweather.gov data API (or anything serving the same
//! paths). Every operation is a single GET with `format=json` and the
//! configured timeout; there are no retries.
//!
//! # Configuration
//!
//! ```ignore
//! let client = AviationWeatherClient::new(&WeatherConfig::default())?;
//! let metar = client.get_metar("KRNT,KORD", 2).await?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::WeatherConfig;
use crate::domain::flight::Records;
use crate::ports::{WeatherDataSource, WeatherError};

/// HTTP client for the aviation weather data API.
#[derive(Debug, Clone)]
pub struct AviationWeatherClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    pirep_age_hours: u32,
}

impl AviationWeatherClient {
    /// Creates a client from configuration.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| WeatherError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            pirep_age_hours: config.pirep_age_hours,
        })
    }

    /// Builds the URL of an API path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Fetches one product, logging the failure before returning it.
    async fn fetch(
        &self,
        product: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Records, WeatherError> {
        match self.request(path, params).await {
            Ok(records) => {
                tracing::debug!(product, count = records.len(), "Fetched weather data");
                Ok(records)
            }
            Err(e) => {
                tracing::warn!(product, "Error fetching {} data: {}", product, e);
                Err(e)
            }
        }
    }

    async fn request(&self, path: &str, params: &[(&str, String)]) -> Result<Records, WeatherError> {
        let response = self
            .client
            .get(self.url(path))
            .query(params)
            .query(&[("format", "json")])
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();

        // The API answers 204 when no report matches the query
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        serde_json::from_slice::<Records>(&bytes).map_err(|e| WeatherError::decode(e.to_string()))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> WeatherError {
        if e.is_timeout() {
            WeatherError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else if e.is_connect() {
            WeatherError::network(format!("Connection failed: {}", e))
        } else {
            WeatherError::network(e.to_string())
        }
    }
}

#[async_trait]
impl WeatherDataSource for AviationWeatherClient {
    async fn get_metar(&self, airport_codes: &str, hours: u32) -> Result<Records, WeatherError> {
        let params = [("ids", airport_codes.to_string()), ("hours", hours.to_string())];
        self.fetch("METAR", "metar", &params).await
    }

    async fn get_taf(&self, airport_codes: &str) -> Result<Records, WeatherError> {
        let params = [("ids", airport_codes.to_string())];
        self.fetch("TAF", "taf", &params).await
    }

    async fn get_pireps(
        &self,
        airport_code: &str,
        distance_miles: u32,
    ) -> Result<Records, WeatherError> {
        let params = [
            ("id", airport_code.to_string()),
            ("distance", distance_miles.to_string()),
            ("age", self.pirep_age_hours.to_string()),
        ];
        self.fetch("PIREP", "pirep", &params).await
    }

    async fn get_airport_info(&self, airport_codes: &str) -> Result<Records, WeatherError> {
        let params = [("ids", airport_codes.to_string())];
        self.fetch("airport", "airport", &params).await
    }

    async fn get_navaid_info(&self, navaid_ids: &str) -> Result<Records, WeatherError> {
        let params = [("ids", navaid_ids.to_string())];
        self.fetch("navaid", "navaid", &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AviationWeatherClient {
        let config = WeatherConfig {
            base_url: server.uri(),
            timeout_secs: 1,
            ..Default::default()
        };
        AviationWeatherClient::new(&config).unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        let config = WeatherConfig {
            base_url: "https://aviationweather.gov/api/data/".to_string(),
            ..Default::default()
        };
        let client = AviationWeatherClient::new(&config).unwrap();
        assert_eq!(client.url("metar"), "https://aviationweather.gov/api/data/metar");
    }

    #[tokio::test]
    async fn metar_sends_ids_hours_and_format() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metar"))
            .and(query_param("ids", "KRNT,KORD"))
            .and(query_param("hours", "2"))
            .and(query_param("format", "json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"icaoId": "KRNT"}, {"icaoId": "KORD"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server).get_metar("KRNT,KORD", 2).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["icaoId"], "KRNT");
    }

    #[tokio::test]
    async fn pireps_send_radius_and_age() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pirep"))
            .and(query_param("id", "KRNT"))
            .and(query_param("distance", "50"))
            .and(query_param("age", "6"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server).get_pireps("KRNT", 50).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn taf_airport_and_navaid_use_their_paths() {
        let server = MockServer::start().await;
        for p in ["/taf", "/airport", "/navaid"] {
            Mock::given(method("GET"))
                .and(path(p))
                .and(query_param("format", "json"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"path": p}])))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server);
        assert_eq!(client.get_taf("KRNT").await.unwrap()[0]["path"], "/taf");
        assert_eq!(client.get_airport_info("KRNT").await.unwrap()[0]["path"], "/airport");
        assert_eq!(client.get_navaid_info("SEA").await.unwrap()[0]["path"], "/navaid");
    }

    #[tokio::test]
    async fn no_content_is_empty_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/taf"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let records = client_for(&server).get_taf("ZZZZ").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metar"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_metar("KRNT", 2).await.unwrap_err();
        assert_eq!(
            err,
            WeatherError::Status {
                status: 503,
                body: "maintenance".to_string()
            }
        );
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/airport"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "oops"})))
            .mount(&server)
            .await;

        let err = client_for(&server).get_airport_info("KRNT").await.unwrap_err();
        assert!(matches!(err, WeatherError::Decode(_)));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metar"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).get_metar("KRNT", 2).await.unwrap_err();
        assert_eq!(err, WeatherError::Timeout { timeout_secs: 1 });
    }

    #[tokio::test]
    async fn unreachable_upstream_is_network_error() {
        let config = WeatherConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
            ..Default::default()
        };
        let client = AviationWeatherClient::new(&config).unwrap();

        let err = client.get_taf("KRNT").await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(_) | WeatherError::Timeout { .. }));
    }
}

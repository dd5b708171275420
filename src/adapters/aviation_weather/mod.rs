//! Aviation Weather Adapters.
//!
//! Implementations of the WeatherDataSource port.
//!
//! - `AviationWeatherClient` - aviationweather.gov data API over HTTP
//! - `MockWeatherSource` - Configurable mock for testing

mod client;
mod mock_source;

pub use client::AviationWeatherClient;
pub use mock_source::{MockWeatherSource, WeatherCall, WeatherProduct};

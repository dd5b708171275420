use std::sync::Arc;

use flight_briefing::adapters::agent::FoundryConnector;
use flight_briefing::adapters::aviation_weather::AviationWeatherClient;
use flight_briefing::adapters::http::{app_router, FlightAppState};
use flight_briefing::application::{BriefingClient, FlightDataAggregator, PrepareBriefingHandler};
use flight_briefing::config::AppConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration problems are fatal before anything else starts
    let config = AppConfig::load_validated()?;

    init_tracing(&config);

    info!("Starting flight briefing server v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {:?}", config.server.environment);
    info!("Weather API: {}", config.weather.base_url);
    info!("Agent endpoint: {}", config.agent.endpoint());

    let weather = Arc::new(AviationWeatherClient::new(&config.weather)?);
    let aggregator = FlightDataAggregator::from_config(weather, &config.weather);

    // The agent connection is built on the first briefing, not here
    let connector = Arc::new(FoundryConnector::new(config.agent.clone()));
    let briefing = Arc::new(BriefingClient::new(connector, config.agent.agent_id()));

    let handler = Arc::new(PrepareBriefingHandler::new(aggregator, briefing));
    let app = app_router(FlightAppState::new(handler), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// `RUST_LOG` wins over the configured level; production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

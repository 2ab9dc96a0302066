use std::sync::Arc;
use std::time::Duration;

use travel_concierge_mcp::{
    build_app,
    config::Config,
    logging,
    providers::{
        AmadeusClient, ExchangeRateClient, NominatimClient, OpenMeteoClient, SerpApiClient,
    },
    AppState,
};
use tracing::{info, warn};

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .build()?;

    if config.serpapi_key.is_none() {
        warn!("SERPAPI_KEY is not set, SerpAPI tools will report missing credentials");
    }
    if config.exchange_rate_api_key.is_none() {
        warn!("EXCHANGE_RATE_API_KEY is not set, currency conversion will report missing credentials");
    }

    let serpapi = Arc::new(SerpApiClient::new(http.clone(), config.serpapi_key.clone()));
    let amadeus = Arc::new(AmadeusClient::new(
        http.clone(),
        config.amadeus_base_url.clone(),
        config.amadeus_api_key.clone(),
        config.amadeus_api_secret.clone(),
    ));
    let weather = Arc::new(OpenMeteoClient::new(http.clone()));
    let exchange_rates = Arc::new(ExchangeRateClient::new(
        http.clone(),
        config.exchange_rate_api_key.clone(),
    ));
    let geocoder = Arc::new(NominatimClient::new(http));

    let bind_socket = config.bind_socket()?;
    let state = AppState::new(
        config.api_token.clone(),
        serpapi,
        amadeus,
        weather,
        exchange_rates,
        geocoder,
    );
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod providers;

use providers::{
    AmadeusProvider, ExchangeRateProvider, ForecastProvider, GeocodeProvider, SerpApiProvider,
};

#[derive(Clone)]
pub struct AppState {
    pub api_token: Option<Arc<str>>,
    pub serpapi: Arc<dyn SerpApiProvider>,
    pub amadeus: Arc<dyn AmadeusProvider>,
    pub weather: Arc<dyn ForecastProvider>,
    pub exchange_rates: Arc<dyn ExchangeRateProvider>,
    pub geocoder: Arc<dyn GeocodeProvider>,
}

impl AppState {
    pub fn new(
        api_token: Option<String>,
        serpapi: Arc<dyn SerpApiProvider>,
        amadeus: Arc<dyn AmadeusProvider>,
        weather: Arc<dyn ForecastProvider>,
        exchange_rates: Arc<dyn ExchangeRateProvider>,
        geocoder: Arc<dyn GeocodeProvider>,
    ) -> Self {
        Self {
            api_token: api_token.map(Arc::<str>::from),
            serpapi,
            amadeus,
            weather,
            exchange_rates,
            geocoder,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", post(http::handlers::mcp_endpoint))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token,
        ));

    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .merge(protected)
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

//! Open-Meteo forecast client. No credentials, plain GET with query params.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppError;
use crate::providers::snippet;

pub const OPEN_METEO_PROVIDER_LABEL: &str = "open-meteo";

const FORECAST_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch(&self, query: Vec<(String, String)>) -> Result<Value, AppError>;
}

pub struct OpenMeteoClient {
    http: reqwest::Client,
}

impl OpenMeteoClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    async fn fetch(&self, query: Vec<(String, String)>) -> Result<Value, AppError> {
        let response = self
            .http
            .get(FORECAST_ENDPOINT)
            .query(&query)
            .send()
            .await
            .map_err(|err| upstream_error(format!("Weather API request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream_error(format!(
                "Weather API request failed: {status} {}",
                snippet(&body)
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| upstream_error(format!("Weather API request failed: {err}")))
    }
}

fn upstream_error(message: String) -> AppError {
    AppError::upstream(OPEN_METEO_PROVIDER_LABEL, message)
}

//! ExchangeRate-API client. The API key is a URL path segment, so every
//! error string passes through [`scrub_secret`] before leaving this module.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppError;
use crate::providers::{scrub_secret, snippet};

pub const EXCHANGE_RATE_PROVIDER_LABEL: &str = "exchangerate-api";

const PAIR_ENDPOINT_BASE: &str = "https://v6.exchangerate-api.com/v6";

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    async fn pair_rate(&self, from: &str, to: &str) -> Result<Value, AppError>;
}

pub struct ExchangeRateClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl ExchangeRateClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }
}

#[async_trait]
impl ExchangeRateProvider for ExchangeRateClient {
    async fn pair_rate(&self, from: &str, to: &str) -> Result<Value, AppError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AppError::missing_credential("EXCHANGE_RATE_API_KEY"));
        };

        let url = format!("{PAIR_ENDPOINT_BASE}/{api_key}/pair/{from}/{to}");
        let response = self.http.get(url).send().await.map_err(|err| {
            upstream_error(scrub_secret(
                format!("Currency API request failed: {err}"),
                api_key,
            ))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream_error(scrub_secret(
                format!("Currency API request failed: {status} {}", snippet(&body)),
                api_key,
            )));
        }

        response.json::<Value>().await.map_err(|err| {
            upstream_error(scrub_secret(
                format!("Currency API request failed: {err}"),
                api_key,
            ))
        })
    }
}

fn upstream_error(message: String) -> AppError {
    AppError::upstream(EXCHANGE_RATE_PROVIDER_LABEL, message)
}

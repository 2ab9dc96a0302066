//! SerpAPI client covering the Google travel engines
//!
//! One endpoint serves four engines; the engine picks the error wording and
//! the provider label surfaced in tool results.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppError;
use crate::providers::{scrub_secret, snippet};

pub const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerpApiEngine {
    GoogleFlights,
    GoogleHotels,
    GoogleEvents,
    GoogleFinance,
}

impl SerpApiEngine {
    pub fn query_value(self) -> &'static str {
        match self {
            Self::GoogleFlights => "google_flights",
            Self::GoogleHotels => "google_hotels",
            Self::GoogleEvents => "google_events",
            Self::GoogleFinance => "google_finance",
        }
    }

    pub fn provider_label(self) -> &'static str {
        match self {
            Self::GoogleFlights => "Google Flights (SerpAPI)",
            Self::GoogleHotels => "Google Hotels (SerpAPI)",
            Self::GoogleEvents => "Google Events (SerpAPI)",
            Self::GoogleFinance => "Google Finance (SerpAPI)",
        }
    }

    // The finance engine predates the engine-specific wording and keeps the
    // generic message.
    pub fn error_prefix(self) -> &'static str {
        match self {
            Self::GoogleFlights => "Google Flights API request failed",
            Self::GoogleHotels => "Google Hotels API request failed",
            Self::GoogleEvents => "Google Events API request failed",
            Self::GoogleFinance => "API request failed",
        }
    }
}

#[async_trait]
pub trait SerpApiProvider: Send + Sync {
    async fn search(
        &self,
        engine: SerpApiEngine,
        params: Vec<(String, String)>,
    ) -> Result<Value, AppError>;
}

pub struct SerpApiClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl SerpApiClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }
}

#[async_trait]
impl SerpApiProvider for SerpApiClient {
    async fn search(
        &self,
        engine: SerpApiEngine,
        params: Vec<(String, String)>,
    ) -> Result<Value, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::missing_credential("SERPAPI_KEY"))?;

        let mut query: Vec<(String, String)> = Vec::with_capacity(params.len() + 2);
        query.push(("engine".to_string(), engine.query_value().to_string()));
        query.extend(params);
        query.push(("api_key".to_string(), api_key.to_string()));

        let response = self
            .http
            .get(SERPAPI_ENDPOINT)
            .query(&query)
            .send()
            .await
            .map_err(|err| {
                AppError::upstream(
                    engine.provider_label(),
                    scrub_secret(format!("{}: {err}", engine.error_prefix()), api_key),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(
                engine.provider_label(),
                scrub_secret(
                    format!("{}: {status} {}", engine.error_prefix(), snippet(&body)),
                    api_key,
                ),
            ));
        }

        response.json::<Value>().await.map_err(|err| {
            AppError::upstream(
                engine.provider_label(),
                scrub_secret(format!("{}: {err}", engine.error_prefix()), api_key),
            )
        })
    }
}

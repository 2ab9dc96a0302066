//! Nominatim (OpenStreetMap) geocoding client.
//!
//! The public Nominatim instance requires an identifying User-Agent and at
//! most one request per second per client, so the client carries a random
//! per-process agent string and paces requests through a mutex.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::errors::AppError;
use crate::providers::snippet;

const SEARCH_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct GeocodeQuery {
    pub location: String,
    pub limit: u8,
    pub language: String,
    pub addressdetails: bool,
    pub country_codes: Option<String>,
    pub timeout_secs: u64,
}

#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn search(&self, query: &GeocodeQuery) -> Result<Vec<Value>, AppError>;
}

pub struct NominatimClient {
    http: reqwest::Client,
    user_agent: String,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            user_agent: format!("{}.com", Uuid::new_v4()),
            last_request: Mutex::new(None),
        }
    }

    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

fn query_params(query: &GeocodeQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("q".to_string(), query.location.clone()),
        ("format".to_string(), "jsonv2".to_string()),
        ("limit".to_string(), query.limit.to_string()),
        ("accept-language".to_string(), query.language.clone()),
        (
            "addressdetails".to_string(),
            if query.addressdetails { "1" } else { "0" }.to_string(),
        ),
    ];
    if let Some(codes) = &query.country_codes {
        params.push(("countrycodes".to_string(), codes.clone()));
    }
    params
}

#[async_trait]
impl GeocodeProvider for NominatimClient {
    async fn search(&self, query: &GeocodeQuery) -> Result<Vec<Value>, AppError> {
        self.pace().await;

        let response = self
            .http
            .get(SEARCH_ENDPOINT)
            .header(USER_AGENT, &self.user_agent)
            .timeout(Duration::from_secs(query.timeout_secs))
            .query(&query_params(query))
            .send()
            .await
            .map_err(|err| upstream_error(format!("Geocoding service error: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream_error(format!(
                "Geocoding service error: {status} {}",
                snippet(&body)
            )));
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|err| upstream_error(format!("Geocoding service error: {err}")))
    }
}

fn upstream_error(message: String) -> AppError {
    AppError::upstream("Nominatim", message)
}

#[cfg(test)]
mod tests {
    use super::{query_params, GeocodeQuery, NominatimClient};

    fn sample_query() -> GeocodeQuery {
        GeocodeQuery {
            location: "Eiffel Tower".to_string(),
            limit: 1,
            language: "en".to_string(),
            addressdetails: true,
            country_codes: None,
            timeout_secs: 10,
        }
    }

    #[test]
    fn query_params_cover_the_basics() {
        let params = query_params(&sample_query());
        assert!(params.contains(&("q".to_string(), "Eiffel Tower".to_string())));
        assert!(params.contains(&("format".to_string(), "jsonv2".to_string())));
        assert!(params.contains(&("limit".to_string(), "1".to_string())));
        assert!(params.contains(&("addressdetails".to_string(), "1".to_string())));
        assert!(!params.iter().any(|(key, _)| key == "countrycodes"));
    }

    #[test]
    fn country_codes_are_passed_through_when_present() {
        let mut query = sample_query();
        query.country_codes = Some("fr,de".to_string());
        query.addressdetails = false;

        let params = query_params(&query);
        assert!(params.contains(&("countrycodes".to_string(), "fr,de".to_string())));
        assert!(params.contains(&("addressdetails".to_string(), "0".to_string())));
    }

    #[test]
    fn user_agent_looks_like_a_hostname() {
        let client = NominatimClient::new(reqwest::Client::new());
        assert!(client.user_agent.ends_with(".com"));
        assert!(client.user_agent.len() > ".com".len());
    }
}

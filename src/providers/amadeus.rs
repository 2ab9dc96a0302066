//! Amadeus Self-Service API client
//!
//! Client-credentials OAuth with a cached access token, then bearer GETs
//! against the shopping and reference-data endpoints.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::providers::snippet;

pub const AMADEUS_PROVIDER_LABEL: &str = "Amadeus GDS";

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";
const HOTELS_BY_CITY_PATH: &str = "/v1/reference-data/locations/hotels/by-city";
const HOTELS_BY_GEOCODE_PATH: &str = "/v1/reference-data/locations/hotels/by-geocode";
const HOTEL_OFFERS_PATH: &str = "/v2/shopping/hotel-offers";
const ACTIVITIES_PATH: &str = "/v1/shopping/activities";

// Refresh slightly before the advertised expiry so an in-flight request
// never races an expiring token.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 30;

#[async_trait]
pub trait AmadeusProvider: Send + Sync {
    async fn flight_offers(&self, query: Vec<(String, String)>) -> Result<Value, AppError>;
    async fn hotels_by_city(&self, query: Vec<(String, String)>) -> Result<Value, AppError>;
    async fn hotels_by_geocode(&self, query: Vec<(String, String)>) -> Result<Value, AppError>;
    async fn hotel_offers(&self, query: Vec<(String, String)>) -> Result<Value, AppError>;
    async fn activities(&self, query: Vec<(String, String)>) -> Result<Value, AppError>;
    async fn activity_by_id(&self, activity_id: &str) -> Result<Value, AppError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn from_response(access_token: String, expires_in_secs: u64, issued_at: Instant) -> Self {
        let usable_secs = expires_in_secs.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        Self {
            access_token,
            expires_at: issued_at + Duration::from_secs(usable_secs),
        }
    }

    fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

pub struct AmadeusClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl AmadeusClient {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        api_key: String,
        api_secret: String,
    ) -> Self {
        Self {
            http,
            base_url,
            api_key,
            api_secret,
            token: Mutex::new(None),
        }
    }

    // Holding the lock across the token request serializes refreshes, so
    // concurrent tool calls do not stampede the OAuth endpoint.
    async fn access_token(&self) -> Result<String, AppError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_valid_at(Instant::now()) {
                return Ok(token.access_token.clone());
            }
        }

        let issued_at = Instant::now();
        let response = self
            .http
            .post(format!("{}{TOKEN_PATH}", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.as_str()),
                ("client_secret", self.api_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|err| upstream_error(format!("Amadeus API error: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream_error(format!(
                "Amadeus API error: token request returned {status} {}",
                snippet(&body)
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| upstream_error(format!("Amadeus API error: {err}")))?;

        let fresh = CachedToken::from_response(token.access_token, token.expires_in, issued_at);
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value, AppError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|err| upstream_error(format!("Amadeus API error: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream_error(format!(
                "Amadeus API error: {status} {}",
                snippet(&body)
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| upstream_error(format!("Amadeus API error: {err}")))
    }
}

fn upstream_error(message: String) -> AppError {
    AppError::upstream(AMADEUS_PROVIDER_LABEL, message)
}

#[async_trait]
impl AmadeusProvider for AmadeusClient {
    async fn flight_offers(&self, query: Vec<(String, String)>) -> Result<Value, AppError> {
        self.get_json(FLIGHT_OFFERS_PATH, &query).await
    }

    async fn hotels_by_city(&self, query: Vec<(String, String)>) -> Result<Value, AppError> {
        self.get_json(HOTELS_BY_CITY_PATH, &query).await
    }

    async fn hotels_by_geocode(&self, query: Vec<(String, String)>) -> Result<Value, AppError> {
        self.get_json(HOTELS_BY_GEOCODE_PATH, &query).await
    }

    async fn hotel_offers(&self, query: Vec<(String, String)>) -> Result<Value, AppError> {
        self.get_json(HOTEL_OFFERS_PATH, &query).await
    }

    async fn activities(&self, query: Vec<(String, String)>) -> Result<Value, AppError> {
        self.get_json(ACTIVITIES_PATH, &query).await
    }

    async fn activity_by_id(&self, activity_id: &str) -> Result<Value, AppError> {
        let path = format!("{ACTIVITIES_PATH}/{activity_id}");
        self.get_json(&path, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{CachedToken, TOKEN_EXPIRY_MARGIN_SECS};

    #[test]
    fn tokens_shorter_than_the_margin_expire_immediately() {
        let issued_at = Instant::now();
        let token = CachedToken::from_response("abc".to_string(), 10, issued_at);
        assert!(!token.is_valid_at(issued_at));
    }

    #[test]
    fn tokens_expire_margin_seconds_early() {
        let issued_at = Instant::now();
        let token = CachedToken::from_response("abc".to_string(), 1799, issued_at);

        let usable = 1799 - TOKEN_EXPIRY_MARGIN_SECS;
        assert!(token.is_valid_at(issued_at + Duration::from_secs(usable - 1)));
        assert!(!token.is_valid_at(issued_at + Duration::from_secs(usable)));
    }
}

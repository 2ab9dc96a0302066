//! Upstream travel platform clients
//!
//! Each upstream service sits behind a trait object so the protocol and tool
//! layers stay testable without network access.

pub mod amadeus;
pub mod exchange_rate;
pub mod nominatim;
pub mod open_meteo;
pub mod serpapi;

pub use amadeus::{AmadeusClient, AmadeusProvider, AMADEUS_PROVIDER_LABEL};
pub use exchange_rate::{ExchangeRateClient, ExchangeRateProvider, EXCHANGE_RATE_PROVIDER_LABEL};
pub use nominatim::{GeocodeProvider, GeocodeQuery, NominatimClient};
pub use open_meteo::{ForecastProvider, OpenMeteoClient, OPEN_METEO_PROVIDER_LABEL};
pub use serpapi::{SerpApiClient, SerpApiEngine, SerpApiProvider};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Trims an upstream error body down to something loggable.
pub(crate) fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }

    let cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("{cut}...")
}

/// Removes a credential from an error message before it reaches logs or
/// clients. Transport errors can echo the full request URL.
pub(crate) fn scrub_secret(message: String, secret: &str) -> String {
    if secret.is_empty() {
        return message;
    }

    message.replace(secret, "[REDACTED]")
}

#[cfg(test)]
mod tests {
    use super::{scrub_secret, snippet};

    #[test]
    fn snippet_keeps_short_bodies() {
        assert_eq!(snippet("  {\"message\":\"bad key\"}  "), "{\"message\":\"bad key\"}");
    }

    #[test]
    fn snippet_truncates_long_bodies_on_char_boundaries() {
        let body = "é".repeat(500);
        let cut = snippet(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn scrub_secret_redacts_embedded_credentials() {
        let scrubbed = scrub_secret(
            "error sending request for url (https://example.com/v6/sk-12345/pair/USD/EUR)"
                .to_string(),
            "sk-12345",
        );
        assert!(!scrubbed.contains("sk-12345"));
        assert!(scrubbed.contains("[REDACTED]"));
    }

    #[test]
    fn scrub_secret_ignores_empty_secret() {
        let message = "plain failure".to_string();
        assert_eq!(scrub_secret(message.clone(), ""), message);
    }
}

use std::{env, net::SocketAddr};

use thiserror::Error;

pub const DEFAULT_AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub api_token: Option<String>,
    pub amadeus_api_key: String,
    pub amadeus_api_secret: String,
    pub amadeus_base_url: String,
    pub serpapi_key: Option<String>,
    pub exchange_rate_api_key: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("AMADEUS_API_KEY is required and must not be empty")]
    MissingAmadeusKey,
    #[error("AMADEUS_API_SECRET is required and must not be empty")]
    MissingAmadeusSecret,
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let amadeus_api_key =
            non_empty_var("AMADEUS_API_KEY").ok_or(ConfigError::MissingAmadeusKey)?;
        let amadeus_api_secret =
            non_empty_var("AMADEUS_API_SECRET").ok_or(ConfigError::MissingAmadeusSecret)?;
        let amadeus_base_url = non_empty_var("AMADEUS_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_AMADEUS_BASE_URL.to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let bind_port = env::var("BIND_PORT")
            .ok()
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8000);

        let config = Self {
            bind_addr,
            bind_port,
            api_token: non_empty_var("TRAVEL_API_TOKEN"),
            amadeus_api_key,
            amadeus_api_secret,
            amadeus_base_url,
            serpapi_key: non_empty_var("SERPAPI_KEY"),
            exchange_rate_api_key: non_empty_var("EXCHANGE_RATE_API_KEY"),
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn set_required_vars() {
        env::set_var("AMADEUS_API_KEY", "key");
        env::set_var("AMADEUS_API_SECRET", "secret");
        env::remove_var("AMADEUS_BASE_URL");
        env::remove_var("BIND_ADDR");
        env::remove_var("BIND_PORT");
        env::remove_var("TRAVEL_API_TOKEN");
        env::remove_var("SERPAPI_KEY");
        env::remove_var("EXCHANGE_RATE_API_KEY");
    }

    #[test]
    fn parse_defaults() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        set_required_vars();

        let config = Config::from_env().expect("config should parse");
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.bind_port, 8000);
        assert_eq!(config.amadeus_base_url, DEFAULT_AMADEUS_BASE_URL);
        assert_eq!(config.api_token, None);
        assert_eq!(config.serpapi_key, None);
        assert_eq!(config.exchange_rate_api_key, None);
    }

    #[test]
    fn missing_amadeus_key_fails() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        set_required_vars();
        env::remove_var("AMADEUS_API_KEY");

        let err = Config::from_env().expect_err("expected missing key error");
        assert!(matches!(err, ConfigError::MissingAmadeusKey));
    }

    #[test]
    fn blank_amadeus_secret_fails() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        set_required_vars();
        env::set_var("AMADEUS_API_SECRET", "   ");

        let err = Config::from_env().expect_err("expected missing secret error");
        assert!(matches!(err, ConfigError::MissingAmadeusSecret));
    }

    #[test]
    fn invalid_port_fails() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        set_required_vars();
        env::set_var("BIND_PORT", "not-a-port");

        let err = Config::from_env().expect_err("expected invalid port error");
        assert!(matches!(err, ConfigError::InvalidPort));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        set_required_vars();
        env::set_var("AMADEUS_BASE_URL", "https://api.amadeus.com/");

        let config = Config::from_env().expect("config should parse");
        assert_eq!(config.amadeus_base_url, "https://api.amadeus.com");
    }

    #[test]
    fn optional_keys_are_read() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        set_required_vars();
        env::set_var("TRAVEL_API_TOKEN", " token ");
        env::set_var("SERPAPI_KEY", "serp");
        env::set_var("EXCHANGE_RATE_API_KEY", "fx");

        let config = Config::from_env().expect("config should parse");
        assert_eq!(config.api_token.as_deref(), Some("token"));
        assert_eq!(config.serpapi_key.as_deref(), Some("serp"));
        assert_eq!(config.exchange_rate_api_key.as_deref(), Some("fx"));
    }
}

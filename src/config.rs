//! Engine configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_USER_API_URL: &str = "https://randomuser.me/api/";
const DEFAULT_GEOCODE_API_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DEFAULT_PAGE_SIZE: u32 = 25;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Engine configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- User listing source ---
    /// Base URL of the paged user listing API
    pub user_api_url: String,
    /// Seed that keeps pages stable across requests
    pub user_api_seed: String,
    /// Nationality codes forwarded to the listing API (empty = any)
    pub nationalities: Vec<String>,
    /// Records requested per page
    pub page_size: u32,
    /// Optional cap on the number of pages fetched in a session
    pub max_pages: Option<u32>,

    // --- Geocoding ---
    /// Geocoding endpoint
    pub geocode_api_url: String,
    /// Geocoding API key
    pub geocode_api_key: String,

    // --- Storage / transport ---
    /// Path of the favorites document
    pub favorites_path: PathBuf,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            user_api_url: DEFAULT_USER_API_URL.to_string(),
            user_api_seed: "directory".to_string(),
            nationalities: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
            geocode_api_url: DEFAULT_GEOCODE_API_URL.to_string(),
            geocode_api_key: "test_geocode_key".to_string(),
            favorites_path: PathBuf::from("favorites.json"),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            user_api_url: env::var("USER_API_URL")
                .unwrap_or_else(|_| DEFAULT_USER_API_URL.to_string()),
            user_api_seed: env::var("USER_API_SEED").unwrap_or_else(|_| "directory".to_string()),
            nationalities: env::var("USER_API_NATIONALITIES")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            page_size: parse_var("PAGE_SIZE")?.unwrap_or(DEFAULT_PAGE_SIZE),
            max_pages: parse_var("MAX_PAGES")?,
            geocode_api_url: env::var("GEOCODE_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEOCODE_API_URL.to_string()),
            geocode_api_key: env::var("GEOCODE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GEOCODE_API_KEY"))?,
            favorites_path: env::var("FAVORITES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("favorites.json")),
            http_timeout: Duration::from_secs(
                parse_var("HTTP_TIMEOUT_SECS")?.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
        })
    }
}

/// Parse an optional numeric variable; a present but unparseable value is an error.
fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(None),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("GEOCODE_API_KEY", " test_key ");
        env::set_var("PAGE_SIZE", "10");
        env::set_var("USER_API_NATIONALITIES", "br, ca,,fr");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.geocode_api_key, "test_key");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.nationalities, vec!["BR", "CA", "FR"]);
        assert_eq!(config.user_api_url, DEFAULT_USER_API_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_parse_list_skips_blanks() {
        assert!(parse_list(" , ").is_empty());
        assert_eq!(parse_list("de"), vec!["DE"]);
    }
}

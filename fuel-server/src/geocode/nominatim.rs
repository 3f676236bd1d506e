//! Nominatim geocoding client, used for planning requests.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::domain::Coordinate;

use super::Geocoder;
use super::error::GeocodeError;
use super::types::{first_hit, read_search_response};

/// Default base URL for the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying User-Agent.
const DEFAULT_USER_AGENT: &str = "fuel_app";

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the API
    pub base_url: String,
    /// User-Agent header value
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NominatimConfig {
    /// Create a config pointing at the public instance.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (self-hosted instance or testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the Nominatim `/search` endpoint.
///
/// One request per call, no retry: failures surface immediately.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    /// Create a new Nominatim client.
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent).map_err(|_| GeocodeError::Api {
            status: 0,
            message: "Invalid User-Agent format".to_string(),
        })?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await?;

        let body = read_search_response(response, None).await?;
        first_hit(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = NominatimConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.user_agent, "fuel_app");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn config_builders() {
        let config = NominatimConfig::new()
            .with_base_url("http://localhost:8080")
            .with_user_agent("test-agent")
            .with_timeout(3);
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn rejects_invalid_user_agent() {
        let config = NominatimConfig::new().with_user_agent("bad\nagent");
        assert!(NominatimClient::new(config).is_err());
    }
}

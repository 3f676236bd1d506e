//! LocationIQ geocoding client, used by the station batch job.

use reqwest::StatusCode;

use crate::domain::Coordinate;

use super::Geocoder;
use super::error::GeocodeError;
use super::types::{first_hit, read_search_response};

/// Default base URL for the LocationIQ US region.
const DEFAULT_BASE_URL: &str = "https://us1.locationiq.com";

/// Configuration for the LocationIQ client.
#[derive(Debug, Clone)]
pub struct LocationIqConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// ISO country codes to restrict results to
    pub country_codes: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LocationIqConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            country_codes: "us".to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the LocationIQ `/v1/search` endpoint.
#[derive(Debug, Clone)]
pub struct LocationIqClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    country_codes: String,
}

impl LocationIqClient {
    /// Create a new LocationIQ client.
    pub fn new(config: LocationIqConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            country_codes: config.country_codes,
        })
    }
}

impl Geocoder for LocationIqClient {
    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let url = format!("{}/v1/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("format", "json"),
                ("countrycodes", self.country_codes.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        // LocationIQ reports "Unable to geocode" as a 404.
        let body = read_search_response(response, Some(StatusCode::NOT_FOUND)).await?;
        first_hit(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = LocationIqConfig::new("pk.test");
        assert_eq!(config.api_key, "pk.test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.country_codes, "us");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn config_with_base_url() {
        let config = LocationIqConfig::new("pk.test")
            .with_base_url("http://localhost:9000")
            .with_timeout(2);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, 2);
    }
}

//! Geocoding error types.

use crate::domain::InvalidCoordinate;

/// Errors from a geocoding service.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service has no match for the address
    #[error("no match found for address")]
    NotFound,

    /// Rate limited by the service
    #[error("rate limited by geocoding service")]
    RateLimited,

    /// Invalid or missing API key
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response body
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The service returned a coordinate outside valid ranges
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),
}

impl GeocodeError {
    /// Whether a later attempt at the same address might succeed.
    ///
    /// Network failures, rate limiting, server errors and garbled responses
    /// are transient. A missing match, bad credentials, client errors and
    /// invalid coordinates are not.
    pub fn is_transient(&self) -> bool {
        match self {
            GeocodeError::Http(_) | GeocodeError::RateLimited | GeocodeError::Json { .. } => true,
            GeocodeError::Api { status, .. } => *status >= 500,
            GeocodeError::NotFound
            | GeocodeError::Unauthorized
            | GeocodeError::InvalidCoordinate(_) => false,
        }
    }
}

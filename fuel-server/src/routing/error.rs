//! Routing error types.

use crate::domain::InvalidCoordinate;

/// Errors from a routing service.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response body
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The service found no route between the points
    #[error("no route found ({code})")]
    NoRoute { code: String },

    /// The route contained a point outside valid ranges
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),
}

//! Bounded retry for rate-limited geocoding requests.

use std::time::Duration;

use tracing::warn;

use crate::domain::Coordinate;

use super::Geocoder;
use super::error::GeocodeError;

/// Retry policy for rate-limit responses.
///
/// Only [`GeocodeError::RateLimited`] is retried; every other outcome is
/// returned as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first (at least 1).
    pub max_attempts: u32,

    /// Wait before retrying after a rate-limit response.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Geocode `query`, retrying on rate limiting.
    ///
    /// At most `request_cap` requests are sent, even when the policy would
    /// allow more; the first request is always sent. Returns the final result
    /// and the number of requests made.
    pub async fn geocode<G: Geocoder>(
        &self,
        geocoder: &G,
        query: &str,
        request_cap: u32,
    ) -> (Result<Coordinate, GeocodeError>, u32) {
        let max_attempts = self.max_attempts.min(request_cap).max(1);
        let mut attempt = 1;

        loop {
            let result = geocoder.geocode(query).await;
            match result {
                Err(GeocodeError::RateLimited) if attempt < max_attempts => {
                    warn!(
                        attempt,
                        backoff_secs = self.backoff.as_secs(),
                        "rate limit exceeded, backing off"
                    );
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                other => return (other, attempt),
            }
        }
    }
}

impl Default for RetryPolicy {
    /// One retry after a one-minute wait.
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_secs(60),
        }
    }
}

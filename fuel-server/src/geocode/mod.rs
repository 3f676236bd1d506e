//! Address geocoding clients.
//!
//! Two services are supported:
//! - Nominatim, used for interactive trip planning (no API key)
//! - LocationIQ, used by the offline batch job that locates stations
//!
//! Both are used through the [`Geocoder`] trait so the planner and the batch
//! job can be exercised against mocks.

mod batch;
mod error;
mod locationiq;
mod nominatim;
mod retry;
mod types;

use std::future::Future;

use crate::domain::Coordinate;

pub use batch::{BatchConfig, BatchError, BatchProgress, run_batch};
pub use error::GeocodeError;
pub use locationiq::{LocationIqClient, LocationIqConfig};
pub use nominatim::{NominatimClient, NominatimConfig};
pub use retry::RetryPolicy;

/// Resolves a free-text address to a coordinate.
pub trait Geocoder {
    /// Geocode `query`, returning the best match.
    fn geocode(&self, query: &str)
    -> impl Future<Output = Result<Coordinate, GeocodeError>> + Send;
}

//! Driving-route providers.

mod error;
mod osrm;

use std::future::Future;

use crate::domain::Coordinate;

pub use error::RoutingError;
pub use osrm::{OsrmClient, OsrmConfig};

/// A driving route as returned by a routing service.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    /// Ordered points from origin to destination.
    pub coordinates: Vec<Coordinate>,

    /// The service's own distance estimate. Planning uses the geodesic
    /// length of `coordinates` instead.
    pub distance_miles: f64,
}

/// Computes a driving route between two coordinates.
pub trait RouteProvider {
    fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<RouteGeometry, RoutingError>> + Send;
}

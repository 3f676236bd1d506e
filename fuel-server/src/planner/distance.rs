//! Cumulative distance along a route polyline.

use geo::{Distance, Geodesic};

use crate::domain::{Coordinate, RoutePoint};

/// Metres in one statute mile.
pub const METRES_PER_MILE: f64 = 1609.344;

/// Geodesic (WGS84 ellipsoid) distance between two coordinates, in miles.
pub fn geodesic_miles(a: Coordinate, b: Coordinate) -> f64 {
    Geodesic::distance(a.to_point(), b.to_point()) / METRES_PER_MILE
}

/// Tag each route coordinate with its distance from the route start.
///
/// The first point is at zero; each following point adds the geodesic
/// length of the segment from its predecessor. Repeated points add a
/// zero-length segment. An empty input yields an empty output.
pub fn accumulate(coordinates: &[Coordinate]) -> Vec<RoutePoint> {
    let mut points = Vec::with_capacity(coordinates.len());
    let mut total = 0.0;
    let mut previous: Option<Coordinate> = None;

    for &coordinate in coordinates {
        if let Some(prev) = previous {
            total += geodesic_miles(prev, coordinate);
        }
        points.push(RoutePoint::new(coordinate, total));
        previous = Some(coordinate);
    }

    points
}

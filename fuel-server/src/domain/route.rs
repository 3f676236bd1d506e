//! Route polyline types.

use super::Coordinate;

/// A point on the route polyline with its distance from the route start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePoint {
    pub coordinate: Coordinate,

    /// Great-circle distance along the route from the first point, in miles.
    /// Non-decreasing along the route; zero at the first point.
    pub cumulative_miles: f64,
}

impl RoutePoint {
    pub fn new(coordinate: Coordinate, cumulative_miles: f64) -> Self {
        Self {
            coordinate,
            cumulative_miles,
        }
    }
}

/// Total length of a route: the cumulative distance of its last point.
///
/// Returns `None` for an empty route.
pub fn total_miles(points: &[RoutePoint]) -> Option<f64> {
    points.last().map(|p| p.cumulative_miles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_last_cumulative() {
        let c = Coordinate::new(0.0, 0.0).unwrap();
        let points = vec![
            RoutePoint::new(c, 0.0),
            RoutePoint::new(c, 12.5),
            RoutePoint::new(c, 40.0),
        ];
        assert_eq!(total_miles(&points), Some(40.0));
    }

    #[test]
    fn empty_route_has_no_total() {
        assert_eq!(total_miles(&[]), None);
    }
}

//! Projection of matched stations onto the distance-along-route axis.

use crate::domain::{Coordinate, RoutePoint, Station};

use super::matcher::RouteMatch;

/// A station positioned along the route.
#[derive(Debug, Clone, Copy)]
pub struct MatchedStation<'a> {
    pub station: &'a Station,

    pub coordinate: Coordinate,

    /// Index of the nearest route point.
    pub route_index: usize,

    /// Cumulative route distance of the nearest route point, in miles.
    pub projected_miles: f64,
}

impl MatchedStation<'_> {
    /// Retail price of the matched station.
    pub fn price(&self) -> f64 {
        self.station.price
    }
}

/// Project matches onto the route and sort them for planning.
///
/// Ordered by projected distance, then by station id, so stations sharing a
/// route point always appear in the same order.
pub fn project<'a>(matches: &[RouteMatch<'a>], route: &[RoutePoint]) -> Vec<MatchedStation<'a>> {
    let mut projected: Vec<MatchedStation<'a>> = matches
        .iter()
        .filter_map(|m| {
            let point = route.get(m.route_index)?;
            Some(MatchedStation {
                station: m.station,
                coordinate: m.coordinate,
                route_index: m.route_index,
                projected_miles: point.cumulative_miles,
            })
        })
        .collect();

    projected.sort_by(|a, b| {
        a.projected_miles
            .total_cmp(&b.projected_miles)
            .then_with(|| a.station.id.cmp(&b.station.id))
    });

    projected
}

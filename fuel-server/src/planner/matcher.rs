//! Spatial matching of stations to the route polyline.
//!
//! Route points are bulk-loaded into an R-tree keyed on `[lat, lon]`, so each
//! station costs one nearest-neighbour query (roughly `O(log R)`) instead of a
//! scan over every route point.
//!
//! Distances here are Euclidean in degree space, compared against a radius
//! converted from miles with a fixed miles-per-degree factor. A degree of
//! longitude covers fewer miles away from the equator, so the effective
//! east-west radius shrinks with latitude. This approximation is kept
//! deliberately; projected distances along the route are still geodesic.

use rstar::RTree;
use rstar::primitives::GeomWithData;
use tracing::debug;

use crate::domain::{Coordinate, RoutePoint, Station};

/// R-tree entry: a route point's `[lat, lon]` tagged with its index.
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Nearest-neighbour index over route points.
pub struct RouteIndex {
    tree: RTree<IndexedPoint>,
}

impl RouteIndex {
    /// Build the index from the route.
    pub fn build(points: &[RoutePoint]) -> Self {
        let entries: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(idx, p)| GeomWithData::new(p.coordinate.lat_lon(), idx))
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed route points.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the route had no points.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Find the route point nearest to `coordinate`.
    ///
    /// Returns the route index and the separation in degrees. When several
    /// route points are equally near, the lowest index (earliest along the
    /// route) wins.
    pub fn nearest(&self, coordinate: Coordinate) -> Option<(usize, f64)> {
        let query = coordinate.lat_lon();
        let mut neighbours = self.tree.nearest_neighbor_iter_with_distance_2(&query);

        let (first, best_distance_2) = neighbours.next()?;
        let mut best_index = first.data;

        for (candidate, distance_2) in neighbours {
            if distance_2 > best_distance_2 {
                break;
            }
            best_index = best_index.min(candidate.data);
        }

        Some((best_index, best_distance_2.sqrt()))
    }
}

/// A station associated with its nearest route point.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
    pub station: &'a Station,

    /// The station's location.
    pub coordinate: Coordinate,

    /// Index of the nearest route point.
    pub route_index: usize,

    /// Angular separation from that point, in degrees.
    pub offset_degrees: f64,
}

/// Associate each station with its nearest route point.
///
/// Stations without coordinates, and stations farther than `radius_degrees`
/// from every route point, are dropped. Output follows the input order.
pub fn match_stations<'a>(
    index: &RouteIndex,
    stations: &'a [Station],
    radius_degrees: f64,
) -> Vec<RouteMatch<'a>> {
    let matches: Vec<RouteMatch<'a>> = stations
        .iter()
        .filter_map(|station| {
            let coordinate = station.coordinate?;
            let (route_index, offset_degrees) = index.nearest(coordinate)?;
            (offset_degrees <= radius_degrees).then_some(RouteMatch {
                station,
                coordinate,
                route_index,
                offset_degrees,
            })
        })
        .collect();

    debug!(
        candidates = stations.len(),
        matched = matches.len(),
        route_points = index.len(),
        "matched stations to route"
    );

    matches
}

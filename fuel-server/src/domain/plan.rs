//! Refueling plan output types.

use super::{Coordinate, StationId};

/// A refueling stop chosen by the planner.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub station_id: StationId,
    pub name: String,

    /// Full address (`"address, city, state"`).
    pub address: String,

    pub coordinate: Coordinate,

    /// Projected distance along the route, in miles.
    pub distance_from_start: f64,

    /// Fuel units bought here: the leg driven to reach this stop.
    pub fuel_units: f64,

    /// Price per unit at this station.
    pub price: f64,

    /// `fuel_units * price`, unrounded.
    pub cost: f64,
}

/// A complete plan for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// The route polyline as returned by the routing engine.
    pub route_geometry: Vec<Coordinate>,

    /// Total route length in miles (last cumulative distance).
    pub total_distance_miles: f64,

    /// Stops in ascending `distance_from_start` order.
    pub stops: Vec<Stop>,

    /// Total fuel cost, rounded to cents.
    pub total_cost: f64,
}

/// Round a monetary or distance value to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(350.400000001), 350.4);
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(0.0), 0.0);
    }
}

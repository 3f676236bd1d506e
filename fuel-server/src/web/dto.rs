//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Plan, Stop, round2};

/// Request to plan a route.
///
/// Both fields are optional at the wire level so that a missing address is
/// reported as an invalid request rather than a JSON error.
#[derive(Debug, Default, Deserialize)]
pub struct PlanRouteRequest {
    /// Start address (free text, US)
    #[serde(default)]
    pub start: Option<String>,

    /// End address (free text, US)
    #[serde(default)]
    pub end: Option<String>,
}

/// Response to a route planning request.
#[derive(Debug, Serialize)]
pub struct PlanRouteResponse {
    pub route: RouteResult,
    pub fuel_stops: Vec<FuelStopResult>,

    /// Total fuel cost, rounded to cents
    pub total_cost: f64,
}

/// The driven route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    /// GeoJSON-style `[lon, lat]` positions
    pub geometry: Vec<[f64; 2]>,

    /// Route length in miles, rounded to 2 dp
    pub total_distance_miles: f64,
}

/// A refueling stop.
#[derive(Debug, Serialize)]
pub struct FuelStopResult {
    pub station_id: u64,
    pub name: String,

    /// `"address, city, state"`
    pub address: String,

    pub latitude: f64,
    pub longitude: f64,

    /// Cost of fuel bought here, rounded to cents
    pub cost: f64,

    /// Price per unit
    pub retail_price: f64,

    /// Fuel units bought here
    pub fuel_units: f64,

    /// Miles along the route, rounded to 2 dp
    pub distance_from_start: f64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Machine-readable error kind
    pub kind: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,

    /// Stations in the store
    pub stations: usize,

    /// Stations with coordinates
    pub eligible_stations: usize,

    /// Addresses in the geocode cache
    pub cached_geocodes: u64,
}

// Conversion implementations

impl FuelStopResult {
    /// Create from a domain Stop.
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            station_id: stop.station_id.0,
            name: stop.name.clone(),
            address: stop.address.clone(),
            latitude: stop.coordinate.latitude(),
            longitude: stop.coordinate.longitude(),
            cost: round2(stop.cost),
            retail_price: stop.price,
            fuel_units: stop.fuel_units,
            distance_from_start: round2(stop.distance_from_start),
        }
    }
}

impl PlanRouteResponse {
    /// Create from a domain Plan.
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            route: RouteResult {
                geometry: plan
                    .route_geometry
                    .iter()
                    .map(|c| [c.longitude(), c.latitude()])
                    .collect(),
                total_distance_miles: round2(plan.total_distance_miles),
            },
            fuel_stops: plan.stops.iter().map(FuelStopResult::from_stop).collect(),
            total_cost: plan.total_cost,
        }
    }
}

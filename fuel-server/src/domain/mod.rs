//! Domain types for the fuel stop planner.
//!
//! Coordinates and stations are validated at construction time, so code that
//! receives these types can trust their validity. Route points, stops and
//! plans are derived per request and never persisted.

mod coord;
mod plan;
mod route;
mod station;

pub use coord::{Coordinate, InvalidCoordinate};
pub use plan::{Plan, Stop, round2};
pub use route::{RoutePoint, total_miles};
pub use station::{GeocodeOutcome, GeocodeStatus, NewStation, Station, StationId};

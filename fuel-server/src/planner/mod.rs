//! Refueling stop planner.
//!
//! Given a driving route and a catalog of priced stations, chooses where a
//! vehicle with a fixed tank range should stop and what the fuel will cost.
//!
//! The pipeline runs in stages:
//! 1. `distance` - cumulative great-circle miles along the polyline
//! 2. `matcher` - stations within the match radius of the route
//! 3. `projector` - each station placed at its nearest route point's mileage
//! 4. `stops` - greedy window-by-window stop selection and costing
//!
//! [`TripPlanner`] puts geocoding and routing in front of the pipeline.

mod config;
mod distance;
mod error;
mod matcher;
mod plan;
mod projector;
mod stops;
mod trip;


pub use config::PlannerConfig;
pub use distance::{METRES_PER_MILE, accumulate, geodesic_miles};
pub use error::PlanError;
pub use matcher::{RouteIndex, RouteMatch, match_stations};
pub use plan::FuelPlanner;
pub use projector::{MatchedStation, project};
pub use stops::{StopPlan, StopPlanner};
pub use trip::TripPlanner;

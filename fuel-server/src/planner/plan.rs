//! Route-to-plan pipeline.
//!
//! Polyline → cumulative distances → spatial match → projection → stops.

use tracing::info;

use crate::domain::{Coordinate, Plan, Station, round2, total_miles};

use super::config::PlannerConfig;
use super::distance;
use super::error::PlanError;
use super::matcher::{RouteIndex, match_stations};
use super::projector::project;
use super::stops::{StopPlan, StopPlanner};

/// Plans refueling stops for a known route over a station snapshot.
///
/// Pure over its inputs: the same geometry and stations always give the
/// same plan.
pub struct FuelPlanner<'a> {
    config: &'a PlannerConfig,
}

impl<'a> FuelPlanner<'a> {
    /// Create a planner borrowing `config`.
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Plan stops along `geometry` using candidates from `stations`.
    ///
    /// Stations without coordinates are ignored.
    pub fn plan(&self, geometry: Vec<Coordinate>, stations: &[Station]) -> Result<Plan, PlanError> {
        let (total, stop_plan) = self.run(&geometry, stations)?;

        Ok(Plan {
            route_geometry: geometry,
            total_distance_miles: total,
            stops: stop_plan.stops,
            total_cost: round2(stop_plan.total_cost),
        })
    }

    /// Run the pipeline and return the unrounded stop plan.
    pub fn plan_stops(
        &self,
        geometry: &[Coordinate],
        stations: &[Station],
    ) -> Result<StopPlan, PlanError> {
        self.run(geometry, stations).map(|(_, stop_plan)| stop_plan)
    }

    /// Returns the route length alongside the stop plan.
    fn run(
        &self,
        geometry: &[Coordinate],
        stations: &[Station],
    ) -> Result<(f64, StopPlan), PlanError> {
        let points = distance::accumulate(geometry);
        let Some(total) = total_miles(&points) else {
            return Err(PlanError::InvalidRequest("route has no points".to_string()));
        };

        let index = RouteIndex::build(&points);
        let matches = match_stations(&index, stations, self.config.match_radius_degrees());
        let candidates = project(&matches, &points);

        info!(
            route_points = points.len(),
            total_miles = total,
            near_route = candidates.len(),
            "found stations near route"
        );

        let stop_plan = StopPlanner::new(self.config).plan(&candidates, total)?;
        Ok((total, stop_plan))
    }
}

//! Greedy refueling stop selection.
//!
//! The vehicle starts at mile 0 with a full tank. While the destination is
//! out of range, the planner looks at the stations reachable from the current
//! position and picks one:
//!
//! - the cheapest station in the last `lookahead_miles` of the window, so the
//!   stop both stretches the tank and is cheap;
//! - failing that, the cheapest station anywhere in the window.
//!
//! Fuel for each leg is bought at the station that ends it. This is a
//! heuristic; it does not guarantee the globally cheapest plan.

use tracing::{debug, trace};

use crate::domain::Stop;

use super::config::PlannerConfig;
use super::error::PlanError;
use super::projector::MatchedStation;

/// Output of the stop planner.
#[derive(Debug, Clone, PartialEq)]
pub struct StopPlan {
    /// Chosen stops in route order.
    pub stops: Vec<Stop>,

    /// Total fuel cost, unrounded.
    pub total_cost: f64,

    /// Total fuel units charged for.
    pub fuel_units: f64,

    /// Distance from the last stop (or the start) to the destination.
    pub final_leg_miles: f64,
}

/// Running cost and fuel totals.
#[derive(Debug, Clone, Copy, Default)]
struct CostLedger {
    total_cost: f64,
    fuel_units: f64,
}

impl CostLedger {
    /// Charge for driving `miles` at `price` per unit; returns `(units, cost)`.
    fn charge(&mut self, config: &PlannerConfig, miles: f64, price: f64) -> (f64, f64) {
        let units = config.fuel_for(miles);
        let cost = units * price;
        self.fuel_units += units;
        self.total_cost += cost;
        (units, cost)
    }
}

/// Greedy stop planner over stations sorted by projected distance.
pub struct StopPlanner<'a> {
    config: &'a PlannerConfig,
}

impl<'a> StopPlanner<'a> {
    /// Create a planner borrowing `config`.
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Choose stops along a route of `total_miles`.
    ///
    /// `candidates` must be sorted ascending by projected distance (as
    /// produced by [`super::projector::project`]).
    ///
    /// When the whole route fits in one tank no stop is made and nothing is
    /// charged: the fuel already in the tank is treated as free. Otherwise
    /// the final leg is charged at the last stop's price.
    pub fn plan(
        &self,
        candidates: &[MatchedStation<'_>],
        total_miles: f64,
    ) -> Result<StopPlan, PlanError> {
        let range = self.config.range_miles;
        let mut position = 0.0;
        let mut cursor = 0;
        let mut ledger = CostLedger::default();
        let mut stops: Vec<Stop> = Vec::new();

        while position + range < total_miles {
            let window_end = position + range;

            // Candidates strictly after the current position, up to the end of range.
            let start =
                cursor + candidates[cursor..].partition_point(|c| c.projected_miles <= position);
            let end =
                start + candidates[start..].partition_point(|c| c.projected_miles <= window_end);
            let window = &candidates[start..end];
            let lookahead_start = window_end - self.config.lookahead_miles;

            trace!(position, window_end, candidates = window.len(), "refuel window");

            let Some(chosen) = select_stop(window, lookahead_start) else {
                return Err(PlanError::RangeGap {
                    window_start: position,
                    window_end,
                });
            };

            let leg_miles = chosen.projected_miles - position;
            let (units, cost) = ledger.charge(self.config, leg_miles, chosen.price());

            debug!(
                station = %chosen.station.id,
                at_miles = chosen.projected_miles,
                price = chosen.price(),
                leg_miles,
                "selected stop"
            );

            let station = chosen.station;
            stops.push(Stop {
                station_id: station.id,
                name: station.name.clone(),
                address: station.display_address(),
                coordinate: chosen.coordinate,
                distance_from_start: chosen.projected_miles,
                fuel_units: units,
                price: chosen.price(),
                cost,
            });

            position = chosen.projected_miles;
            cursor = start + window.partition_point(|c| c.projected_miles <= position);
        }

        let final_leg_miles = final_leg(total_miles, position, range)?;
        if final_leg_miles > 0.0
            && let Some(last) = stops.last()
        {
            ledger.charge(self.config, final_leg_miles, last.price);
        }

        Ok(StopPlan {
            stops,
            total_cost: ledger.total_cost,
            fuel_units: ledger.fuel_units,
            final_leg_miles,
        })
    }
}

/// Miles from the last stop to the destination, if one tank covers them.
fn final_leg(total_miles: f64, position: f64, range: f64) -> Result<f64, PlanError> {
    let remaining_miles = (total_miles - position).max(0.0);
    if remaining_miles > range {
        return Err(PlanError::UnreachableDestination {
            remaining_miles,
            range_miles: range,
        });
    }
    Ok(remaining_miles)
}

/// Pick a stop from a non-empty window.
///
/// Scans from the far end of the window and keeps the first station with a
/// strictly lower price inside the lookahead region, so equal prices favour
/// the farther station. With nothing in the lookahead region, takes the
/// cheapest station in the window (the nearest one on equal prices).
fn select_stop<'w, 'a>(
    window: &'w [MatchedStation<'a>],
    lookahead_start: f64,
) -> Option<&'w MatchedStation<'a>> {
    let mut best: Option<&MatchedStation<'a>> = None;
    for candidate in window.iter().rev() {
        if candidate.projected_miles < lookahead_start {
            break;
        }
        if best.is_none_or(|b| candidate.price() < b.price()) {
            best = Some(candidate);
        }
    }

    best.or_else(|| window.iter().min_by(|a, b| a.price().total_cmp(&b.price())))
}

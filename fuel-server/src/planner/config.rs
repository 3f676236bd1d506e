//! Vehicle and matching parameters for the stop planner.

/// Configuration parameters for stop planning.
///
/// These describe a single fixed vehicle model; they are not derived per
/// request.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum distance travelable on a full tank (miles).
    pub range_miles: f64,

    /// Miles travelled per unit of fuel.
    pub miles_per_unit: f64,

    /// Width of the lookahead region at the end of each window (miles).
    /// The cheapest station in this region is preferred over cheaper
    /// stations earlier in the window.
    pub lookahead_miles: f64,

    /// Maximum distance between a station and the route (miles).
    pub match_radius_miles: f64,

    /// Miles per degree used to turn the match radius into an angular
    /// threshold. Exact only for latitude degrees; longitude degrees shrink
    /// toward the poles, so the threshold is looser there.
    pub miles_per_degree: f64,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        range_miles: f64,
        miles_per_unit: f64,
        lookahead_miles: f64,
        match_radius_miles: f64,
        miles_per_degree: f64,
    ) -> Self {
        Self {
            range_miles,
            miles_per_unit,
            lookahead_miles,
            match_radius_miles,
            miles_per_degree,
        }
    }

    /// The match radius expressed in degrees.
    pub fn match_radius_degrees(&self) -> f64 {
        self.match_radius_miles / self.miles_per_degree
    }

    /// Fuel units needed to drive `miles`.
    pub fn fuel_for(&self, miles: f64) -> f64 {
        miles / self.miles_per_unit
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            range_miles: 500.0,
            miles_per_unit: 10.0,
            lookahead_miles: 100.0,
            match_radius_miles: 10.0,
            miles_per_degree: 69.0,
        }
    }
}

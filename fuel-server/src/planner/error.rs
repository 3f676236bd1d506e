//! Planning error types.

/// Errors surfaced by a planning request.
///
/// Every variant is user-visible; the web layer maps [`PlanError::kind`] to a
/// status code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// Malformed or missing input
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An endpoint address could not be resolved
    #[error("could not geocode address {address:?}: {message}")]
    GeocodeFailure { address: String, message: String },

    /// The routing engine was unreachable or found no route
    #[error("routing failed: {0}")]
    RoutingFailure(String),

    /// No candidate station inside a feasible refueling window
    #[error("no stations between {window_start:.2} and {window_end:.2} miles")]
    RangeGap { window_start: f64, window_end: f64 },

    /// The final leg is longer than one tank
    #[error(
        "cannot reach destination: {remaining_miles:.2} miles remain after the last stop, range is {range_miles:.2}"
    )]
    UnreachableDestination {
        remaining_miles: f64,
        range_miles: f64,
    },
}

impl PlanError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::InvalidRequest(_) => "invalid_request",
            PlanError::GeocodeFailure { .. } => "geocode_failure",
            PlanError::RoutingFailure(_) => "routing_failure",
            PlanError::RangeGap { .. } => "range_gap",
            PlanError::UnreachableDestination { .. } => "unreachable_destination",
        }
    }
}

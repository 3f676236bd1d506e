//! Address-to-plan request pipeline.

use futures::future::join;
use tracing::{info, warn};

use crate::domain::{Coordinate, Plan, Station};
use crate::geocode::Geocoder;
use crate::routing::RouteProvider;

use super::config::PlannerConfig;
use super::error::PlanError;
use super::plan::FuelPlanner;

/// Plans a trip between two free-text US addresses.
pub struct TripPlanner<'a, G: Geocoder, R: RouteProvider> {
    geocoder: &'a G,
    router: &'a R,
    config: &'a PlannerConfig,
}

impl<'a, G: Geocoder, R: RouteProvider> TripPlanner<'a, G, R> {
    pub fn new(geocoder: &'a G, router: &'a R, config: &'a PlannerConfig) -> Self {
        Self {
            geocoder,
            router,
            config,
        }
    }

    /// Geocode both addresses, fetch a route between them, and plan stops
    /// over `stations`.
    pub async fn plan(&self, start: &str, end: &str, stations: &[Station]) -> Result<Plan, PlanError> {
        let start = required("start", start)?;
        let end = required("end", end)?;

        let (from, to) = join(self.locate(start), self.locate(end)).await;
        let (from, to) = (from?, to?);
        info!(%from, %to, "geocoded trip endpoints");

        let route = self.router.route(from, to).await.map_err(|e| {
            warn!(error = %e, "routing failed");
            PlanError::RoutingFailure(e.to_string())
        })?;
        info!(
            points = route.coordinates.len(),
            router_miles = route.distance_miles,
            "received route"
        );

        FuelPlanner::new(self.config).plan(route.coordinates, stations)
    }

    async fn locate(&self, address: &str) -> Result<Coordinate, PlanError> {
        let query = format!("{address}, USA");
        self.geocoder.geocode(&query).await.map_err(|e| {
            warn!(address, error = %e, "geocoding failed");
            PlanError::GeocodeFailure {
                address: address.to_string(),
                message: e.to_string(),
            }
        })
    }
}

/// Trim an address, rejecting blanks.
fn required<'s>(field: &str, value: &'s str) -> Result<&'s str, PlanError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PlanError::InvalidRequest(format!(
            "{field} address is required"
        )));
    }
    Ok(value)
}

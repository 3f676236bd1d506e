//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedGeocoder;
use crate::geocode::NominatimClient;
use crate::planner::PlannerConfig;
use crate::routing::OsrmClient;
use crate::store::StationStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached geocoder for trip endpoints
    pub geocoder: Arc<CachedGeocoder<NominatimClient>>,

    /// Driving-route client
    pub router: Arc<OsrmClient>,

    /// Station catalog
    pub stations: StationStore,

    /// Planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        geocoder: CachedGeocoder<NominatimClient>,
        router: OsrmClient,
        stations: StationStore,
        config: PlannerConfig,
    ) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            router: Arc::new(router),
            stations,
            config: Arc::new(config),
        }
    }
}

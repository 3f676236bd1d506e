//! Process configuration from environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::geocode::{LocationIqConfig, NominatimConfig};
use crate::routing::OsrmConfig;

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    3000,
);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub stations_path: PathBuf,
    pub static_dir: String,
    pub nominatim_url: Option<String>,
    pub osrm_url: Option<String>,
    pub locationiq_key: Option<String>,
    pub user_agent: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            bind_addr: var("FUEL_BIND_ADDR")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_BIND_ADDR),
            stations_path: var("FUEL_STATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("stations.json")),
            static_dir: var("FUEL_STATIC_DIR").unwrap_or_else(|| "static".to_string()),
            nominatim_url: var("NOMINATIM_URL"),
            osrm_url: var("OSRM_URL"),
            locationiq_key: var("LOCATIONIQ_KEY"),
            user_agent: var("FUEL_USER_AGENT"),
        }
    }

    pub fn nominatim(&self) -> NominatimConfig {
        let mut config = NominatimConfig::new();
        if let Some(url) = &self.nominatim_url {
            config = config.with_base_url(url);
        }
        if let Some(agent) = &self.user_agent {
            config = config.with_user_agent(agent);
        }
        config
    }

    pub fn osrm(&self) -> OsrmConfig {
        match &self.osrm_url {
            Some(url) => OsrmConfig::new().with_base_url(url),
            None => OsrmConfig::new(),
        }
    }

    /// LocationIQ settings, if an API key is configured.
    pub fn locationiq(&self) -> Option<LocationIqConfig> {
        self.locationiq_key.as_deref().map(LocationIqConfig::new)
    }
}

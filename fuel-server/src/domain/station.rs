//! Fuel station types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Identifier of a station in the station store.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of the most recent attempt to geocode a station's address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeStatus {
    /// Never attempted.
    #[default]
    Pending,
    /// Coordinates were found.
    Success,
    /// The geocoder had no match for the address. Not retried.
    NotFound,
    /// The attempt failed for a transient reason and may be retried.
    TransientFailure,
}

/// Outcome of a single attempt to geocode a station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeOutcome {
    Found(Coordinate),
    NotFound,
    Transient,
}

/// A fuel station with a known retail price.
///
/// Only stations with `coordinate` set are planning candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,

    /// Upstream truckstop identifier from the price feed.
    pub truckstop_id: i64,

    pub name: String,
    pub address: String,
    pub city: String,

    /// Two-letter state code.
    pub state: String,

    /// Upstream rack identifier from the price feed.
    pub rack_id: i64,

    /// Retail price per unit of fuel.
    pub price: f64,

    #[serde(default)]
    pub coordinate: Option<Coordinate>,

    #[serde(default)]
    pub geocode_attempted_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub geocode_status: GeocodeStatus,
}

impl Station {
    /// Whether the station can be considered when planning a route.
    pub fn is_eligible(&self) -> bool {
        self.coordinate.is_some()
    }

    /// Full postal address as shown to users: `"address, city, state"`.
    pub fn display_address(&self) -> String {
        format!("{}, {}, {}", self.address, self.city, self.state)
    }

    /// Query string used when geocoding this station.
    pub fn geocode_query(&self) -> String {
        format!("{}, USA", self.display_address())
    }

    /// Record the result of a geocoding attempt made at `at`.
    ///
    /// Failures leave any existing coordinate untouched.
    pub fn record_geocode(&mut self, outcome: GeocodeOutcome, at: DateTime<Utc>) {
        self.geocode_attempted_at = Some(at);
        self.geocode_status = match outcome {
            GeocodeOutcome::Found(coordinate) => {
                self.coordinate = Some(coordinate);
                GeocodeStatus::Success
            }
            GeocodeOutcome::NotFound => GeocodeStatus::NotFound,
            GeocodeOutcome::Transient => GeocodeStatus::TransientFailure,
        };
    }
}

/// A station row before it has been assigned an id by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStation {
    pub truckstop_id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rack_id: i64,
    pub price: f64,
}

impl NewStation {
    /// Attach an id, producing a station that has not been geocoded yet.
    pub fn into_station(self, id: StationId) -> Station {
        Station {
            id,
            truckstop_id: self.truckstop_id,
            name: self.name,
            address: self.address,
            city: self.city,
            state: self.state,
            rack_id: self.rack_id,
            price: self.price,
            coordinate: None,
            geocode_attempted_at: None,
            geocode_status: GeocodeStatus::Pending,
        }
    }
}

//! Station catalog storage.
//!
//! Stations live in memory behind an `Arc` snapshot and are persisted to a
//! JSON file. Readers take a snapshot and keep a consistent view for the
//! whole planning request; writers copy, modify and swap.

mod error;
mod import;

pub use error::StoreError;
pub use import::{read_price_file, read_price_rows};

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::{GeocodeOutcome, GeocodeStatus, NewStation, Station, StationId};

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct StoredStations {
    stations: Vec<Station>,
}

/// Thread-safe station store.
#[derive(Clone)]
pub struct StationStore {
    inner: Arc<RwLock<Arc<Vec<Station>>>>,
    path: Option<PathBuf>,
}

impl StationStore {
    /// Open the store backed by `path`.
    ///
    /// A missing file yields an empty store; the file is created on `save`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let stations = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let stored: StoredStations =
                    serde_json::from_str(&contents).map_err(|e| StoreError::Json {
                        message: e.to_string(),
                    })?;
                stored.stations
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(Arc::new(stations))),
            path: Some(path),
        })
    }

    /// Create a store with no backing file (for tests and tooling).
    pub fn in_memory(stations: Vec<Station>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(stations))),
            path: None,
        }
    }

    /// A consistent view of every station.
    pub async fn snapshot(&self) -> Arc<Vec<Station>> {
        self.inner.read().await.clone()
    }

    /// Number of stations.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Stations with known coordinates.
    pub async fn eligible(&self) -> Vec<Station> {
        let snapshot = self.snapshot().await;
        snapshot.iter().filter(|s| s.is_eligible()).cloned().collect()
    }

    /// Stations still waiting for coordinates, at most `limit` of them.
    ///
    /// Permanent failures are skipped. Never-attempted stations come first,
    /// then the longest-ago attempts, then by id.
    pub async fn pending_geocode(&self, limit: usize) -> Vec<Station> {
        let snapshot = self.snapshot().await;
        let mut pending: Vec<&Station> = snapshot
            .iter()
            .filter(|s| !s.is_eligible() && s.geocode_status != GeocodeStatus::NotFound)
            .collect();

        // `None` sorts before `Some`, so never-attempted stations lead.
        pending.sort_by_key(|s| (s.geocode_attempted_at, s.id));
        pending.into_iter().take(limit).cloned().collect()
    }

    /// Record a geocoding attempt for one station.
    pub async fn record_geocode(
        &self,
        id: StationId,
        outcome: GeocodeOutcome,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        let stations = Arc::make_mut(&mut *guard);
        let station = stations
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::UnknownStation(id))?;
        station.record_geocode(outcome, at);
        Ok(())
    }

    /// Add stations, assigning ids after the current maximum.
    pub async fn insert_many(&self, new: Vec<NewStation>) -> Vec<StationId> {
        let mut guard = self.inner.write().await;
        let stations = Arc::make_mut(&mut *guard);
        let mut next_id = stations.iter().map(|s| s.id.0).max().unwrap_or(0) + 1;

        let mut ids = Vec::with_capacity(new.len());
        for row in new {
            let id = StationId(next_id);
            next_id += 1;
            stations.push(row.into_station(id));
            ids.push(id);
        }
        ids
    }

    /// Write the current stations to the backing file.
    ///
    /// Creates parent directories if they don't exist. No-op for in-memory
    /// stores.
    pub async fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_error = |e: std::io::Error| StoreError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let snapshot = self.snapshot().await;
        let stored = StoredStations {
            stations: snapshot.as_ref().clone(),
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(&stored).map_err(|e| StoreError::Json {
            message: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(io_error)?;

        Ok(())
    }
}

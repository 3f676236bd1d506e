//! Offline batch geocoding of stations.
//!
//! Runs serially against a rate-limited service: one station at a time, a
//! fixed delay between stations, and a daily request budget. Per-station
//! failures are recorded and never abort the batch; only bad credentials do.

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::GeocodeOutcome;
use crate::store::{StationStore, StoreError};

use super::Geocoder;
use super::error::GeocodeError;
use super::retry::RetryPolicy;

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum geocoding requests per run (including retries).
    pub max_daily_requests: usize,

    /// Pause between stations.
    pub request_delay: Duration,

    /// Retry policy for rate-limit responses.
    pub retry: RetryPolicy,

    /// Keep going after the request budget is spent.
    pub force: bool,
}

impl BatchConfig {
    /// Set the `force` flag.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            // Under the 5000/day plan limit, at 2 requests/second.
            max_daily_requests: 4800,
            request_delay: Duration::from_millis(500),
            retry: RetryPolicy::default(),
            force: false,
        }
    }
}

/// Counters for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchProgress {
    /// Stations attempted.
    pub processed: usize,
    /// Stations that received coordinates.
    pub geocoded: usize,
    /// Stations with no match.
    pub not_found: usize,
    /// Stations that failed transiently.
    pub transient_failures: usize,
    /// Requests sent, including retries.
    pub requests: usize,
    /// The run stopped because the request budget was spent.
    pub budget_exhausted: bool,
}

impl BatchProgress {
    /// Requests left in the budget.
    pub fn remaining_budget(&self, config: &BatchConfig) -> usize {
        config.max_daily_requests.saturating_sub(self.requests)
    }
}

/// Why a batch run stopped early.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The geocoding service rejected the credentials
    #[error("geocoding service rejected credentials: {0}")]
    Geocode(GeocodeError),

    /// Recording a result failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Geocode pending stations in `store`.
///
/// Results are recorded in the store as they arrive; the caller decides
/// when to save.
pub async fn run_batch<G: Geocoder>(
    geocoder: &G,
    store: &StationStore,
    config: &BatchConfig,
) -> Result<BatchProgress, BatchError> {
    let limit = if config.force {
        usize::MAX
    } else {
        config.max_daily_requests
    };
    let pending = store.pending_geocode(limit).await;
    let total = pending.len();
    info!(total, "processing stations");

    let mut progress = BatchProgress::default();

    for (idx, station) in pending.iter().enumerate() {
        if progress.requests >= config.max_daily_requests && !config.force {
            warn!(requests = progress.requests, "daily request limit reached");
            progress.budget_exhausted = true;
            break;
        }

        let query = station.geocode_query();
        info!(
            n = idx + 1,
            total,
            station = %station.id,
            name = %station.name,
            address = %query,
            "geocoding station"
        );

        let request_cap = if config.force {
            u32::MAX
        } else {
            u32::try_from(progress.remaining_budget(config)).unwrap_or(u32::MAX)
        };
        let (result, attempts) = config.retry.geocode(geocoder, &query, request_cap).await;
        progress.requests += attempts as usize;
        progress.processed += 1;

        let outcome = match result {
            Ok(coordinate) => {
                info!(station = %station.id, %coordinate, "geocoded");
                progress.geocoded += 1;
                GeocodeOutcome::Found(coordinate)
            }
            Err(GeocodeError::Unauthorized) => {
                return Err(BatchError::Geocode(GeocodeError::Unauthorized));
            }
            Err(e) if e.is_transient() => {
                warn!(station = %station.id, error = %e, "geocoding failed, will retry later");
                progress.transient_failures += 1;
                GeocodeOutcome::Transient
            }
            Err(e) => {
                warn!(station = %station.id, error = %e, "geocoding failed");
                progress.not_found += 1;
                GeocodeOutcome::NotFound
            }
        };

        store.record_geocode(station.id, outcome, Utc::now()).await?;

        tokio::time::sleep(config.request_delay).await;
    }

    info!(
        processed = progress.processed,
        geocoded = progress.geocoded,
        remaining_budget = progress.remaining_budget(config),
        "finished batch"
    );

    Ok(progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, GeocodeStatus, NewStation, StationId};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers by street address; unknown addresses are not found.
    struct MockGeocoder {
        answers: HashMap<String, Vec<&'static str>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockGeocoder {
        fn new() -> Self {
            Self {
                answers: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Script responses for an address: "ok", "rate", "net", "auth".
        fn answer(mut self, address: &str, script: Vec<&'static str>) -> Self {
            self.answers.insert(address.to_string(), script);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Geocoder for MockGeocoder {
        async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
            let street = query.split(',').next().unwrap_or_default().to_string();
            let call_no = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(street.clone());
                calls.iter().filter(|c| **c == street).count()
            };

            let Some(script) = self.answers.get(&street) else {
                return Err(GeocodeError::NotFound);
            };
            let step = script
                .get(call_no - 1)
                .or(script.last())
                .copied()
                .unwrap_or("ok");
            match step {
                "ok" => Ok(Coordinate::new(36.0, -95.0).unwrap()),
                "rate" => Err(GeocodeError::RateLimited),
                "net" => Err(GeocodeError::Api {
                    status: 503,
                    message: "unavailable".into(),
                }),
                _ => Err(GeocodeError::Unauthorized),
            }
        }
    }

    fn row(street: &str) -> NewStation {
        NewStation {
            truckstop_id: 1,
            name: format!("Stop at {street}"),
            address: street.to_string(),
            city: "Tulsa".to_string(),
            state: "OK".to_string(),
            rack_id: 1,
            price: 3.0,
        }
    }

    fn fast_config() -> BatchConfig {
        BatchConfig {
            max_daily_requests: 100,
            request_delay: Duration::ZERO,
            retry: RetryPolicy::new(2, Duration::ZERO),
            force: false,
        }
    }

    async fn store_with(streets: &[&str]) -> StationStore {
        let store = StationStore::in_memory(Vec::new());
        store
            .insert_many(streets.iter().map(|s| row(s)).collect())
            .await;
        store
    }

    #[test]
    fn default_config() {
        let config = BatchConfig::default();
        assert_eq!(config.max_daily_requests, 4800);
        assert_eq!(config.request_delay, Duration::from_millis(500));
        assert_eq!(config.retry, RetryPolicy::default());
        assert!(!config.force);
        assert!(config.with_force(true).force);
    }

    #[tokio::test]
    async fn records_each_outcome() {
        let store = store_with(&["1 Found", "2 Missing", "3 Flaky"]).await;
        let geocoder = MockGeocoder::new()
            .answer("1 Found", vec!["ok"])
            .answer("3 Flaky", vec!["net"]);

        let progress = run_batch(&geocoder, &store, &fast_config()).await.unwrap();

        assert_eq!(progress.processed, 3);
        assert_eq!(progress.geocoded, 1);
        assert_eq!(progress.not_found, 1);
        assert_eq!(progress.transient_failures, 1);
        assert_eq!(progress.requests, 3);
        assert!(!progress.budget_exhausted);

        let stations = store.snapshot().await;
        assert_eq!(stations[0].geocode_status, GeocodeStatus::Success);
        assert!(stations[0].coordinate.is_some());
        assert_eq!(stations[1].geocode_status, GeocodeStatus::NotFound);
        assert_eq!(stations[2].geocode_status, GeocodeStatus::TransientFailure);
        assert!(stations.iter().all(|s| s.geocode_attempted_at.is_some()));

        // Only the transient failure is still pending.
        let pending = store.pending_geocode(10).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, StationId(3));
    }

    #[tokio::test]
    async fn rate_limit_retried_once() {
        let store = store_with(&["1 Busy", "2 Swamped"]).await;
        let geocoder = MockGeocoder::new()
            .answer("1 Busy", vec!["rate", "ok"])
            .answer("2 Swamped", vec!["rate", "rate", "ok"]);

        let progress = run_batch(&geocoder, &store, &fast_config()).await.unwrap();

        assert_eq!(progress.geocoded, 1);
        assert_eq!(progress.transient_failures, 1);
        assert_eq!(progress.requests, 4);
        assert_eq!(
            geocoder.calls(),
            vec!["1 Busy", "1 Busy", "2 Swamped", "2 Swamped"]
        );
    }

    #[tokio::test]
    async fn stops_when_budget_spent() {
        let store = store_with(&["1 A", "2 B", "3 C"]).await;
        let geocoder = MockGeocoder::new()
            .answer("1 A", vec!["rate", "ok"])
            .answer("2 B", vec!["ok"])
            .answer("3 C", vec!["ok"]);
        let config = BatchConfig {
            max_daily_requests: 3,
            ..fast_config()
        };

        let progress = run_batch(&geocoder, &store, &config).await.unwrap();

        assert_eq!(progress.processed, 2);
        assert_eq!(progress.requests, 3);
        assert!(progress.budget_exhausted);
        assert_eq!(progress.remaining_budget(&config), 0);
    }

    #[tokio::test]
    async fn retries_never_exceed_budget() {
        let store = store_with(&["1 A", "2 B", "3 C"]).await;
        let geocoder = MockGeocoder::new()
            .answer("1 A", vec!["ok"])
            .answer("2 B", vec!["ok"])
            .answer("3 C", vec!["rate", "ok"]);
        let config = BatchConfig {
            max_daily_requests: 3,
            ..fast_config()
        };

        let progress = run_batch(&geocoder, &store, &config).await.unwrap();

        assert_eq!(progress.processed, 3);
        assert_eq!(progress.requests, 3);
        assert_eq!(progress.geocoded, 2);
        assert_eq!(progress.transient_failures, 1);
        assert_eq!(geocoder.calls(), vec!["1 A", "2 B", "3 C"]);

        // The rate-limited station stays pending for the next run.
        let pending = store.pending_geocode(10).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, StationId(3));
    }

    #[tokio::test]
    async fn force_ignores_budget() {
        let store = store_with(&["1 A", "2 B", "3 C"]).await;
        let geocoder = MockGeocoder::new()
            .answer("1 A", vec!["ok"])
            .answer("2 B", vec!["ok"])
            .answer("3 C", vec!["ok"]);
        let config = BatchConfig {
            max_daily_requests: 1,
            ..fast_config()
        }
        .with_force(true);

        let progress = run_batch(&geocoder, &store, &config).await.unwrap();

        assert_eq!(progress.processed, 3);
        assert!(!progress.budget_exhausted);
    }

    #[tokio::test]
    async fn bad_credentials_abort() {
        let store = store_with(&["1 A", "2 B"]).await;
        let geocoder = MockGeocoder::new().answer("1 A", vec!["auth"]);

        let err = run_batch(&geocoder, &store, &fast_config())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BatchError::Geocode(GeocodeError::Unauthorized)
        ));
        assert_eq!(geocoder.calls(), vec!["1 A"]);
    }

    #[tokio::test]
    async fn permanent_failures_skipped_on_next_run() {
        let store = store_with(&["1 Missing"]).await;
        let geocoder = MockGeocoder::new();

        run_batch(&geocoder, &store, &fast_config()).await.unwrap();
        let second = run_batch(&geocoder, &store, &fast_config()).await.unwrap();

        assert_eq!(second.processed, 0);
        assert_eq!(geocoder.calls().len(), 1);
    }
}

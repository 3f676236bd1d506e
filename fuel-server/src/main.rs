use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fuel_server::cache::{CacheConfig, CachedGeocoder};
use fuel_server::config::AppConfig;
use fuel_server::geocode::{BatchConfig, LocationIqClient, NominatimClient, run_batch};
use fuel_server::planner::PlannerConfig;
use fuel_server::routing::OsrmClient;
use fuel_server::store::{StationStore, read_price_file};
use fuel_server::web::{AppState, create_router};

#[derive(Parser)]
#[command(name = "fuel-server", version, about = "Plan fuel stops along US driving routes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,

    /// Add stations from an OPIS price feed CSV
    Import {
        /// Path to the CSV file
        path: PathBuf,
    },

    /// Geocode stations that have no coordinates yet
    Geocode {
        /// Keep going past the daily request budget
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fuel_server=info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Command::Serve => serve(config).await,
        Command::Import { path } => import(config, path).await,
        Command::Geocode { force } => geocode(config, force).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let stations = StationStore::open(&config.stations_path)?;
    let snapshot = stations.snapshot().await;
    let eligible = snapshot.iter().filter(|s| s.is_eligible()).count();
    info!(
        stations = snapshot.len(),
        eligible,
        path = %config.stations_path.display(),
        "loaded station catalog"
    );
    if eligible == 0 {
        warn!("no geocoded stations; every long route will fail to plan");
    }

    let geocoder = NominatimClient::new(config.nominatim()).context("creating geocoder")?;
    let router = OsrmClient::new(config.osrm()).context("creating routing client")?;
    let state = AppState::new(
        CachedGeocoder::new(geocoder, &CacheConfig::default()),
        router,
        stations,
        PlannerConfig::default(),
    );

    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("Fuel route planner listening on http://{}", config.bind_addr);
    info!("  GET  /health          - Health check");
    info!("  GET  /                - Map page");
    info!("  POST /api/plan_route  - Plan fuel stops");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn import(config: AppConfig, path: PathBuf) -> Result<()> {
    let rows = read_price_file(&path)?;
    let stations = StationStore::open(&config.stations_path)?;

    let ids = stations.insert_many(rows).await;
    stations.save().await?;

    info!(
        imported = ids.len(),
        total = stations.len().await,
        from = %path.display(),
        "imported stations"
    );
    Ok(())
}

async fn geocode(config: AppConfig, force: bool) -> Result<()> {
    let locationiq = config
        .locationiq()
        .context("LOCATIONIQ_KEY must be set to geocode stations")?;
    let geocoder = LocationIqClient::new(locationiq).context("creating geocoder")?;
    let stations = StationStore::open(&config.stations_path)?;
    let batch = BatchConfig::default().with_force(force);

    let result = run_batch(&geocoder, &stations, &batch).await;

    // Keep whatever was recorded, even if the run stopped early.
    stations.save().await?;
    let progress = result?;

    info!(
        processed = progress.processed,
        geocoded = progress.geocoded,
        not_found = progress.not_found,
        transient_failures = progress.transient_failures,
        requests = progress.requests,
        "geocoding complete"
    );
    if progress.budget_exhausted {
        warn!("request budget spent; run again tomorrow or pass --force");
    }
    Ok(())
}

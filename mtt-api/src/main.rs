//! mtt-api - Music Turing test backend
//!
//! Serves the interactive listening test (random tracks, rating
//! submission) and the precomputed genre-comparison statistics
//! consumed by the analysis frontend.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use mtt_api::{build_router, AppState};
use mtt_common::config::{self, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "mtt-api", version, about = "Music Turing test backend service")]
struct Cli {
    /// Root folder holding the database (overrides env and config file)
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Listen port (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Include error details in API responses
    #[arg(long)]
    debug: bool,

    /// Fix the random sampler seed (deterministic track order)
    #[arg(long)]
    sampler_seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting MTT backend (mtt-api) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let cli = Cli::parse();

    let root_folder = config::resolve_root_folder(cli.root_folder.as_deref());
    let db_path = config::prepare_root_folder(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let mut service_config = ServiceConfig::load();
    if let Some(port) = cli.port {
        service_config.port = port;
    }
    if cli.debug {
        service_config.debug = true;
    }
    if let Some(seed) = cli.sampler_seed {
        service_config.sampler_seed = Some(seed);
    }

    let pool = match mtt_common::db::init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    if service_config.debug {
        info!("Debug mode enabled: API error responses include details");
    }

    let port = service_config.port;
    let state = AppState::new(pool, service_config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("mtt-api listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}

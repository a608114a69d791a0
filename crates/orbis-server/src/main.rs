//! orbis server binary.
//!
//! Loads configuration (defaults, `orbis.toml` or `--config`, `.env`, then
//! the environment), opens the SQLite store and serves the JSON API over
//! HTTP.
//!
//! ```
//! PORT=8080 cargo run -p orbis-server --bin orbis
//! ```

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use orbis_api::AppState;
use orbis_core::gdp::{GdpMultiplier, SeededMultiplier, ThreadRngMultiplier};
use orbis_store_sqlite::SqliteStore;
use orbis_upstream::HttpSource;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Orbis country ledger server")]
struct Cli {
  /// Path to the TOML configuration file. Missing is fine.
  #[arg(short, long, default_value = "orbis.toml")]
  config: PathBuf,

  /// Seed the GDP multiplier so estimates repeat across runs.
  #[arg(long, env = "GDP_SEED")]
  gdp_seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Fold `.env` into the environment first so it can set `RUST_LOG` too.
  let dotenv = dotenvy::dotenv();

  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  if let Err(e) = dotenv {
    tracing::info!("no .env file loaded: {e}");
  }

  let cli = Cli::parse();

  // Load configuration.
  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  // Open SQLite store.
  let store_path = server_cfg.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = %store_path.display(), "store opened");

  let cache_dir = server_cfg.cache_dir();
  tokio::fs::create_dir_all(&cache_dir)
    .await
    .with_context(|| format!("failed to create cache directory {cache_dir:?}"))?;

  let source = HttpSource::new(server_cfg.source_config())
    .context("failed to build HTTP client")?;

  let multiplier: Arc<dyn GdpMultiplier> = match cli.gdp_seed {
    Some(seed) => Arc::new(SeededMultiplier::new(seed)),
    None => Arc::new(ThreadRngMultiplier),
  };

  // Build application state.
  let state = AppState {
    store: Arc::new(store),
    source: Arc::new(source),
    multiplier,
    image_path: Arc::new(server_cfg.image_path()),
  };

  let app = orbis_api::router(state)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("shut down");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("failed to listen for ctrl-c: {e}");
    std::future::pending::<()>().await;
  }
}

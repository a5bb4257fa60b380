//! tracker-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), recreates the
//! SQLite store from scratch, imports the placemark file once, and serves
//! the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracker_server::{ServerConfig, bootstrap, cors_layer};
use tracker_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Team tracker API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  // Fresh state on every start.
  bootstrap::reset_database(&server_cfg.store_path).with_context(|| {
    format!("failed to remove previous store at {:?}", server_cfg.store_path)
  })?;
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  bootstrap::import_placemarks(&store, &server_cfg.kml_path).await?;

  let cors = cors_layer(&server_cfg.allowed_origin)
    .with_context(|| format!("invalid allowed_origin {:?}", server_cfg.allowed_origin))?;
  let app = tracker_server::router(Arc::new(store), cors);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

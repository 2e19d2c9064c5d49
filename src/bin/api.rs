//! GearGuard API Server
//!
//! Run with: cargo run --bin gearguard-api -- --seed
//!
//! # Configuration
//!
//! Settings come from `--config`, else `~/.config/gearguard/config.toml` or
//! `./gearguard.toml`. Environment variables override the file:
//! - `GEARGUARD_HOST`: Host to bind to (default: 127.0.0.1)
//! - `GEARGUARD_PORT`: Port to listen on (default: 8000)
//! - `GEARGUARD_LOG_LEVEL`: Log level (default: info)
//! - `GEARGUARD_LOG_FORMAT`: `pretty` or `json`
//! - `RUST_LOG`: Full filter, takes precedence over the level

use clap::Parser;
use gearguard::api::{seed_demo_data, serve, AppState, Database};
use gearguard::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gearguard-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "GearGuard maintenance REST API")]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Load demo teams, equipment and a request on startup
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    config.logging.init();

    tracing::info!("Starting GearGuard API server v{}", env!("CARGO_PKG_VERSION"));

    let mut server_config = config.server.to_server_config();
    if let Some(host) = args.host {
        server_config.host = host;
    }
    if let Some(port) = args.port {
        server_config.port = port;
    }

    let mut db = Database::default();
    if args.seed {
        seed_demo_data(&mut db)?;
    }

    let state = AppState::with_database(db, server_config.clone());
    serve(state, &server_config).await?;

    tracing::info!("GearGuard API server stopped");
    Ok(())
}

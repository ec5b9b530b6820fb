//! EONIC Vault API Server
//!
//! Run with: cargo run --bin eonic-vault -- [--config path/to/config.toml]
//!
//! # Configuration
//!
//! Settings come from a TOML file (see `eonic-cli config`) with environment
//! overrides:
//! - `LIVEKIT_API_KEY` / `LIVEKIT_API_SECRET`: signing secrets (required to issue tokens)
//! - `LIVEKIT_URL`: public LiveKit URL returned by `/api/connection`
//! - `EONIC_API_HOST` / `EONIC_API_PORT`: bind address (default: 0.0.0.0:8090)
//! - `EONIC_TOKEN_TTL_SECS`: token lifetime (default: 21600)
//! - `EONIC_LOG_LEVEL` / `EONIC_LOG_FORMAT`: logging (default: info / pretty)
//! - `RUST_LOG`: overrides the log filter entirely

use clap::Parser;
use eonic_vault::api::{serve, AppState};
use eonic_vault::config::Config;
use eonic_vault::credentials::CredentialIssuer;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eonic-vault")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Issues LiveKit access tokens for the EONIC Vault dashboard")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = tracing::subscriber::with_default(
        eonic_vault::logging::bootstrap_subscriber(),
        || Config::load_default(args.config.as_deref()),
    )?;
    eonic_vault::logging::init(&config.logging);

    tracing::info!("Starting EONIC Vault API server v{}", env!("CARGO_PKG_VERSION"));

    let issuer = CredentialIssuer::new(config.issuer_config());
    if issuer.is_configured() {
        tracing::info!(ttl_secs = issuer.ttl().as_secs(), "Credential issuer ready");
    } else {
        tracing::warn!("LiveKit API key/secret not set; /api/credential will return 500");
    }

    let api_config = config.server_config();
    match &api_config.livekit_url {
        Some(url) => tracing::info!("LiveKit URL: {}", url),
        None => tracing::info!("LiveKit URL not set (set LIVEKIT_URL to enable /api/connection)"),
    }

    let state = AppState::new(issuer, api_config.clone());

    tracing::info!("Starting server on {}:{}", api_config.host, api_config.port);
    serve(state, &api_config).await?;

    tracing::info!("EONIC Vault API server stopped");
    Ok(())
}

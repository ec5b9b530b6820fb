//! EONIC Vault CLI
//!
//! Command-line interface for credential operations:
//! - Mint tokens locally from configured secrets
//! - Fetch tokens from a running server
//! - Inspect and verify tokens
//! - Generate a default config file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use eonic_vault::config::{generate_default_config, Config};
use eonic_vault::credentials::CredentialIssuer;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "eonic-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mint and inspect LiveKit access tokens for EONIC Vault")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Issue a token locally using the configured API key and secret
    Mint {
        /// Participant identity
        #[arg(short, long)]
        identity: String,
        /// Room to join
        #[arg(short, long)]
        room: String,
        /// Token lifetime in seconds (default: from config)
        #[arg(long)]
        ttl_secs: Option<u64>,
    },

    /// Request a token from a running server
    Fetch {
        /// Participant identity
        #[arg(short, long)]
        identity: String,
        /// Room to join
        #[arg(short, long)]
        room: String,
        /// API server URL
        #[arg(long, default_value = "http://localhost:8090")]
        api_url: String,
    },

    /// Verify a token against the configured secrets and print its claims
    Inspect {
        /// Token to inspect
        token: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mint {
            identity,
            room,
            ttl_secs,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let mut issuer_config = config.issuer_config();
            if let Some(ttl) = ttl_secs {
                if ttl == 0 {
                    bail!("--ttl-secs must be greater than zero");
                }
                issuer_config = issuer_config.ttl(Duration::from_secs(ttl));
            }

            let issuer = CredentialIssuer::new(issuer_config);
            let credential = issuer
                .issue(&identity, &room)
                .context("Failed to mint token")?;
            let claims = issuer.verify(credential.as_str())?;

            println!("{}", credential);
            println!();
            println!("Identity: {}", claims.sub);
            println!("Grant:    {}", claims.video);
            println!("Expires:  {}", format_timestamp(claims.exp));
        }

        Commands::Fetch {
            identity,
            room,
            api_url,
        } => {
            let client = reqwest::Client::new();
            let response = client
                .get(format!("{}/api/credential", api_url.trim_end_matches('/')))
                .query(&[("identity", &identity), ("room", &room)])
                .send()
                .await
                .with_context(|| format!("Failed to reach {}", api_url))?;

            let status = response.status();
            let body: serde_json::Value = response.json().await?;

            if !status.is_success() {
                let message = body["error"].as_str().unwrap_or("unknown error");
                bail!("Request failed ({}): {}", status, message);
            }

            match body["token"].as_str() {
                Some(token) => println!("{}", token),
                None => bail!("Response did not contain a token"),
            }
        }

        Commands::Inspect { token } => {
            let config = load_config(cli.config.as_deref())?;
            let issuer = CredentialIssuer::new(config.issuer_config());
            let claims = issuer
                .verify(token.trim())
                .context("Token verification failed")?;

            println!("{}", serde_json::to_string_pretty(&claims)?);
            println!();
            println!("Not before: {}", format_timestamp(claims.nbf));
            println!("Expires:    {}", format_timestamp(claims.exp));
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    Config::load_default(path).context("Failed to load configuration")
}

fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

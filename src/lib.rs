//! # EONIC Vault
//!
//! Credential service for the EONIC Vault dashboard: issues scoped,
//! time-bounded LiveKit access tokens so a named identity can join a named
//! real-time room with publish and subscribe rights.
//!
//! ## Modules
//!
//! - [`credentials`]: Token issuer, grants and signing
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eonic_vault::credentials::{CredentialIssuer, IssuerConfig};
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let issuer = CredentialIssuer::new(
//!         IssuerConfig::new("APIkey", "secret").ttl(Duration::from_secs(3600)),
//!     );
//!
//!     let credential = issuer.issue("alice", "lobby")?;
//!     println!("{}", credential);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod credentials;
pub mod logging;

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use credentials::{
    AccessClaims, Credential, CredentialIssuer, GrantSigner, HmacJwtSigner, IssueError,
    IssuerConfig, SecretMaterials, SigningError, VideoGrant,
};

pub use config::{Config, ConfigError, LiveKitConfig, LoggingConfig, ServerSection, TokenConfig};

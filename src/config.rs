//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ApiConfig;
use crate::credentials::IssuerConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ServerSection,

    #[serde(default)]
    pub livekit: LiveKitConfig,

    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[api]` section: bind address and HTTP middleware settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// LiveKit credentials and endpoint
#[derive(Clone, Default, Deserialize)]
pub struct LiveKitConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub api_secret: Option<String>,

    /// Public WebSocket URL clients connect to with an issued token
    #[serde(default)]
    pub url: Option<String>,
}

impl std::fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field("url", &self.url)
            .finish()
    }
}

/// Token issuance settings
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    6 * 60 * 60
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, env_lookup)
    }

    fn load_with<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::parse_file(path)?;
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Default config file locations, in search order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("eonic").join("config.toml")),
            Some(PathBuf::from("/etc/eonic/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from an explicit path, the default locations, or environment only.
    ///
    /// The first existing file wins. A file that exists but fails to read,
    /// parse or validate is an error, never skipped.
    pub fn load_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(explicit, &Self::default_paths(), env_lookup)
    }

    /// [`Config::load_default`] with injectable search paths and variables
    pub fn load_from<F>(
        explicit: Option<&Path>,
        candidates: &[PathBuf],
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = explicit {
            tracing::info!("Loading config from {:?}", path);
            return Self::load_with(path, lookup);
        }

        if let Some(path) = candidates.iter().find(|p| p.exists()) {
            let config = Self::load_with(path, lookup)?;
            tracing::info!("Loaded config from {:?}", path);
            return Ok(config);
        }

        tracing::info!("No config file found, using defaults with environment overrides");
        Self::from_lookup(lookup)
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(env_lookup);
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // LiveKit overrides
        if let Some(key) = lookup("LIVEKIT_API_KEY") {
            self.livekit.api_key = Some(key);
        }
        if let Some(secret) = lookup("LIVEKIT_API_SECRET") {
            self.livekit.api_secret = Some(secret);
        }
        if let Some(url) = lookup("LIVEKIT_URL") {
            self.livekit.url = Some(url);
        }

        // API overrides
        if let Some(host) = lookup("EONIC_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("EONIC_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid EONIC_API_PORT: {}", port),
            }
        }

        // Token overrides
        if let Some(ttl) = lookup("EONIC_TOKEN_TTL_SECS") {
            match ttl.parse() {
                Ok(t) => self.token.ttl_secs = t,
                Err(_) => tracing::warn!("Ignoring invalid EONIC_TOKEN_TTL_SECS: {}", ttl),
            }
        }

        // Logging overrides
        if let Some(level) = lookup("EONIC_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("EONIC_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Reject values that would make the service unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "token.ttl_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid {
                field: "logging.format",
                reason: format!("expected \"pretty\" or \"json\", got {:?}", self.logging.format),
            });
        }
        Ok(())
    }

    /// Parameters for the credential issuer
    pub fn issuer_config(&self) -> IssuerConfig {
        IssuerConfig {
            api_key: self.livekit.api_key.clone(),
            api_secret: self.livekit.api_secret.clone(),
            ttl: Duration::from_secs(self.token.ttl_secs),
        }
    }

    /// Runtime settings for the HTTP server
    pub fn server_config(&self) -> ApiConfig {
        ApiConfig {
            host: self.api.host.clone(),
            port: self.api.port,
            request_timeout_ms: self.api.request_timeout_secs.saturating_mul(1000),
            cors_origins: self.api.cors_origins.clone(),
            livekit_url: self.livekit.url.clone().filter(|u| !u.is_empty()),
        }
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# EONIC Vault Configuration
#
# Environment variables override these settings:
# - LIVEKIT_API_KEY
# - LIVEKIT_API_SECRET
# - LIVEKIT_URL
# - EONIC_API_HOST
# - EONIC_API_PORT
# - EONIC_TOKEN_TTL_SECS
# - EONIC_LOG_LEVEL
# - EONIC_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (empty = allow any origin)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

[livekit]
# API key and secret from the LiveKit project settings.
# Prefer LIVEKIT_API_KEY / LIVEKIT_API_SECRET over writing them here.
# api_key = ""
# api_secret = ""

# Public WebSocket URL clients connect to
# url = "wss://your-project.livekit.cloud"

[token]
# Lifetime of issued access tokens (seconds)
ttl_secs = 21600

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

//! Credential issuer
//!
//! Turns an (identity, room) pair into a signed access token with full
//! join/publish/subscribe rights on that room.

use std::fmt;
use std::time::Duration;

use crate::credentials::error::{IssueError, IssueResult};
use crate::credentials::grant::{AccessClaims, VideoGrant};
use crate::credentials::signer::{BoxedSigner, GrantSigner, HmacJwtSigner};

/// Default token lifetime: 6 hours
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// API key and secret used to sign tokens
#[derive(Clone)]
pub struct SecretMaterials {
    api_key: String,
    api_secret: String,
}

impl SecretMaterials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for SecretMaterials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretMaterials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Issuer construction parameters
#[derive(Clone)]
pub struct IssuerConfig {
    /// LiveKit API key (empty counts as missing)
    pub api_key: Option<String>,
    /// LiveKit API secret (empty counts as missing)
    pub api_secret: Option<String>,
    /// Lifetime of issued tokens
    pub ttl: Duration,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            ttl: DEFAULT_TOKEN_TTL,
        }
    }
}

impl IssuerConfig {
    /// Config with both secrets set and the default TTL
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
            ..Default::default()
        }
    }

    /// Override the token lifetime
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl fmt::Debug for IssuerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// A signed access token
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential([REDACTED; {} bytes])", self.0.len())
    }
}

/// Issues access tokens for real-time rooms.
///
/// Stateless apart from the read-only secrets, so a single instance can be
/// shared across request handlers behind an `Arc`.
pub struct CredentialIssuer<S = HmacJwtSigner> {
    secrets: Result<SecretMaterials, &'static str>,
    ttl: Duration,
    signer: S,
}

impl CredentialIssuer<HmacJwtSigner> {
    /// Create an issuer that signs HS256 JWTs
    pub fn new(config: IssuerConfig) -> Self {
        Self::with_signer(config, HmacJwtSigner)
    }
}

impl<S: GrantSigner> CredentialIssuer<S> {
    /// Create an issuer with a custom signer
    pub fn with_signer(config: IssuerConfig, signer: S) -> Self {
        let api_key = config.api_key.filter(|k| !k.is_empty());
        let api_secret = config.api_secret.filter(|s| !s.is_empty());

        let secrets = match (api_key, api_secret) {
            (Some(key), Some(secret)) => Ok(SecretMaterials::new(key, secret)),
            (None, Some(_)) => Err("LiveKit API key"),
            (Some(_), None) => Err("LiveKit API secret"),
            (None, None) => Err("LiveKit API key and secret"),
        };

        Self {
            secrets,
            ttl: config.ttl,
            signer,
        }
    }

    /// Both API key and secret are present
    pub fn is_configured(&self) -> bool {
        self.secrets.is_ok()
    }

    /// Lifetime of issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn secrets(&self) -> IssueResult<&SecretMaterials> {
        self.secrets.as_ref().map_err(|what| IssueError::missing(what))
    }

    /// Issue a token granting `identity` full access to `room`.
    ///
    /// Fails with [`IssueError::Configuration`] before touching the signer
    /// when either secret is missing.
    pub fn issue(&self, identity: &str, room: &str) -> IssueResult<Credential> {
        let secrets = self.secrets()?;

        let nbf = chrono::Utc::now().timestamp();
        let exp = nbf.saturating_add(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX));

        let claims = AccessClaims {
            iss: secrets.api_key().to_string(),
            sub: identity.to_string(),
            jti: identity.to_string(),
            nbf,
            exp,
            video: VideoGrant::full_access(room),
        };

        let token = self.signer.sign(secrets, &claims)?;

        tracing::debug!(
            identity = %identity,
            room = %room,
            expires_at = exp,
            "Issued access token"
        );

        Ok(Credential(token))
    }

    /// Verify a token issued with these secrets and return its claims
    pub fn verify(&self, token: &str) -> IssueResult<AccessClaims> {
        let secrets = self.secrets()?;
        Ok(self.signer.verify(secrets, token)?)
    }

    /// Erase the signer type
    pub fn boxed(self) -> CredentialIssuer<BoxedSigner>
    where
        S: 'static,
    {
        CredentialIssuer {
            secrets: self.secrets,
            ttl: self.ttl,
            signer: Box::new(self.signer),
        }
    }
}

impl<S> fmt::Debug for CredentialIssuer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialIssuer")
            .field("configured", &self.secrets.is_ok())
            .field("ttl", &self.ttl)
            .finish()
    }
}

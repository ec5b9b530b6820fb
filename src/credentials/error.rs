//! Credential error types
//!
//! Failures the issuer can report. The HTTP layer maps every variant to a
//! generic 500 so none of this detail reaches clients.

use thiserror::Error;

/// Errors returned by [`CredentialIssuer`](super::CredentialIssuer)
#[derive(Error, Debug)]
pub enum IssueError {
    /// API key or secret is missing; no signing was attempted
    #[error("Credentials not configured: {0}")]
    Configuration(String),

    /// The signing primitive failed
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),
}

impl IssueError {
    pub(crate) fn missing(what: &str) -> Self {
        IssueError::Configuration(format!("{} not set", what))
    }
}

/// Errors raised by a [`GrantSigner`](super::GrantSigner)
#[derive(Error, Debug)]
pub enum SigningError {
    /// Token could not be encoded or signed
    #[error("failed to encode token: {0}")]
    Encode(String),

    /// Token is malformed, expired, or carries a bad signature
    #[error("invalid token: {0}")]
    Invalid(String),
}

impl From<jsonwebtoken::errors::Error> for SigningError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::Json(_) | ErrorKind::InvalidKeyFormat | ErrorKind::Crypto(_) => {
                SigningError::Encode(err.to_string())
            }
            _ => SigningError::Invalid(err.to_string()),
        }
    }
}

/// Result type alias for issuer operations
pub type IssueResult<T> = Result<T, IssueError>;

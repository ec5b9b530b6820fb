//! Access credentials for real-time rooms
//!
//! A credential is an HS256 JWT in the LiveKit access-token layout:
//! - `iss`: API key
//! - `sub` / `jti`: participant identity
//! - `nbf` / `exp`: validity window, `exp - nbf` is the configured TTL
//! - `video`: room grant, always join + publish + subscribe

mod error;
mod grant;
mod issuer;
mod signer;

pub use error::{IssueError, IssueResult, SigningError};
pub use grant::{AccessClaims, VideoGrant};
pub use issuer::{Credential, CredentialIssuer, IssuerConfig, SecretMaterials, DEFAULT_TOKEN_TTL};
pub use signer::{BoxedSigner, GrantSigner, HmacJwtSigner};

//! Token signing
//!
//! [`GrantSigner`] is the seam between the issuer and the cryptography.
//! [`HmacJwtSigner`] produces HS256 JWTs keyed by the API secret.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::credentials::error::SigningError;
use crate::credentials::grant::AccessClaims;
use crate::credentials::issuer::SecretMaterials;

/// Signs and verifies access claims
pub trait GrantSigner: Send + Sync {
    /// Encode `claims` into a signed token
    fn sign(&self, secrets: &SecretMaterials, claims: &AccessClaims)
        -> Result<String, SigningError>;

    /// Check a token's signature and time bounds and return its claims
    fn verify(&self, secrets: &SecretMaterials, token: &str) -> Result<AccessClaims, SigningError>;
}

/// Type-erased signer, so state holders need no signer type parameter
pub type BoxedSigner = Box<dyn GrantSigner>;

impl<T: GrantSigner + ?Sized> GrantSigner for Box<T> {
    fn sign(
        &self,
        secrets: &SecretMaterials,
        claims: &AccessClaims,
    ) -> Result<String, SigningError> {
        (**self).sign(secrets, claims)
    }

    fn verify(&self, secrets: &SecretMaterials, token: &str) -> Result<AccessClaims, SigningError> {
        (**self).verify(secrets, token)
    }
}

/// HS256 JWT signer
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacJwtSigner;

impl HmacJwtSigner {
    fn validation(secrets: &SecretMaterials) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        validation.set_issuer(&[secrets.api_key()]);
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation
    }
}

impl GrantSigner for HmacJwtSigner {
    fn sign(
        &self,
        secrets: &SecretMaterials,
        claims: &AccessClaims,
    ) -> Result<String, SigningError> {
        let key = EncodingKey::from_secret(secrets.api_secret().as_bytes());
        let token = encode(&Header::new(Algorithm::HS256), claims, &key)?;
        Ok(token)
    }

    fn verify(&self, secrets: &SecretMaterials, token: &str) -> Result<AccessClaims, SigningError> {
        let key = DecodingKey::from_secret(secrets.api_secret().as_bytes());
        let data = decode::<AccessClaims>(token, &key, &Self::validation(secrets))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::grant::VideoGrant;

    fn secrets(secret: &str) -> SecretMaterials {
        SecretMaterials::new("APIkey123", secret)
    }

    fn claims(nbf: i64, exp: i64) -> AccessClaims {
        AccessClaims {
            iss: "APIkey123".to_string(),
            sub: "alice".to_string(),
            jti: "alice".to_string(),
            nbf,
            exp,
            video: VideoGrant::full_access("lobby"),
        }
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    #[test]
    fn test_sign_produces_three_part_jwt() {
        let token = HmacJwtSigner
            .sign(&secrets("s3cret"), &claims(now(), now() + 600))
            .unwrap();
        assert_eq!(token.split('.').count(), 3);

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_verify_returns_claims() {
        let original = claims(now(), now() + 600);
        let token = HmacJwtSigner.sign(&secrets("s3cret"), &original).unwrap();

        let verified = HmacJwtSigner.verify(&secrets("s3cret"), &token).unwrap();
        assert_eq!(verified, original);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = HmacJwtSigner
            .sign(&secrets("s3cret"), &claims(now(), now() + 600))
            .unwrap();

        let result = HmacJwtSigner.verify(&secrets("other-secret"), &token);
        assert!(matches!(result, Err(SigningError::Invalid(_))));
    }

    #[test]
    fn test_verify_rejects_foreign_issuer() {
        let token = HmacJwtSigner
            .sign(&secrets("s3cret"), &claims(now(), now() + 600))
            .unwrap();

        let other_key = SecretMaterials::new("someone-else", "s3cret");
        assert!(HmacJwtSigner.verify(&other_key, &token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired() {
        // Well past the default 60s leeway
        let token = HmacJwtSigner
            .sign(&secrets("s3cret"), &claims(now() - 7_200, now() - 3_600))
            .unwrap();

        let result = HmacJwtSigner.verify(&secrets("s3cret"), &token);
        assert!(matches!(result, Err(SigningError::Invalid(_))));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let result = HmacJwtSigner.verify(&secrets("s3cret"), "not.a.token");
        assert!(result.is_err());
    }
}

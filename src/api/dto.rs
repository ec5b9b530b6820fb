//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

// ============================================
// CREDENTIAL DTOs
// ============================================

/// Query string of `GET /api/credential`
#[derive(Debug, Default, Deserialize)]
pub struct CredentialQuery {
    /// Participant identity
    #[serde(default)]
    pub identity: Option<String>,
    /// Room to join
    #[serde(default)]
    pub room: Option<String>,
}

impl CredentialQuery {
    /// Both parameters, if present and non-empty
    pub fn into_parts(self) -> Option<(String, String)> {
        let identity = self.identity.filter(|s| !s.is_empty())?;
        let room = self.room.filter(|s| !s.is_empty())?;
        Some((identity, room))
    }
}

/// Issued token
#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialResponse {
    pub token: String,
}

// ============================================
// CONNECTION DTOs
// ============================================

/// Where clients connect with an issued token
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionResponse {
    pub server_url: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "configured" or "missing"
    pub credentials: String,
    pub uptime_seconds: u64,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_parts() {
        let query = CredentialQuery {
            identity: Some("alice".into()),
            room: Some("lobby".into()),
        };
        assert_eq!(
            query.into_parts(),
            Some(("alice".to_string(), "lobby".to_string()))
        );
    }

    #[test]
    fn test_into_parts_rejects_missing_or_empty() {
        assert!(CredentialQuery::default().into_parts().is_none());

        let query = CredentialQuery {
            identity: Some("alice".into()),
            room: None,
        };
        assert!(query.into_parts().is_none());

        let query = CredentialQuery {
            identity: Some(String::new()),
            room: Some("lobby".into()),
        };
        assert!(query.into_parts().is_none());
    }
}

//! Room grants and access-token claims
//!
//! Field names follow the LiveKit access-token layout so clients and the
//! media server can read the token without translation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permissions for one identity inside one room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    /// Allowed to join the room
    pub room_join: bool,
    /// Room the grant applies to
    pub room: String,
    /// Allowed to publish tracks
    pub can_publish: bool,
    /// Allowed to subscribe to other participants' tracks
    pub can_subscribe: bool,
}

impl VideoGrant {
    /// Full join/publish/subscribe access to `room`.
    ///
    /// This is the only grant the issuer hands out.
    pub fn full_access(room: impl Into<String>) -> Self {
        Self {
            room_join: true,
            room: room.into(),
            can_publish: true,
            can_subscribe: true,
        }
    }

    /// True when every permission is granted
    pub fn is_full_access(&self) -> bool {
        self.room_join && self.can_publish && self.can_subscribe
    }
}

impl fmt::Display for VideoGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut perms = Vec::with_capacity(3);
        if self.room_join {
            perms.push("join");
        }
        if self.can_publish {
            perms.push("publish");
        }
        if self.can_subscribe {
            perms.push("subscribe");
        }
        write!(f, "{}:{}", self.room, perms.join("+"))
    }
}

/// JWT payload of an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuer: the API key that signed the token
    pub iss: String,
    /// Subject: participant identity
    pub sub: String,
    /// Token id, set to the identity
    pub jti: String,
    /// Not before (seconds since epoch)
    pub nbf: i64,
    /// Expiration time (seconds since epoch)
    pub exp: i64,
    /// Room permissions
    pub video: VideoGrant,
}

impl AccessClaims {
    /// Participant identity carried by the token
    pub fn identity(&self) -> &str {
        &self.sub
    }

    /// Lifetime of the token in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.exp - self.nbf
    }
}

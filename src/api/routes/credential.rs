//! Credential Routes
//!
//! - GET /api/credential?identity=<id>&room=<room> - Issue an access token

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CredentialQuery, CredentialResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// Returned when `identity` or `room` is absent
pub const MISSING_PARAMS_MESSAGE: &str = "Missing identity or room parameter";

/// GET /api/credential
///
/// Issue a token letting `identity` join, publish and subscribe in `room`.
/// Missing or empty parameters give 400; any issuer failure gives a
/// generic 500.
pub async fn issue_credential(
    State(state): State<Arc<AppState>>,
    query: Option<Query<CredentialQuery>>,
) -> ApiResult<Json<CredentialResponse>> {
    // A malformed query string is treated the same as missing parameters
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let (identity, room) = query
        .into_parts()
        .ok_or_else(|| ApiError::Validation(MISSING_PARAMS_MESSAGE.to_string()))?;

    let credential = state.issuer.issue(&identity, &room)?;

    tracing::info!(identity = %identity, room = %room, "Credential issued");

    Ok(Json(CredentialResponse {
        token: credential.into_string(),
    }))
}

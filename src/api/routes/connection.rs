//! Connection Routes
//!
//! - GET /api/connection - Public LiveKit URL to use with an issued token

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::ConnectionResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /api/connection
pub async fn connection_details(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ConnectionResponse>> {
    let server_url = state.config.livekit_url.clone().ok_or_else(|| {
        ApiError::Unavailable("Real-time server URL not configured".to_string())
    })?;

    Ok(Json(ConnectionResponse { server_url }))
}

//! EONIC Vault REST API
//!
//! HTTP API layer for the credential service, built with Axum.
//!
//! # Endpoints
//!
//! ## Credentials
//! - `GET /api/credential?identity=..&room=..` - Issue a room access token
//! - `GET /api/connection` - Public LiveKit URL
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use eonic_vault::api::{serve, ApiConfig, AppState};
//! use eonic_vault::credentials::{CredentialIssuer, IssuerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let issuer = CredentialIssuer::new(IssuerConfig::new("APIkey", "secret"));
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(issuer, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/credential", get(routes::credential::issue_credential))
        .route("/connection", get(routes::connection::connection_details));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS for browser callers; any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET])
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("EONIC Vault API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("EONIC Vault API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::{ConnectionResponse, CredentialResponse, HealthResponse};
    use crate::credentials::{
        AccessClaims, CredentialIssuer, GrantSigner, IssuerConfig, SecretMaterials, SigningError,
    };
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde::de::DeserializeOwned;
    use tower::util::ServiceExt;

    const TEST_KEY: &str = "APItestkey";
    const TEST_SECRET: &str = "test-secret-key-for-signing";

    fn configured_issuer() -> CredentialIssuer {
        CredentialIssuer::new(IssuerConfig::new(TEST_KEY, TEST_SECRET))
    }

    fn unconfigured_issuer() -> CredentialIssuer {
        CredentialIssuer::new(IssuerConfig::default())
    }

    /// Signer whose backend is unreachable
    struct OfflineSigner;

    impl GrantSigner for OfflineSigner {
        fn sign(&self, _: &SecretMaterials, _: &AccessClaims) -> Result<String, SigningError> {
            Err(SigningError::Encode("signing backend offline".to_string()))
        }

        fn verify(&self, _: &SecretMaterials, _: &str) -> Result<AccessClaims, SigningError> {
            Err(SigningError::Invalid("signing backend offline".to_string()))
        }
    }

    fn create_test_app<S: GrantSigner + 'static>(
        issuer: CredentialIssuer<S>,
        config: ApiConfig,
    ) -> Router {
        build_router(AppState::new(issuer, config))
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body<T: DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_credential_missing_params() {
        let app = create_test_app(configured_issuer(), ApiConfig::default());

        let response = get(app, "/api/credential").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = json_body(response).await;
        assert_eq!(
            body,
            serde_json::json!({"error": "Missing identity or room parameter"})
        );
    }

    #[tokio::test]
    async fn test_credential_missing_room() {
        let app = create_test_app(configured_issuer(), ApiConfig::default());

        let response = get(app, "/api/credential?identity=alice").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_credential_empty_identity() {
        let app = create_test_app(configured_issuer(), ApiConfig::default());

        let response = get(app, "/api/credential?identity=&room=lobby").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_credential_duplicated_key() {
        let app = create_test_app(configured_issuer(), ApiConfig::default());

        let response = get(app, "/api/credential?identity=alice&identity=bob&room=lobby").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = json_body(response).await;
        assert_eq!(
            body,
            serde_json::json!({"error": "Missing identity or room parameter"})
        );
    }

    #[tokio::test]
    async fn test_credential_issued() {
        let issuer = configured_issuer();
        let verifier = configured_issuer();
        let app = create_test_app(issuer, ApiConfig::default());

        let response = get(app, "/api/credential?identity=alice&room=lobby").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body: CredentialResponse = json_body(response).await;
        assert!(!body.token.is_empty());

        let claims = verifier.verify(&body.token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.video.room, "lobby");
        assert!(claims.video.is_full_access());
    }

    #[tokio::test]
    async fn test_credential_url_encoded_params() {
        let verifier = configured_issuer();
        let app = create_test_app(configured_issuer(), ApiConfig::default());

        let uri = "/api/credential?identity=bob%40example.com&room=daily%20standup";
        let response = get(app, uri).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: CredentialResponse = json_body(response).await;
        let claims = verifier.verify(&body.token).unwrap();
        assert_eq!(claims.sub, "bob@example.com");
        assert_eq!(claims.video.room, "daily standup");
    }

    #[tokio::test]
    async fn test_credential_without_secrets() {
        let app = create_test_app(unconfigured_issuer(), ApiConfig::default());

        let response = get(app, "/api/credential?identity=alice&room=lobby").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = json_body(response).await;
        assert_eq!(body, serde_json::json!({"error": "Failed to generate token"}));
    }

    #[tokio::test]
    async fn test_credential_signing_failure() {
        let config = IssuerConfig::new(TEST_KEY, TEST_SECRET);
        let issuer = CredentialIssuer::with_signer(config, OfflineSigner);
        let app = create_test_app(issuer, ApiConfig::default());

        let response = get(app, "/api/credential?identity=alice&room=lobby").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"error":"Failed to generate token"}"#);
    }

    #[tokio::test]
    async fn test_connection_details() {
        let config = ApiConfig {
            livekit_url: Some("wss://rtc.example.com".to_string()),
            ..Default::default()
        };
        let app = create_test_app(configured_issuer(), config);

        let response = get(app, "/api/connection").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: ConnectionResponse = json_body(response).await;
        assert_eq!(body.server_url, "wss://rtc.example.com");
    }

    #[tokio::test]
    async fn test_connection_details_unconfigured() {
        let app = create_test_app(configured_issuer(), ApiConfig::default());

        let response = get(app, "/api/connection").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: serde_json::Value = json_body(response).await;
        assert_eq!(body["error"], "Real-time server URL not configured");
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app(unconfigured_issuer(), ApiConfig::default());

        let response = get(app, "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let app = create_test_app(configured_issuer(), ApiConfig::default());
        let response = get(app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);

        let app = create_test_app(unconfigured_issuer(), ApiConfig::default());
        let response = get(app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app(unconfigured_issuer(), ApiConfig::default());

        let response = get(app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: HealthResponse = json_body(response).await;
        assert_eq!(body.status, "degraded");
        assert_eq!(body.credentials, "missing");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_cors_restricted_origin() {
        let config = ApiConfig {
            cors_origins: vec!["https://vault.example.com".to_string()],
            ..Default::default()
        };
        let app = create_test_app(configured_issuer(), config);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .header(header::ORIGIN, "https://vault.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://vault.example.com"
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = create_test_app(configured_issuer(), ApiConfig::default());

        let response = get(app, "/api/v1/credential").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

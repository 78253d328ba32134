//! Server plumbing shared by both services: health check, CORS and graceful shutdown

use axum::{
    http::{HeaderValue, Method},
    Json,
};
use serde::Serialize;
use sqlx::PgPool;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use crate::db;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    fn new(database_reachable: bool, service: &str, version: &str) -> Self {
        let (status, database) = if database_reachable {
            ("healthy", "connected")
        } else {
            ("unhealthy", "unavailable")
        };

        Self {
            status: status.to_string(),
            database: database.to_string(),
            service: service.to_string(),
            version: version.to_string(),
        }
    }
}

/// Health check endpoint body.
///
/// `service` and `version` identify the calling binary. Database errors are
/// logged, not reported.
pub async fn health_check(
    pool: PgPool,
    service: &'static str,
    version: &'static str,
) -> Json<HealthResponse> {
    Json(HealthResponse::new(
        db::is_reachable(&pool).await,
        service,
        version,
    ))
}

/// Build the CORS layer from a comma separated origin list.
///
/// With no origins configured every origin is allowed.
pub fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let allowed_origins_str = allowed_origins.unwrap_or_default();

    if allowed_origins_str.trim().is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins_str
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    async fn preflight(cors: CorsLayer, origin: &str) -> Option<HeaderValue> {
        let app = Router::new().route("/", get(|| async { "ok" })).layer(cors);
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/")
                    .header("origin", origin)
                    .header("access-control-request-method", "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        response
            .headers()
            .get("access-control-allow-origin")
            .cloned()
    }

    #[test]
    fn test_health_body_hides_database_detail() {
        let down = HealthResponse::new(false, "config-service", "0.1.0");
        assert_eq!(down.status, "unhealthy");
        assert_eq!(down.database, "unavailable");

        let up = HealthResponse::new(true, "config-service", "0.1.0");
        assert_eq!(up.status, "healthy");
        assert_eq!(up.database, "connected");
        assert_eq!(up.service, "config-service");
    }

    #[tokio::test]
    async fn test_configured_origin_allowed() {
        let cors = configure_cors(Some("http://localhost:4200, http://example.com"));
        assert_eq!(
            preflight(cors, "http://localhost:4200").await,
            Some(HeaderValue::from_static("http://localhost:4200"))
        );
    }

    #[tokio::test]
    async fn test_unlisted_origin_rejected() {
        let cors = configure_cors(Some("http://localhost:4200"));
        assert_eq!(preflight(cors, "http://evil.example").await, None);
    }

    #[tokio::test]
    async fn test_permissive_without_configuration() {
        let cors = configure_cors(None);
        assert!(preflight(cors, "http://anywhere.example").await.is_some());
    }
}

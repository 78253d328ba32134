//! Config Manager user service
//!
//! Registers users and authenticates them, issuing bearer tokens that the
//! config service accepts.

pub mod auth;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use sqlx::PgPool;

use configmanager_common::{middleware, server};

pub use state::AppState;

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "user-service";

/// Port used when `PORT` is unset
pub const DEFAULT_PORT: u16 = 8081;

/// Build the application router.
///
/// `db_pool` backs the `/health` endpoint and may be `None` in tests that do
/// not run against a database.
pub fn build_router(state: AppState, db_pool: Option<PgPool>) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .merge(routes::auth_routes());

    if let Some(pool) = db_pool {
        router = router.route(
            "/health",
            get(move || server::health_check(pool.clone(), SERVICE_NAME, env!("CARGO_PKG_VERSION"))),
        );
    }

    router
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn_with_state(
            SERVICE_NAME,
            middleware::request_tracing,
        ))
}

async fn root() -> &'static str {
    "Config Manager User Service"
}

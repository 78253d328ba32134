//! Config Manager user service
//!
//! Serves `/api/auth/register` and `/api/auth/login`, backed by the shared
//! Postgres `users` table.

use std::net::SocketAddr;
use std::sync::Arc;

use configmanager_common::auth::{PasswordHasher, TokenService};
use configmanager_common::config::Config;
use configmanager_common::store::{CredentialStore, PgCredentialStore};
use configmanager_common::{db, server};

use user_service::auth::AuthService;
use user_service::{build_router, AppState, DEFAULT_PORT, SERVICE_NAME};

#[tokio::main]
async fn main() {
    let config = match Config::from_env(DEFAULT_PORT) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(
        service = SERVICE_NAME,
        environment = config.environment.as_str(),
        "Starting service"
    );

    let tokens = match TokenService::new(&config.jwt_secret, config.jwt_expiration_seconds) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            tracing::error!(error = %e, "Invalid JWT_SECRET or JWT_EXPIRATION_SECONDS");
            std::process::exit(1);
        }
    };

    let hasher = match PasswordHasher::new(config.bcrypt_cost) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(error = %e, "Invalid BCRYPT_COST");
            std::process::exit(1);
        }
    };
    tracing::debug!(bcrypt_cost = hasher.cost(), "Password hasher ready");

    let db_pool = match db::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Database unavailable");
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&db_pool).await {
        tracing::error!(error = %e, "Migrations failed");
        std::process::exit(1);
    }

    let credentials: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(db_pool.clone()));
    let auth_service = Arc::new(AuthService::new(credentials, hasher, tokens));

    let app = build_router(AppState::new(auth_service), Some(db_pool))
        .layer(server::configure_cors(config.cors_allowed_origins.as_deref()));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

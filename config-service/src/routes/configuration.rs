//! Configuration routes

use axum::{routing::get, Router};

use crate::handlers::configuration;
use crate::state::AppState;

/// Create configuration routes
pub fn configuration_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/configs",
            get(configuration::list_configurations).post(configuration::create_configuration),
        )
        .route(
            "/api/configs/:id",
            get(configuration::get_configuration)
                .put(configuration::update_configuration)
                .delete(configuration::delete_configuration),
        )
        .route(
            "/api/configs/key/:key",
            get(configuration::get_configuration_by_key),
        )
}

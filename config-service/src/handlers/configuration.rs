//! Configuration HTTP handlers
//!
//! Every handler requires an [`AuthenticatedUser`]; writes are attributed to
//! that user.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use validator::Validate;

use configmanager_common::error::{ApiError, ApiResult};
use configmanager_common::middleware::AuthenticatedUser;

use crate::configuration::{Configuration, ConfigurationError, ConfigurationRequest};
use crate::state::AppState;

impl From<ConfigurationError> for ApiError {
    fn from(err: ConfigurationError) -> Self {
        match err {
            ConfigurationError::NotFound(message) => ApiError::NotFound(message),
            ConfigurationError::DuplicateKey(_) => ApiError::Conflict(err.to_string()),
            ConfigurationError::Store(_) => ApiError::ServiceUnavailable(err.to_string()),
        }
    }
}

/// GET /api/configs - List all entries
pub async fn list_configurations(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<Json<Vec<Configuration>>> {
    let entries = state.configuration_service.list_configurations().await?;
    Ok(Json(entries))
}

/// GET /api/configs/:id - Get an entry by id
pub async fn get_configuration(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Configuration>> {
    let Path(id) = id?;
    let entry = state.configuration_service.get_configuration(id).await?;
    Ok(Json(entry))
}

/// GET /api/configs/key/:key - Get an entry by key
pub async fn get_configuration_by_key(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    key: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Configuration>> {
    let Path(key) = key?;
    let entry = state
        .configuration_service
        .get_configuration_by_key(&key)
        .await?;
    Ok(Json(entry))
}

/// POST /api/configs - Create an entry
pub async fn create_configuration(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<ConfigurationRequest>, JsonRejection>,
) -> ApiResult<Json<Configuration>> {
    let Json(req) = body?;
    req.validate()?;

    let entry = state
        .configuration_service
        .create_configuration(req, &user.username)
        .await?;

    Ok(Json(entry))
}

/// PUT /api/configs/:id - Replace an entry
pub async fn update_configuration(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ConfigurationRequest>, JsonRejection>,
) -> ApiResult<Json<Configuration>> {
    let Path(id) = id?;
    let Json(req) = body?;
    req.validate()?;

    let entry = state
        .configuration_service
        .update_configuration(id, req, &user.username)
        .await?;

    Ok(Json(entry))
}

/// DELETE /api/configs/:id - Delete an entry
pub async fn delete_configuration(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.configuration_service.delete_configuration(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Authentication HTTP handlers
//!
//! Endpoints for username/password registration and login.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use configmanager_common::error::{ApiError, ApiResult};

use crate::auth::AuthError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::state::AppState;

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateIdentity => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::StoreUnavailable(_) => ApiError::ServiceUnavailable(err.to_string()),
            AuthError::Hashing(_) | AuthError::Token(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

/// POST /api/auth/register - Create a user and issue a token
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = body?;
    req.validate()?;

    let response = state
        .auth_service
        .register(&req.username, &req.password, req.email)
        .await?;

    Ok(Json(response))
}

/// POST /api/auth/login - Verify credentials and issue a token
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    // An unreadable body is rejected like a wrong password
    let Json(req) = body.map_err(|e| {
        tracing::debug!(error = %e.body_text(), "Unreadable login body");
        AuthError::InvalidCredentials
    })?;

    let response = state
        .auth_service
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(response))
}

//! Authentication middleware
//!
//! Extractor for bearer token verification and user resolution.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{JwtError, TokenService};
use crate::store::CredentialStore;

/// Authenticated user resolved from a bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    pub role: String,
}

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthError {
    #[serde(skip)]
    status: StatusCode,
    error: AuthErrorDetails,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetails {
    code: String,
    message: String,
}

impl AuthError {
    fn new(code: &str, message: &str) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, code, message)
    }

    fn with_status(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            error: AuthErrorDetails {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Extractor for authenticated users
///
/// Verifies the bearer token from the Authorization header, then loads the
/// user it names and checks the token against that user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, {}", user.username)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenService>: FromRef<S>,
    Arc<dyn CredentialStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthError::new(
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                    .into_response()
                })?;
        let token = bearer.token();

        let tokens = Arc::<TokenService>::from_ref(state);
        let credentials = Arc::<dyn CredentialStore>::from_ref(state);

        let username = tokens.extract_subject(token).map_err(|e| {
            let (code, message) = match e {
                JwtError::TokenExpired => ("TOKEN_EXPIRED", "Token has expired"),
                _ => ("INVALID_TOKEN", "Invalid token"),
            };
            AuthError::new(code, message).into_response()
        })?;

        let credential = credentials
            .find_by_username(&username)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Credential lookup failed during authentication");
                AuthError::with_status(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Authentication is temporarily unavailable",
                )
                .into_response()
            })?
            .ok_or_else(|| {
                tracing::debug!(username = %username, "Token names an unknown user");
                AuthError::new("INVALID_TOKEN", "Invalid token").into_response()
            })?;

        if !tokens.verify(token, &credential.username) {
            return Err(AuthError::new("INVALID_TOKEN", "Invalid token").into_response());
        }

        super::tracing::record_user(&credential.username);

        Ok(AuthenticatedUser {
            id: credential.id,
            username: credential.username,
            role: credential.role,
        })
    }
}

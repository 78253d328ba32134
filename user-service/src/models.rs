//! Request and response bodies for the auth endpoints

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50, message = "username must be 3-50 characters"),
        custom = "validate_username"
    )]
    pub username: String,

    #[validate(
        length(min = 8, message = "password must be at least 8 characters"),
        custom = "validate_password_bytes"
    )]
    pub password: String,

    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
}

/// Login request
///
/// Deliberately unvalidated: malformed credentials fail the same way as wrong ones.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token issued on successful registration or login
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub username: String,
}

impl AuthResponse {
    pub fn bearer(token: String, expires_in: i64, username: &str) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            username: username.to_string(),
        }
    }
}

/// bcrypt only reads the first 72 bytes of a password
const MAX_PASSWORD_BYTES: usize = 72;

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("password_bytes");
        err.message = Some("password must be at most 72 bytes".into());
        return Err(err);
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        let mut err = ValidationError::new("username_charset");
        err.message = Some("username must not contain whitespace".into());
        return Err(err);
    }
    Ok(())
}

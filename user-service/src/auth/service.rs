//! Authentication service
//!
//! Core business logic for username/password registration and login.

use std::sync::Arc;
use thiserror::Error;

use configmanager_common::auth::{JwtError, PasswordError, PasswordHasher, TokenService};
use configmanager_common::models::{NewCredential, DEFAULT_ROLE};
use configmanager_common::store::{CredentialStore, StoreError};

use crate::models::AuthResponse;

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Username already exists")]
    DuplicateIdentity,

    /// Unknown user and wrong password are reported identically.
    #[error("Invalid username/password")]
    InvalidCredentials,

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => AuthError::DuplicateIdentity,
            StoreError::Unavailable(message) => AuthError::StoreUnavailable(message),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        AuthError::Hashing(e.to_string())
    }
}

/// Authentication service
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            credentials,
            hasher,
            tokens,
        }
    }

    /// Create a user with the default role and issue a token for it.
    ///
    /// The existence check is only an early exit; the store's uniqueness
    /// constraint decides between concurrent registrations of one username.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<String>,
    ) -> Result<AuthResponse, AuthError> {
        if self.credentials.exists_by_username(username).await? {
            tracing::debug!(username = %username, "Registration rejected, username taken");
            return Err(AuthError::DuplicateIdentity);
        }

        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))??;

        let credential = self
            .credentials
            .save(NewCredential {
                username: username.to_string(),
                password_hash,
                email,
                role: DEFAULT_ROLE.to_string(),
            })
            .await?;

        tracing::info!(user_id = credential.id, username = %credential.username, "User registered");

        self.issue(&credential.username)
    }

    /// Check a username/password pair and issue a token.
    ///
    /// Every failure, including a store error, is [`AuthError::InvalidCredentials`].
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let credential = match self.credentials.find_by_username(username).await {
            Ok(credential) => credential,
            Err(e) => {
                tracing::error!(error = %e, "Credential lookup failed during login");
                None
            }
        };

        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        let stored_hash = credential.as_ref().map(|c| c.password_hash.clone());
        let password_ok = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.verify(&plaintext, &hash),
            None => hasher.verify_dummy(&plaintext),
        })
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            false
        });

        match credential {
            Some(credential) if password_ok => {
                tracing::info!(user_id = credential.id, "User logged in");
                self.issue(&credential.username)
            }
            _ => {
                tracing::debug!(username = %username, "Login rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    fn issue(&self, username: &str) -> Result<AuthResponse, AuthError> {
        let token = self.tokens.issue(username)?;
        Ok(AuthResponse::bearer(token, self.tokens.ttl_seconds(), username))
    }
}

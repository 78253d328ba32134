//! Credential store

use async_trait::async_trait;
use sqlx::PgPool;

use super::StoreError;
use crate::models::{Credential, NewCredential};

/// Access to stored credentials
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError>;

    /// Persist a new credential.
    ///
    /// Fails with [`StoreError::Duplicate`] if the username is taken, even when
    /// a concurrent writer got there between an existence check and this call.
    async fn save(&self, credential: NewCredential) -> Result<Credential, StoreError>;
}

/// Postgres-backed credential store over the `users` table
#[derive(Clone)]
pub struct PgCredentialStore {
    db_pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            SELECT id, username, password_hash, email, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(credential)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.db_pool)
                .await?;

        Ok(exists)
    }

    async fn save(&self, credential: NewCredential) -> Result<Credential, StoreError> {
        let saved = sqlx::query_as::<_, Credential>(
            r#"
            INSERT INTO users (username, password_hash, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, email, role, created_at
            "#,
        )
        .bind(&credential.username)
        .bind(&credential.password_hash)
        .bind(&credential.email)
        .bind(&credential.role)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(saved)
    }
}

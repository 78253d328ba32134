//! Persistence seams
//!
//! Stores are traits so the services can run against Postgres in production
//! and an in-memory map in tests. Uniqueness is always enforced by the store
//! itself; callers' existence checks are only an early exit.

mod credential;
mod memory;

pub use credential::{CredentialStore, PgCredentialStore};
pub use memory::InMemoryCredentialStore;

use thiserror::Error;

/// Store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate(db_err.constraint().unwrap_or("unique").to_string())
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

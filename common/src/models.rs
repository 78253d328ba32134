//! User models shared by both services

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};

/// Role assigned to every newly registered user
pub const DEFAULT_ROLE: &str = "USER";

/// Stored identity record
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// A credential that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub role: String,
}

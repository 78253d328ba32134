//! In-memory credential store

use async_trait::async_trait;
use chrono::Utc;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use super::{CredentialStore, StoreError};
use crate::models::{Credential, NewCredential};

#[derive(Default)]
struct Inner {
    by_username: HashMap<String, Credential>,
    next_id: i64,
}

/// Credential store backed by a map, for tests and local runs without a database
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_username.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self.inner.read().await.by_username.get(username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.by_username.contains_key(username))
    }

    async fn save(&self, credential: NewCredential) -> Result<Credential, StoreError> {
        // Check and insert under one write lock
        let mut inner = self.inner.write().await;

        if inner.by_username.contains_key(&credential.username) {
            return Err(StoreError::Duplicate("users_username_key".to_string()));
        }

        inner.next_id += 1;
        let saved = Credential {
            id: inner.next_id,
            username: credential.username,
            password_hash: credential.password_hash,
            email: credential.email,
            role: credential.role,
            created_at: Utc::now(),
        };
        inner
            .by_username
            .insert(saved.username.clone(), saved.clone());

        Ok(saved)
    }
}

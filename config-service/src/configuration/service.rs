//! Configuration service
//!
//! CRUD over configuration entries, stamped with the authenticated caller.

use std::sync::Arc;
use thiserror::Error;

use configmanager_common::store::StoreError;

use super::model::{Configuration, ConfigurationChanges, ConfigurationRequest, NewConfiguration};
use super::store::ConfigurationStore;

/// Configuration service errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{0}")]
    NotFound(String),

    #[error("Configuration with key '{0}' already exists")]
    DuplicateKey(String),

    #[error("Configuration store unavailable: {0}")]
    Store(String),
}

impl ConfigurationError {
    fn not_found_id(id: i64) -> Self {
        ConfigurationError::NotFound(format!("Configuration not found with id: {}", id))
    }

    fn not_found_key(key: &str) -> Self {
        ConfigurationError::NotFound(format!("Configuration not found with key: {}", key))
    }

    fn from_store(e: StoreError, key: &str) -> Self {
        match e {
            StoreError::Duplicate(_) => ConfigurationError::DuplicateKey(key.to_string()),
            StoreError::Unavailable(message) => ConfigurationError::Store(message),
        }
    }
}

/// Reads never violate a constraint; writes go through `from_store` to keep the key.
impl From<StoreError> for ConfigurationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(constraint) => {
                ConfigurationError::Store(format!("unexpected unique violation on {}", constraint))
            }
            StoreError::Unavailable(message) => ConfigurationError::Store(message),
        }
    }
}

/// Configuration service
pub struct ConfigurationService {
    store: Arc<dyn ConfigurationStore>,
}

impl ConfigurationService {
    pub fn new(store: Arc<dyn ConfigurationStore>) -> Self {
        Self { store }
    }

    /// All entries, ordered by id
    pub async fn list_configurations(&self) -> Result<Vec<Configuration>, ConfigurationError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get_configuration(&self, id: i64) -> Result<Configuration, ConfigurationError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ConfigurationError::not_found_id(id))
    }

    pub async fn get_configuration_by_key(
        &self,
        key: &str,
    ) -> Result<Configuration, ConfigurationError> {
        self.store
            .find_by_key(key)
            .await?
            .ok_or_else(|| ConfigurationError::not_found_key(key))
    }

    /// Create an entry owned by `username`.
    ///
    /// The key check is an early exit; the store's uniqueness constraint
    /// decides between concurrent creates.
    pub async fn create_configuration(
        &self,
        request: ConfigurationRequest,
        username: &str,
    ) -> Result<Configuration, ConfigurationError> {
        if self.store.exists_by_key(&request.key).await? {
            return Err(ConfigurationError::DuplicateKey(request.key));
        }

        let key = request.key.clone();
        let created = self
            .store
            .insert(NewConfiguration {
                key: request.key,
                value: request.value,
                description: request.description,
                created_by: username.to_string(),
            })
            .await
            .map_err(|e| ConfigurationError::from_store(e, &key))?;

        tracing::info!(id = created.id, key = %created.key, created_by = %username, "Configuration created");

        Ok(created)
    }

    /// Replace an entry's key, value and description.
    ///
    /// Changing the key to one held by another entry is a conflict; keeping
    /// the entry's own key is not.
    pub async fn update_configuration(
        &self,
        id: i64,
        request: ConfigurationRequest,
        username: &str,
    ) -> Result<Configuration, ConfigurationError> {
        let existing = self.get_configuration(id).await?;

        if existing.key != request.key && self.store.exists_by_key(&request.key).await? {
            return Err(ConfigurationError::DuplicateKey(request.key));
        }

        let key = request.key.clone();
        let updated = self
            .store
            .update(
                id,
                ConfigurationChanges {
                    key: request.key,
                    value: request.value,
                    description: request.description,
                    last_modified_by: username.to_string(),
                },
            )
            .await
            .map_err(|e| ConfigurationError::from_store(e, &key))?
            .ok_or_else(|| ConfigurationError::not_found_id(id))?;

        tracing::info!(id = updated.id, key = %updated.key, modified_by = %username, "Configuration updated");

        Ok(updated)
    }

    pub async fn delete_configuration(&self, id: i64) -> Result<(), ConfigurationError> {
        if !self.store.delete(id).await? {
            return Err(ConfigurationError::not_found_id(id));
        }

        tracing::info!(id = id, "Configuration deleted");
        Ok(())
    }
}

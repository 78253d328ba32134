//! Configuration entry storage

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::RwLock;

use configmanager_common::store::StoreError;

use super::model::{Configuration, ConfigurationChanges, NewConfiguration};

/// Access to stored configuration entries
///
/// Implementations must reject a write that would give two entries the same
/// key with [`StoreError::Duplicate`].
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// All entries, ordered by id
    async fn find_all(&self) -> Result<Vec<Configuration>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Configuration>, StoreError>;

    async fn find_by_key(&self, key: &str) -> Result<Option<Configuration>, StoreError>;

    async fn exists_by_key(&self, key: &str) -> Result<bool, StoreError>;

    async fn insert(&self, entry: NewConfiguration) -> Result<Configuration, StoreError>;

    /// Replace an entry's values. Returns `None` if no entry has `id`.
    async fn update(
        &self,
        id: i64,
        changes: ConfigurationChanges,
    ) -> Result<Option<Configuration>, StoreError>;

    /// Returns whether an entry was deleted
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// Postgres-backed store over the `configurations` table
#[derive(Clone)]
pub struct PgConfigurationStore {
    db_pool: PgPool,
}

impl PgConfigurationStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ConfigurationStore for PgConfigurationStore {
    async fn find_all(&self) -> Result<Vec<Configuration>, StoreError> {
        let entries = sqlx::query_as::<_, Configuration>(
            r#"
            SELECT id, key, value, description, created_by, last_modified_by, created_at, updated_at
            FROM configurations
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(entries)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Configuration>, StoreError> {
        let entry = sqlx::query_as::<_, Configuration>(
            r#"
            SELECT id, key, value, description, created_by, last_modified_by, created_at, updated_at
            FROM configurations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(entry)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Configuration>, StoreError> {
        let entry = sqlx::query_as::<_, Configuration>(
            r#"
            SELECT id, key, value, description, created_by, last_modified_by, created_at, updated_at
            FROM configurations
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(entry)
    }

    async fn exists_by_key(&self, key: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM configurations WHERE key = $1)")
                .bind(key)
                .fetch_one(&self.db_pool)
                .await?;

        Ok(exists)
    }

    async fn insert(&self, entry: NewConfiguration) -> Result<Configuration, StoreError> {
        let saved = sqlx::query_as::<_, Configuration>(
            r#"
            INSERT INTO configurations (key, value, description, created_by, last_modified_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4, NOW(), NOW())
            RETURNING id, key, value, description, created_by, last_modified_by, created_at, updated_at
            "#,
        )
        .bind(&entry.key)
        .bind(&entry.value)
        .bind(&entry.description)
        .bind(&entry.created_by)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(saved)
    }

    async fn update(
        &self,
        id: i64,
        changes: ConfigurationChanges,
    ) -> Result<Option<Configuration>, StoreError> {
        let updated = sqlx::query_as::<_, Configuration>(
            r#"
            UPDATE configurations
            SET key = $1, value = $2, description = $3, last_modified_by = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, key, value, description, created_by, last_modified_by, created_at, updated_at
            "#,
        )
        .bind(&changes.key)
        .bind(&changes.value)
        .bind(&changes.description)
        .bind(&changes.last_modified_by)
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let rows_affected = sqlx::query("DELETE FROM configurations WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

#[derive(Default)]
struct Inner {
    entries: BTreeMap<i64, Configuration>,
    next_id: i64,
}

impl Inner {
    fn key_taken(&self, key: &str, except_id: Option<i64>) -> bool {
        self.entries
            .values()
            .any(|e| e.key == key && Some(e.id) != except_id)
    }
}

/// Store backed by an ordered map, for tests and local runs without a database
#[derive(Clone, Default)]
pub struct InMemoryConfigurationStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn find_all(&self) -> Result<Vec<Configuration>, StoreError> {
        Ok(self.inner.read().await.entries.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Configuration>, StoreError> {
        Ok(self.inner.read().await.entries.get(&id).cloned())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Configuration>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .entries
            .values()
            .find(|e| e.key == key)
            .cloned())
    }

    async fn exists_by_key(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.key_taken(key, None))
    }

    async fn insert(&self, entry: NewConfiguration) -> Result<Configuration, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.key_taken(&entry.key, None) {
            return Err(StoreError::Duplicate("configurations_key_key".to_string()));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let saved = Configuration {
            id: inner.next_id,
            key: entry.key,
            value: entry.value,
            description: entry.description,
            created_by: Some(entry.created_by.clone()),
            last_modified_by: Some(entry.created_by),
            created_at: now,
            updated_at: now,
        };
        inner.entries.insert(saved.id, saved.clone());

        Ok(saved)
    }

    async fn update(
        &self,
        id: i64,
        changes: ConfigurationChanges,
    ) -> Result<Option<Configuration>, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.key_taken(&changes.key, Some(id)) {
            return Err(StoreError::Duplicate("configurations_key_key".to_string()));
        }

        let Some(entry) = inner.entries.get_mut(&id) else {
            return Ok(None);
        };

        entry.key = changes.key;
        entry.value = changes.value;
        entry.description = changes.description;
        entry.last_modified_by = Some(changes.last_modified_by);
        entry.updated_at = Utc::now();

        Ok(Some(entry.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.entries.remove(&id).is_some())
    }
}

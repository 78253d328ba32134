//! Postgres configuration store tests

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use config_service::configuration::{
        ConfigurationChanges, ConfigurationStore, NewConfiguration, PgConfigurationStore,
    };
    use configmanager_common::db;
    use configmanager_common::store::StoreError;

    /// Helper to create a migrated test database pool
    async fn setup_test_db() -> PgPool {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/configmanager_test".to_string());

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn unique_key(prefix: &str) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{}.{}", prefix, nanos)
    }

    fn new_entry(key: &str) -> NewConfiguration {
        NewConfiguration {
            key: key.to_string(),
            value: "30".to_string(),
            description: Some("test entry".to_string()),
            created_by: "alice".to_string(),
        }
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_insert_find_update_delete() {
        let store = PgConfigurationStore::new(setup_test_db().await);
        let key = unique_key("app.timeout");

        let saved = store.insert(new_entry(&key)).await.unwrap();
        assert_eq!(saved.created_by.as_deref(), Some("alice"));
        assert_eq!(saved.last_modified_by.as_deref(), Some("alice"));
        assert!(store.exists_by_key(&key).await.unwrap());
        assert_eq!(store.find_by_key(&key).await.unwrap(), Some(saved.clone()));

        let updated = store
            .update(
                saved.id,
                ConfigurationChanges {
                    key: key.clone(),
                    value: "60".to_string(),
                    description: None,
                    last_modified_by: "bob".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.value, "60");
        assert_eq!(updated.created_by.as_deref(), Some("alice"));
        assert_eq!(updated.last_modified_by.as_deref(), Some("bob"));
        assert!(updated.updated_at >= saved.updated_at);

        assert!(store.delete(saved.id).await.unwrap());
        assert!(!store.delete(saved.id).await.unwrap());
        assert_eq!(store.find_by_id(saved.id).await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_unique_key_maps_to_duplicate() {
        let store = PgConfigurationStore::new(setup_test_db().await);
        let key = unique_key("dup");

        store.insert(new_entry(&key)).await.unwrap();
        let result = store.insert(new_entry(&key)).await;

        assert!(matches!(result, Err(StoreError::Duplicate(_))));
    }
}

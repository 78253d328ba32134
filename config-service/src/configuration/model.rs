//! Configuration entry models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use validator::{Validate, ValidationError};

/// Stored configuration entry
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of create and update requests
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct ConfigurationRequest {
    #[validate(
        length(max = 255, message = "key must be at most 255 characters"),
        custom = "validate_not_blank"
    )]
    pub key: String,

    pub value: String,

    pub description: Option<String>,
}

/// Entry to insert
#[derive(Debug, Clone)]
pub struct NewConfiguration {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub created_by: String,
}

/// Replacement values for an existing entry
#[derive(Debug, Clone)]
pub struct ConfigurationChanges {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub last_modified_by: String,
}

fn validate_not_blank(key: &str) -> Result<(), ValidationError> {
    if key.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Key is required".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(key: &str) -> ConfigurationRequest {
        ConfigurationRequest {
            key: key.to_string(),
            value: "value".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_key_is_required() {
        assert!(request("app.timeout").validate().is_ok());
        assert!(request("").validate().is_err());
        assert!(request("   ").validate().is_err());
    }

    #[test]
    fn test_key_length_limit() {
        assert!(request(&"k".repeat(255)).validate().is_ok());
        assert!(request(&"k".repeat(256)).validate().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let entry = Configuration {
            id: 1,
            key: "app.timeout".to_string(),
            value: "30".to_string(),
            description: None,
            created_by: Some("alice".to_string()),
            last_modified_by: Some("alice".to_string()),
            created_at: timestamp,
            updated_at: timestamp,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["createdBy"], "alice");
        assert_eq!(json["lastModifiedBy"], "alice");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_by").is_none());
    }
}

//! API key model and record encoding

use super::{annotations, labels, parse_i64};
use crate::storage::EntityRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Data key under which the secret itself is stored, exactly once.
pub const SECRET_DATA_KEY: &str = "api_key";

/// Key status. Informational: an inactive key is not deleted, the
/// enforcement layer rejects it based on this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    #[default]
    Active,
    Inactive,
}

impl KeyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStatus::Active => "active",
            KeyStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(KeyStatus::Active),
            "inactive" => Ok(KeyStatus::Inactive),
            other => Err(format!("unknown key status: {}", other)),
        }
    }
}

/// An issued API key record. The secret appears only in the record
/// payload; the fingerprint label is the sole queryable identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Record name: `apikey-{user}-{team}-{fingerprint prefix}`
    pub name: String,
    pub user_id: String,
    pub team_id: String,
    pub role: String,
    pub tier: String,
    /// Resolved limits frozen at issue time
    pub token_limit: i64,
    pub request_limit: i64,
    pub time_window: String,
    pub models_allowed: Vec<String>,
    pub status: KeyStatus,
    /// Optional human alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Optional free-form constraint payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_limits: Option<serde_json::Value>,
    /// Truncated content hash of the secret
    pub fingerprint: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl KeyRecord {
    /// Deterministic record name.
    pub fn record_name(user_id: &str, team_id: &str, fingerprint_prefix: &str) -> String {
        format!("apikey-{}-{}-{}", user_id, team_id, fingerprint_prefix)
    }

    /// Encode into a store record, embedding the secret payload.
    pub fn to_record(&self, secret: &str) -> EntityRecord {
        let mut record = EntityRecord::new(&self.name)
            .label(labels::RESOURCE_TYPE, labels::TYPE_TEAM_KEY)
            .label(labels::MANAGED_BY, labels::MANAGED_BY_VALUE)
            .label(labels::USER_ID, &self.user_id)
            .label(labels::TEAM_ID, &self.team_id)
            .label(labels::TEAM_ROLE, &self.role)
            .label(labels::TIER, &self.tier)
            .label(labels::KEY_FINGERPRINT, &self.fingerprint)
            .annotation(annotations::TOKEN_LIMIT, self.token_limit.to_string())
            .annotation(annotations::REQUEST_LIMIT, self.request_limit.to_string())
            .annotation(annotations::TIME_WINDOW, &self.time_window)
            .annotation(annotations::MODELS_ALLOWED, self.models_allowed.join(","))
            .annotation(annotations::STATUS, self.status.as_str())
            .annotation(annotations::CREATED_AT, self.created_at.to_rfc3339())
            .data_entry(SECRET_DATA_KEY, secret);

        if let Some(alias) = &self.alias {
            record = record.annotation(annotations::ALIAS, alias);
        }
        if let Some(custom) = &self.custom_limits {
            record = record.annotation(annotations::CUSTOM_LIMITS, custom.to_string());
        }
        if let Some(updated_at) = self.updated_at {
            record = record.annotation(annotations::UPDATED_AT, updated_at.to_rfc3339());
        }
        record
    }

    /// Decode from a store record.
    pub fn from_record(record: &EntityRecord) -> KeyRecord {
        let models = record
            .annotations
            .get(annotations::MODELS_ALLOWED)
            .map(|joined| {
                joined
                    .split(',')
                    .filter(|model| !model.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        KeyRecord {
            name: record.name.clone(),
            user_id: record
                .labels
                .get(labels::USER_ID)
                .cloned()
                .unwrap_or_default(),
            team_id: record
                .labels
                .get(labels::TEAM_ID)
                .cloned()
                .unwrap_or_default(),
            role: record
                .labels
                .get(labels::TEAM_ROLE)
                .cloned()
                .unwrap_or_default(),
            tier: record.labels.get(labels::TIER).cloned().unwrap_or_default(),
            token_limit: parse_i64(record.annotations.get(annotations::TOKEN_LIMIT)),
            request_limit: parse_i64(record.annotations.get(annotations::REQUEST_LIMIT)),
            time_window: record
                .annotations
                .get(annotations::TIME_WINDOW)
                .cloned()
                .unwrap_or_default(),
            models_allowed: models,
            status: record
                .annotations
                .get(annotations::STATUS)
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            alias: record.annotations.get(annotations::ALIAS).cloned(),
            custom_limits: record
                .annotations
                .get(annotations::CUSTOM_LIMITS)
                .and_then(|raw| serde_json::from_str(raw).ok()),
            fingerprint: record
                .labels
                .get(labels::KEY_FINGERPRINT)
                .cloned()
                .unwrap_or_default(),
            created_at: record
                .annotations
                .get(annotations::CREATED_AT)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_default(),
            updated_at: record
                .annotations
                .get(annotations::UPDATED_AT)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|t| t.with_timezone(&Utc)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_key() -> KeyRecord {
        KeyRecord {
            name: KeyRecord::record_name("alice", "t1", "0a1b2c3d"),
            user_id: "alice".to_string(),
            team_id: "t1".to_string(),
            role: "member".to_string(),
            tier: "standard".to_string(),
            token_limit: 10_000,
            request_limit: 120,
            time_window: "1m".to_string(),
            models_allowed: vec!["simulator-model".to_string()],
            status: KeyStatus::Active,
            alias: Some("ci-key".to_string()),
            custom_limits: Some(json!({"burst": 5})),
            fingerprint: "0a1b2c3d0a1b2c3d0a1b2c3d0a1b2c3d".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_record_name_template() {
        assert_eq!(
            KeyRecord::record_name("alice", "t1", "0a1b2c3d"),
            "apikey-alice-t1-0a1b2c3d"
        );
    }

    #[test]
    fn test_secret_lives_only_in_payload() {
        let record = sample_key().to_record("top-secret");
        assert_eq!(
            record.data.get(SECRET_DATA_KEY).map(String::as_str),
            Some("top-secret")
        );
        for value in record.labels.values().chain(record.annotations.values()) {
            assert_ne!(value, "top-secret");
        }
    }

    #[test]
    fn test_record_round_trip() {
        let key = sample_key();
        let decoded = KeyRecord::from_record(&key.to_record("s3cret"));
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_empty_models_decode_to_empty_vec() {
        let mut key = sample_key();
        key.models_allowed = vec![];
        let decoded = KeyRecord::from_record(&key.to_record("s"));
        assert!(decoded.models_allowed.is_empty());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("active".parse::<KeyStatus>().unwrap(), KeyStatus::Active);
        assert_eq!(
            "inactive".parse::<KeyStatus>().unwrap(),
            KeyStatus::Inactive
        );
        assert!("revoked".parse::<KeyStatus>().is_err());
    }
}

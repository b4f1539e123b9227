//! Derived team membership
//!
//! Membership has no record of its own. A user is a member of a team iff
//! at least one API key record carries the (team, user) pair; the first
//! such record supplies the membership attributes.

use super::KeyRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A membership projection derived from key records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: String,
    pub team_id: String,
    pub role: String,
    pub tier: String,
    pub token_limit: i64,
    pub request_limit: i64,
    pub time_window: String,
    /// Models the member may use
    pub models: Vec<String>,
    /// Creation time of the earliest key seen for this member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
}

impl Membership {
    /// Project a membership out of an existing key record.
    pub fn from_key(key: &KeyRecord) -> Membership {
        Membership {
            user_id: key.user_id.clone(),
            team_id: key.team_id.clone(),
            role: key.role.clone(),
            tier: key.tier.clone(),
            token_limit: key.token_limit,
            request_limit: key.request_limit,
            time_window: key.time_window.clone(),
            models: key.models_allowed.clone(),
            joined_at: Some(key.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::KeyStatus;

    #[test]
    fn test_projection_carries_key_limits() {
        let key = KeyRecord {
            name: "apikey-bob-t1-deadbeef".to_string(),
            user_id: "bob".to_string(),
            team_id: "t1".to_string(),
            role: "member".to_string(),
            tier: "premium".to_string(),
            token_limit: 50_000,
            request_limit: 600,
            time_window: "1m".to_string(),
            models_allowed: vec!["premium-models".to_string()],
            status: KeyStatus::Active,
            alias: None,
            custom_limits: None,
            fingerprint: "deadbeef".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let member = Membership::from_key(&key);
        assert_eq!(member.user_id, "bob");
        assert_eq!(member.token_limit, 50_000);
        assert_eq!(member.joined_at, Some(key.created_at));
    }
}

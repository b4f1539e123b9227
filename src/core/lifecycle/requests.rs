//! Lifecycle operation request types

use crate::core::models::KeyStatus;
use crate::core::tiers::LimitOverrides;
use serde::{Deserialize, Serialize};

/// Team creation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTeamRequest {
    pub team_id: String,
    /// Human-readable name (required)
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Tier name; empty means the configured default tier
    #[serde(default)]
    pub tier: String,
    /// Explicit limit overrides on top of the tier defaults
    #[serde(flatten)]
    pub overrides: LimitOverrides,
}

/// API key creation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateKeyRequest {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Model allow-list; empty means inherit the membership's models
    #[serde(default)]
    pub models: Vec<String>,
    /// Request-level overrides; win over membership-derived limits
    #[serde(flatten)]
    pub overrides: LimitOverrides,
    /// Free-form constraint payload stored verbatim on the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_limits: Option<serde_json::Value>,
}

/// API key update request. Only limit, status, window and alias fields are
/// mutable; identity fields never change in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateKeyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<KeyStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl UpdateKeyRequest {
    /// True when the request carries nothing to change.
    pub fn is_empty(&self) -> bool {
        self.token_limit.is_none()
            && self.request_limit.is_none()
            && self.time_window.is_none()
            && self.status.is_none()
            && self.alias.is_none()
    }
}

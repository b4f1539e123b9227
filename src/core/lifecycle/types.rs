//! Lifecycle operation result types and settings

use crate::core::models::{KeyRecord, Membership, Team};
use crate::core::policy::PolicyKind;
use crate::core::tiers::{EffectiveLimits, Tier};
use serde::{Deserialize, Serialize};

/// Result of issuing an API key. The secret appears here exactly once and
/// is never retrievable again.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedKey {
    pub secret: String,
    pub fingerprint: String,
    pub effective_limits: EffectiveLimits,
    pub key: KeyRecord,
}

/// A team with its derived members and key names.
#[derive(Debug, Clone, Serialize)]
pub struct TeamDetails {
    pub team: Team,
    pub members: Vec<Membership>,
    pub key_names: Vec<String>,
}

/// The enforcement intent currently derivable for a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPolicies {
    pub team_id: String,
    pub tier: String,
    pub token_policy: String,
    pub request_policy: String,
    pub limits: EffectiveLimits,
}

impl TeamPolicies {
    pub fn for_team(team_id: &str, tier: String, limits: EffectiveLimits) -> Self {
        Self {
            team_id: team_id.to_string(),
            tier,
            token_policy: PolicyKind::TokenRate.policy_name(team_id),
            request_policy: PolicyKind::RequestRate.policy_name(team_id),
            limits,
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    /// The reserved fallback team identifier
    pub default_team_id: String,
    /// Tier assigned to the default team and its synthesized memberships
    pub default_team_tier: Tier,
    /// Whether to create the default team at startup
    pub create_default_team: bool,
    /// Random bytes drawn per issued secret
    pub secret_bytes: usize,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            default_team_id: "default".to_string(),
            default_team_tier: Tier::Standard,
            create_default_team: true,
            secret_bytes: crate::core::credentials::DEFAULT_SECRET_BYTES,
        }
    }
}

//! HTTP request/response types

use crate::core::lifecycle::{IssuedKey, TeamDetails};
use crate::core::models::{KeyRecord, Membership, Team};
use crate::core::tiers::EffectiveLimits;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Team summary returned by list and create endpoints.
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub team_id: String,
    pub display_name: String,
    pub description: String,
    pub tier: String,
    pub created_at: DateTime<Utc>,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        Self {
            team_id: team.team_id,
            display_name: team.display_name,
            description: team.description,
            tier: team.tier,
            created_at: team.created_at,
        }
    }
}

/// Team creation response with the limits the team inherited.
#[derive(Debug, Serialize)]
pub struct CreateTeamResponse {
    pub team_id: String,
    pub display_name: String,
    pub tier: String,
    pub inherited_limits: EffectiveLimits,
}

#[derive(Debug, Serialize)]
pub struct TeamListResponse {
    pub teams: Vec<TeamResponse>,
}

/// Full team view with derived members and key names.
#[derive(Debug, Serialize)]
pub struct TeamDetailsResponse {
    pub team_id: String,
    pub display_name: String,
    pub description: String,
    pub tier: String,
    pub members: Vec<Membership>,
    pub keys: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TeamDetails> for TeamDetailsResponse {
    fn from(details: TeamDetails) -> Self {
        Self {
            team_id: details.team.team_id,
            display_name: details.team.display_name,
            description: details.team.description,
            tier: details.team.tier,
            members: details.members,
            keys: details.key_names,
            created_at: details.team.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MembersResponse {
    pub team_id: String,
    pub members: Vec<Membership>,
}

/// Key issue response. The only place the secret ever appears.
#[derive(Debug, Serialize)]
pub struct CreateKeyResponse {
    pub api_key: String,
    pub fingerprint: String,
    pub key_name: String,
    pub user_id: String,
    pub team_id: String,
    pub tier: String,
    pub effective_limits: EffectiveLimits,
}

impl From<IssuedKey> for CreateKeyResponse {
    fn from(issued: IssuedKey) -> Self {
        Self {
            api_key: issued.secret,
            fingerprint: issued.fingerprint,
            key_name: issued.key.name.clone(),
            user_id: issued.key.user_id.clone(),
            team_id: issued.key.team_id.clone(),
            tier: issued.key.tier.clone(),
            effective_limits: issued.effective_limits,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KeyListResponse {
    pub team_id: String,
    pub keys: Vec<KeyRecord>,
}

/// Body of the delete-by-secret endpoint.
#[derive(Debug, Deserialize)]
pub struct DeleteKeyBySecretRequest {
    pub key: String,
}

/// Generic acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check payload.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

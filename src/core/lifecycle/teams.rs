//! Team lifecycle operations

use super::manager::LifecycleManager;
use super::requests::CreateTeamRequest;
use super::saga::Saga;
use super::types::{TeamDetails, TeamPolicies};
use crate::core::models::{KeyRecord, Team, labels};
use crate::core::policy::{CounterScope, PolicyKind};
use crate::core::tiers::{EffectiveLimits, Tier};
use crate::storage::LabelSelector;
use crate::utils::error::{KeyforgeError, Result};
use crate::utils::validation::validate_team_id;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

impl LifecycleManager {
    /// Create a team and publish its enforcement policies.
    ///
    /// If policy publication fails partway, every completed step is
    /// compensated (policies retracted, team record deleted) and the
    /// original publish error is surfaced: a caller must never observe a
    /// team without its enforcement intent.
    pub async fn create_team(&self, request: CreateTeamRequest) -> Result<Team> {
        validate_team_id(&request.team_id)?;
        if request.display_name.is_empty() {
            return Err(KeyforgeError::validation("display_name is required"));
        }
        let tier = if request.tier.is_empty() {
            info!(
                "No tier specified for team {}, using default tier: {}",
                request.team_id,
                self.resolver.default_tier()
            );
            self.resolver.default_tier()
        } else {
            Tier::parse(&request.tier).ok_or_else(|| {
                KeyforgeError::validation(format!(
                    "invalid tier: {}. Available tiers: {}",
                    request.tier,
                    Tier::ALL.map(|t| t.as_str()).join(", ")
                ))
            })?
        };

        // Existence check by direct lookup, not label scan: a concurrent
        // identical create must race on the store's create-if-absent
        // semantics rather than observe a partial write.
        if self
            .entities
            .get(&Team::record_name(&request.team_id))
            .await?
            .is_some()
        {
            return Err(KeyforgeError::conflict(format!(
                "team {} already exists",
                request.team_id
            )));
        }

        let team = Team {
            team_id: request.team_id,
            display_name: request.display_name,
            description: request.description,
            tier: tier.as_str().to_string(),
            overrides: request.overrides,
            created_at: Utc::now(),
        };

        let mut saga = Saga::new();

        self.entities.create(team.to_record()).await?;
        {
            let entities = Arc::clone(&self.entities);
            let record_name = Team::record_name(&team.team_id);
            saga.push("create-team-record", move || async move {
                entities.delete(&record_name).await
            });
        }

        let limits = self.resolver.resolve(tier.as_str(), &team.overrides);
        for kind in PolicyKind::ALL {
            match self
                .publisher
                .publish(&team.team_id, kind, &limits, CounterScope::PerUser)
                .await
            {
                Ok(()) => {
                    let publisher = self.publisher.clone();
                    let team_id = team.team_id.clone();
                    let step = match kind {
                        PolicyKind::TokenRate => "publish-token-policy",
                        PolicyKind::RequestRate => "publish-request-policy",
                    };
                    saga.push(step, move || async move {
                        publisher.retract_kind(&team_id, kind).await;
                        Ok(())
                    });
                }
                Err(err) => {
                    warn!(
                        "Failed to publish {} policy for team {}: {}",
                        kind, team.team_id, err
                    );
                    saga.unwind().await;
                    return Err(err);
                }
            }
        }

        saga.commit();
        info!("Team created: {} ({})", team.team_id, team.display_name);
        Ok(team)
    }

    /// Delete a team, cascading to its policies and keys.
    ///
    /// Policy retraction and key deletion run before the team record is
    /// removed, so an interruption cannot leave keys that still pass
    /// membership checks against a team record that is gone.
    pub async fn delete_team(&self, team_id: &str) -> Result<()> {
        self.require_team(team_id).await?;

        self.publisher.retract(team_id).await;

        match self
            .entities
            .delete_by_selector(&Self::team_keys_selector(team_id))
            .await
        {
            Ok(count) if count > 0 => info!("Deleted {} keys of team {}", count, team_id),
            Ok(_) => {}
            Err(err) => warn!("Failed to delete keys of team {}: {}", team_id, err),
        }

        self.entities.delete(&Team::record_name(team_id)).await?;
        info!("Team deleted: {}", team_id);
        Ok(())
    }

    /// Re-publish a team's enforcement policies from its stored tier and
    /// overrides. Always an upsert; used to push updated tier defaults
    /// without touching the team record.
    pub async fn sync_team_policy(&self, team_id: &str) -> Result<EffectiveLimits> {
        let team = self.require_team(team_id).await?;
        let limits = self.resolver.resolve(&team.tier, &team.overrides);
        self.publisher.publish_all(team_id, &limits).await?;
        info!("Policies synchronized for team {}", team_id);
        Ok(limits)
    }

    /// Fetch a team with its derived members and key names.
    pub async fn get_team(&self, team_id: &str) -> Result<TeamDetails> {
        let team = self.require_team(team_id).await?;
        let members = match self.list_team_members(team_id).await {
            Ok(members) => members,
            Err(err) => {
                warn!("Failed to derive members of team {}: {}", team_id, err);
                Vec::new()
            }
        };
        let key_names = self
            .entities
            .list(&Self::team_keys_selector(team_id))
            .await?
            .into_iter()
            .map(|record| record.name)
            .collect();
        Ok(TeamDetails {
            team,
            members,
            key_names,
        })
    }

    /// List all teams.
    pub async fn list_teams(&self) -> Result<Vec<Team>> {
        let selector =
            LabelSelector::new().with(labels::RESOURCE_TYPE, labels::TYPE_TEAM_CONFIG);
        let records = self.entities.list(&selector).await?;
        Ok(records.iter().map(Team::from_record).collect())
    }

    /// The enforcement intent currently derivable for a team.
    pub async fn team_policies(&self, team_id: &str) -> Result<TeamPolicies> {
        let team = self.require_team(team_id).await?;
        let limits = self.resolver.resolve(&team.tier, &team.overrides);
        Ok(TeamPolicies::for_team(team_id, team.tier, limits))
    }

    /// List a team's API keys (without secrets).
    pub async fn list_team_keys(&self, team_id: &str) -> Result<Vec<KeyRecord>> {
        self.require_team(team_id).await?;
        let records = self
            .entities
            .list(&Self::team_keys_selector(team_id))
            .await?;
        Ok(records.iter().map(KeyRecord::from_record).collect())
    }
}

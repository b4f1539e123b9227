//! Lifecycle engine core

use super::requests::CreateTeamRequest;
use super::types::LifecycleSettings;
use crate::core::models::{Team, labels};
use crate::core::policy::PolicyPublisher;
use crate::core::tiers::{EffectiveLimits, LimitOverrides, LimitResolver};
use crate::storage::{EntityStore, LabelSelector};
use crate::utils::error::{KeyforgeError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates team, membership and API-key lifecycles.
///
/// Every operation runs to completion, including any compensation, before
/// returning; the only suspension points are calls into the external
/// stores. The engine keeps no entity state in memory between requests.
#[derive(Clone)]
pub struct LifecycleManager {
    pub(super) entities: Arc<dyn EntityStore>,
    pub(super) publisher: PolicyPublisher,
    pub(super) resolver: LimitResolver,
    pub(super) settings: LifecycleSettings,
}

impl LifecycleManager {
    pub fn new(
        entities: Arc<dyn EntityStore>,
        publisher: PolicyPublisher,
        resolver: LimitResolver,
        settings: LifecycleSettings,
    ) -> Self {
        Self {
            entities,
            publisher,
            resolver,
            settings,
        }
    }

    /// Effective limits for a tier name with no overrides. Unknown names
    /// degrade to the configured default tier.
    pub fn effective_tier_limits(&self, tier_name: &str) -> EffectiveLimits {
        self.resolver.resolve(tier_name, &LimitOverrides::default())
    }

    /// Create the reserved default team if it does not exist yet.
    ///
    /// Called once at startup; losing a create race against another
    /// replica is fine.
    pub async fn ensure_default_team(&self) -> Result<()> {
        if !self.settings.create_default_team {
            return Ok(());
        }
        let team_id = self.settings.default_team_id.clone();
        if self.entities.get(&Team::record_name(&team_id)).await?.is_some() {
            debug!("Default team already exists, skipping creation");
            return Ok(());
        }
        let request = CreateTeamRequest {
            team_id: team_id.clone(),
            display_name: "Default Team".to_string(),
            description: "Fallback team for users without a team assignment".to_string(),
            tier: self.settings.default_team_tier.as_str().to_string(),
            overrides: LimitOverrides::default(),
        };
        match self.create_team(request).await {
            Ok(_) => {
                info!("Default team created: {}", team_id);
                Ok(())
            }
            Err(err) if err.is_conflict() => {
                debug!("Default team created concurrently elsewhere");
                Ok(())
            }
            Err(err) => {
                warn!("Failed to create default team: {}", err);
                Err(err)
            }
        }
    }

    /// Fetch a team or fail with `NotFound`.
    pub(super) async fn require_team(&self, team_id: &str) -> Result<Team> {
        let record = self
            .entities
            .get(&Team::record_name(team_id))
            .await?
            .ok_or_else(|| KeyforgeError::not_found(format!("team {} not found", team_id)))?;
        Ok(Team::from_record(&record))
    }

    /// Selector matching every API-key record of a team.
    pub(super) fn team_keys_selector(team_id: &str) -> LabelSelector {
        LabelSelector::new()
            .with(labels::MANAGED_BY, labels::MANAGED_BY_VALUE)
            .with(labels::TEAM_ID, team_id)
    }

    /// Selector matching one user's API-key records within a team.
    pub(super) fn user_keys_selector(team_id: &str, user_id: &str) -> LabelSelector {
        Self::team_keys_selector(team_id).with(labels::USER_ID, user_id)
    }
}

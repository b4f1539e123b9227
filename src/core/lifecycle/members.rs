//! Derived membership operations
//!
//! Membership is always derived fresh from key records; there is no cache
//! and no invalidation story to maintain.

use super::manager::LifecycleManager;
use crate::core::models::{KeyRecord, KeyStatus, Membership, Team};
use crate::utils::error::Result;
use std::collections::HashSet;
use tracing::info;

impl LifecycleManager {
    /// Derive the member list of a team from its key records,
    /// deduplicated per user, first record wins.
    pub async fn list_team_members(&self, team_id: &str) -> Result<Vec<Membership>> {
        self.require_team(team_id).await?;
        let records = self
            .entities
            .list(&Self::team_keys_selector(team_id))
            .await?;

        let mut members = Vec::new();
        let mut seen = HashSet::new();
        for record in &records {
            let key = KeyRecord::from_record(record);
            // Only active keys confer membership.
            if key.status != KeyStatus::Active
                || key.user_id.is_empty()
                || !seen.insert(key.user_id.clone())
            {
                continue;
            }
            members.push(self.project_membership(&key));
        }
        Ok(members)
    }

    /// Remove a user from a team by deleting all their keys in it.
    /// Membership is key-derived, so this ends it.
    pub async fn remove_team_member(&self, team_id: &str, user_id: &str) -> Result<u64> {
        self.require_team(team_id).await?;
        let deleted = self
            .entities
            .delete_by_selector(&Self::user_keys_selector(team_id, user_id))
            .await?;
        info!(
            "User {} removed from team {} ({} keys deleted)",
            user_id, team_id, deleted
        );
        Ok(deleted)
    }

    /// Look up one user's membership in a team, derived from their first
    /// key record if any.
    pub(super) async fn find_membership(
        &self,
        team_id: &str,
        user_id: &str,
    ) -> Result<Option<Membership>> {
        let records = self
            .entities
            .list(&Self::user_keys_selector(team_id, user_id))
            .await?;
        Ok(records
            .iter()
            .map(KeyRecord::from_record)
            .find(|key| key.status == KeyStatus::Active)
            .map(|key| self.project_membership(&key)))
    }

    /// Membership for the reserved default team: never stored, always
    /// synthesized from the configured default-team tier.
    pub(super) fn synthesize_default_membership(&self, user_id: &str) -> Membership {
        let tier = self.settings.default_team_tier;
        let limits = tier.limits();
        Membership {
            user_id: user_id.to_string(),
            team_id: self.settings.default_team_id.clone(),
            role: "member".to_string(),
            tier: tier.as_str().to_string(),
            token_limit: limits.token_limit,
            request_limit: limits.request_limit,
            time_window: limits.token_window,
            models: limits.models_allowed,
            joined_at: None,
        }
    }

    /// Membership for a team's very first key, built from the team's
    /// configured tier and overrides.
    pub(super) fn bootstrap_membership(&self, team: &Team, user_id: &str) -> Membership {
        let limits = self.resolver.resolve(&team.tier, &team.overrides);
        Membership {
            user_id: user_id.to_string(),
            team_id: team.team_id.clone(),
            role: "member".to_string(),
            tier: limits.tier.clone(),
            token_limit: limits.token_limit,
            request_limit: limits.request_limit,
            time_window: limits.token_window,
            models: limits.models_allowed,
            joined_at: None,
        }
    }

    /// Project a membership from a key record, filling the model list from
    /// tier defaults when the record carries none.
    fn project_membership(&self, key: &KeyRecord) -> Membership {
        let mut member = Membership::from_key(key);
        if member.models.is_empty() {
            member.models = self.resolver.resolve_tier(&key.tier).limits().models_allowed;
        }
        member
    }
}

//! Enforcement policy publication

use super::types::{
    CounterExpr, CounterScope, LimitRule, PolicyKind, PolicyObject, PolicySpec, RateEntry,
    TargetRef, WhenPredicate,
};
use crate::core::models::{annotations, labels};
use crate::core::tiers::EffectiveLimits;
use crate::storage::PolicyStore;
use crate::utils::error::{KeyforgeError, Result};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Publishes and retracts per-team enforcement policy objects.
///
/// Publication is an idempotent upsert: create by deterministic name, and
/// on an already-exists conflict re-issue as an update carrying the
/// existing object's identity metadata so the store's optimistic
/// concurrency check passes.
#[derive(Clone)]
pub struct PolicyPublisher {
    store: Arc<dyn PolicyStore>,
    gateway_name: String,
    /// The reserved fallback team; covered by a pre-provisioned catch-all
    /// policy, so no per-team objects are published for it.
    default_team_id: String,
}

impl PolicyPublisher {
    pub fn new(
        store: Arc<dyn PolicyStore>,
        gateway_name: impl Into<String>,
        default_team_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway_name: gateway_name.into(),
            default_team_id: default_team_id.into(),
        }
    }

    /// Publish both policy kinds for a team.
    pub async fn publish_all(&self, team_id: &str, limits: &EffectiveLimits) -> Result<()> {
        for kind in PolicyKind::ALL {
            self.publish(team_id, kind, limits, CounterScope::PerUser)
                .await?;
        }
        Ok(())
    }

    /// Publish one policy kind for a team.
    ///
    /// Returns success without side effects when the relevant limit is
    /// unlimited or the team is the reserved default team.
    pub async fn publish(
        &self,
        team_id: &str,
        kind: PolicyKind,
        limits: &EffectiveLimits,
        scope: CounterScope,
    ) -> Result<()> {
        let unlimited = match kind {
            PolicyKind::TokenRate => limits.token_unlimited(),
            PolicyKind::RequestRate => limits.request_unlimited(),
        };
        if unlimited {
            debug!(
                "Team {} has unlimited {} budget, skipping policy",
                team_id, kind
            );
            return Ok(());
        }
        if team_id == self.default_team_id {
            debug!("Default team uses the catch-all policy, skipping {}", kind);
            return Ok(());
        }

        let policy = self.build_policy(team_id, kind, limits, scope);
        self.upsert(policy).await
    }

    /// Best-effort removal of both policy kinds for a team.
    ///
    /// Failures are logged, never propagated: a team delete must not hang
    /// on a policy object that is already gone or unreachable.
    pub async fn retract(&self, team_id: &str) {
        for kind in PolicyKind::ALL {
            self.retract_kind(team_id, kind).await;
        }
    }

    /// Best-effort removal of one policy kind for a team.
    pub async fn retract_kind(&self, team_id: &str, kind: PolicyKind) {
        let name = kind.policy_name(team_id);
        match self.store.delete(kind, &name).await {
            Ok(()) => info!("Retracted {} policy {}", kind, name),
            Err(err) if err.is_not_found() => {
                debug!("Policy {} already absent", name);
            }
            Err(err) => warn!("Failed to retract policy {}: {}", name, err),
        }
    }

    async fn upsert(&self, mut policy: PolicyObject) -> Result<()> {
        let name = policy.name.clone();
        match self.store.create(&policy).await {
            Ok(()) => {
                info!("Created {} policy {}", policy.kind, name);
                Ok(())
            }
            Err(err) if err.is_conflict() => {
                debug!("Policy {} already exists, updating in place", name);
                let existing = self
                    .store
                    .get(policy.kind, &name)
                    .await
                    .map_err(|e| {
                        KeyforgeError::publish(format!(
                            "failed to fetch existing policy {}: {}",
                            name, e
                        ))
                    })?
                    .ok_or_else(|| {
                        // Deleted between the conflicting create and our
                        // get; the caller sees one coherent failure.
                        KeyforgeError::publish(format!(
                            "policy {} vanished during upsert",
                            name
                        ))
                    })?;
                policy.uid = existing.uid;
                policy.version = existing.version;
                self.store.update(&policy).await.map_err(|e| {
                    KeyforgeError::publish(format!("failed to update policy {}: {}", name, e))
                })?;
                info!("Updated {} policy {}", policy.kind, name);
                Ok(())
            }
            Err(err) => Err(KeyforgeError::publish(format!(
                "failed to create policy {}: {}",
                name, err
            ))),
        }
    }

    fn build_policy(
        &self,
        team_id: &str,
        kind: PolicyKind,
        limits: &EffectiveLimits,
        scope: CounterScope,
    ) -> PolicyObject {
        let (limit, window) = match kind {
            PolicyKind::TokenRate => (limits.token_limit, limits.token_window.clone()),
            PolicyKind::RequestRate => (limits.request_limit, limits.request_window.clone()),
        };

        let counter = match scope {
            CounterScope::PerUser => "auth.identity.userid".to_string(),
            CounterScope::TeamAggregate => format!("\"{}\"", team_id),
        };
        let predicate = format!(
            "has(auth.identity.metadata.labels) && auth.identity.metadata.labels[\"{}\"] == \"{}\"",
            labels::TEAM_ID,
            team_id
        );

        let rule = LimitRule {
            rates: vec![RateEntry { limit, window }],
            counters: vec![CounterExpr {
                expression: counter,
            }],
            when: vec![WhenPredicate { predicate }],
        };

        let mut spec_limits = BTreeMap::new();
        spec_limits.insert(kind.rule_name(team_id), rule);

        let mut policy_labels = BTreeMap::new();
        policy_labels.insert(
            labels::MANAGED_BY.to_string(),
            labels::MANAGED_BY_VALUE.to_string(),
        );
        policy_labels.insert(labels::TEAM_ID.to_string(), team_id.to_string());
        policy_labels.insert(
            labels::RESOURCE_TYPE.to_string(),
            labels::TYPE_TEAM_RATE_LIMIT.to_string(),
        );

        let mut policy_annotations = BTreeMap::new();
        policy_annotations.insert(
            annotations::CREATED_AT.to_string(),
            Utc::now().to_rfc3339(),
        );
        policy_annotations.insert(
            annotations::DESCRIPTION.to_string(),
            format!("{} limiting policy for team {}", kind, team_id),
        );

        PolicyObject {
            kind,
            name: kind.policy_name(team_id),
            team_id: team_id.to_string(),
            labels: policy_labels,
            annotations: policy_annotations,
            spec: PolicySpec {
                target: TargetRef::gateway(&self.gateway_name),
                limits: spec_limits,
            },
            uid: None,
            version: None,
        }
    }
}

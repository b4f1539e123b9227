//! End-to-end lifecycle scenarios against the in-memory stores

use keyforge::core::lifecycle::{
    CreateKeyRequest, CreateTeamRequest, LifecycleManager, LifecycleSettings,
};
use keyforge::core::models::labels;
use keyforge::core::policy::{PolicyKind, PolicyPublisher};
use keyforge::core::tiers::{LimitResolver, Tier};
use keyforge::storage::{
    EntityStore, LabelSelector, MemoryPolicyStore, MemoryStore, PolicyStore,
};
use keyforge::KeyforgeError;
use std::sync::Arc;

struct Harness {
    engine: LifecycleManager,
    entities: Arc<MemoryStore>,
    policies: Arc<MemoryPolicyStore>,
}

fn harness() -> Harness {
    let entities = Arc::new(MemoryStore::new());
    let policies = Arc::new(MemoryPolicyStore::new());
    let publisher = PolicyPublisher::new(policies.clone(), "inference-gateway", "default");
    let engine = LifecycleManager::new(
        entities.clone(),
        publisher,
        LimitResolver::new(Tier::Standard),
        LifecycleSettings::default(),
    );
    Harness {
        engine,
        entities,
        policies,
    }
}

fn team(team_id: &str, tier: &str) -> CreateTeamRequest {
    CreateTeamRequest {
        team_id: team_id.to_string(),
        display_name: format!("Team {}", team_id),
        tier: tier.to_string(),
        ..Default::default()
    }
}

fn key(user_id: &str) -> CreateKeyRequest {
    CreateKeyRequest {
        user_id: user_id.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_then_delete_leaves_no_residue() {
    let h = harness();
    h.engine.create_team(team("t1", "standard")).await.unwrap();
    h.engine.create_key("t1", key("alice")).await.unwrap();
    h.engine.create_key("t1", key("alice")).await.unwrap();

    assert_eq!(h.policies.len().await, 2);

    h.engine.delete_team("t1").await.unwrap();

    // No enforcement objects and no records carry the team's label.
    assert_eq!(h.policies.len().await, 0);
    let residue = h
        .entities
        .list(&LabelSelector::new().with(labels::TEAM_ID, "t1"))
        .await
        .unwrap();
    assert!(residue.is_empty());
}

#[tokio::test]
async fn sync_twice_keeps_one_object_per_kind() {
    let h = harness();
    h.engine.create_team(team("t1", "standard")).await.unwrap();

    h.engine.sync_team_policy("t1").await.unwrap();
    h.engine.sync_team_policy("t1").await.unwrap();

    assert_eq!(h.policies.len().await, 2);
    for kind in PolicyKind::ALL {
        let object = h
            .policies
            .get(kind, &kind.policy_name("t1"))
            .await
            .unwrap()
            .unwrap();
        // The version token moved past its creation value: the repeated
        // sync went through the already-exists/update branch.
        assert_ne!(object.version.as_deref(), Some("1"));
    }
}

#[tokio::test]
async fn unlimited_team_has_no_enforcement_objects() {
    let h = harness();
    h.engine.create_team(team("t1", "unlimited")).await.unwrap();
    h.engine.sync_team_policy("t1").await.unwrap();
    assert_eq!(h.policies.len().await, 0);
}

#[tokio::test]
async fn zero_override_keeps_free_tier_default() {
    let h = harness();
    let mut request = team("t1", "free");
    request.overrides.token_limit = Some(0);
    h.engine.create_team(request).await.unwrap();

    let intent = h.engine.team_policies("t1").await.unwrap();
    assert_eq!(intent.limits.token_limit, Tier::Free.limits().token_limit);
}

#[tokio::test]
async fn secret_round_trip_deletes_exactly_once() {
    let h = harness();
    h.engine.create_team(team("t1", "standard")).await.unwrap();
    let issued = h.engine.create_key("t1", key("alice")).await.unwrap();

    h.engine.delete_key_by_secret(&issued.secret).await.unwrap();
    let err = h
        .engine
        .delete_key_by_secret(&issued.secret)
        .await
        .unwrap_err();
    assert!(matches!(err, KeyforgeError::NotFound(_)));
}

#[tokio::test]
async fn membership_is_rederived_after_removal() {
    let h = harness();
    h.engine.create_team(team("t1", "standard")).await.unwrap();
    h.engine.create_key("t1", key("alice")).await.unwrap();

    assert_eq!(h.engine.list_team_members("t1").await.unwrap().len(), 1);

    h.engine.remove_team_member("t1", "alice").await.unwrap();
    assert!(h.engine.list_team_members("t1").await.unwrap().is_empty());

    // With the team now empty again, a new user's first key bootstraps
    // membership once more.
    h.engine.create_key("t1", key("bob")).await.unwrap();
    let members = h.engine.list_team_members("t1").await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, "bob");
}

#[tokio::test]
async fn default_team_flow_without_policies() {
    let h = harness();
    h.engine.ensure_default_team().await.unwrap();

    let issued = h.engine.create_key("default", key("walk-in")).await.unwrap();
    assert_eq!(issued.key.tier, "standard");
    assert_eq!(h.policies.len().await, 0);

    // The derived member list picks the user up.
    let members = h.engine.list_team_members("default").await.unwrap();
    assert_eq!(members.len(), 1);
}

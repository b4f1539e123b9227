//! Tests for the in-memory stores

#[cfg(test)]
mod tests {
    use super::super::memory::{MemoryPolicyStore, MemoryStore};
    use super::super::types::{EntityRecord, LabelSelector};
    use super::super::{EntityStore, PolicyStore};
    use crate::core::policy::{
        CounterExpr, LimitRule, PolicyKind, PolicyObject, PolicySpec, RateEntry, TargetRef,
        WhenPredicate,
    };
    use crate::utils::error::KeyforgeError;
    use std::collections::BTreeMap;

    fn record(name: &str, team: &str) -> EntityRecord {
        EntityRecord::new(name)
            .label("keyforge/team-id", team)
            .annotation("keyforge/note", "test")
            .data_entry("payload", "value")
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();
        let created = store.create(record("r1", "t1")).await.unwrap();
        assert!(created.version.is_some());

        let fetched = store.get("r1").await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_if_absent_races_have_one_winner() {
        let store = MemoryStore::new();
        store.create(record("r1", "t1")).await.unwrap();
        let err = store.create(record("r1", "t1")).await.unwrap_err();
        assert!(matches!(err, KeyforgeError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_requires_current_version() {
        let store = MemoryStore::new();
        let created = store.create(record("r1", "t1")).await.unwrap();

        let mut fresh = created.clone();
        fresh.annotations.insert("keyforge/note".into(), "new".into());
        let updated = store.update(fresh).await.unwrap();
        assert_ne!(updated.version, created.version);

        // Re-using the stale version token loses the race.
        let mut stale = created;
        stale.annotations.insert("keyforge/note".into(), "old".into());
        let err = store.update(stale).await.unwrap_err();
        assert!(matches!(err, KeyforgeError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = MemoryStore::new();
        let err = store.update(record("ghost", "t1")).await.unwrap_err();
        assert!(matches!(err, KeyforgeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        store.create(record("r1", "t1")).await.unwrap();
        store.delete("r1").await.unwrap();
        let err = store.delete("r1").await.unwrap_err();
        assert!(matches!(err, KeyforgeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_by_selector() {
        let store = MemoryStore::new();
        store.create(record("r1", "t1")).await.unwrap();
        store.create(record("r2", "t1")).await.unwrap();
        store.create(record("r3", "t2")).await.unwrap();

        let selector = LabelSelector::new().with("keyforge/team-id", "t1");
        let matched = store.list(&selector).await.unwrap();
        assert_eq!(matched.len(), 2);
        // Deterministic name order.
        assert_eq!(matched[0].name, "r1");
        assert_eq!(matched[1].name, "r2");

        let all = store.list(&LabelSelector::new()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_by_selector_returns_count() {
        let store = MemoryStore::new();
        store.create(record("r1", "t1")).await.unwrap();
        store.create(record("r2", "t1")).await.unwrap();
        store.create(record("r3", "t2")).await.unwrap();

        let selector = LabelSelector::new().with("keyforge/team-id", "t1");
        assert_eq!(store.delete_by_selector(&selector).await.unwrap(), 2);
        assert_eq!(store.len().await, 1);
        // Deleting again matches nothing.
        assert_eq!(store.delete_by_selector(&selector).await.unwrap(), 0);
    }

    #[test]
    fn test_selector_query_rendering() {
        let selector = LabelSelector::new()
            .with("keyforge/team-id", "t1")
            .with("keyforge/user-id", "alice");
        assert_eq!(
            selector.to_query(),
            "keyforge/team-id=t1,keyforge/user-id=alice"
        );
    }

    fn policy(name: &str) -> PolicyObject {
        let mut limits = BTreeMap::new();
        limits.insert(
            "team-t1-tokens".to_string(),
            LimitRule {
                rates: vec![RateEntry {
                    limit: 100,
                    window: "1m".to_string(),
                }],
                counters: vec![CounterExpr {
                    expression: "auth.identity.userid".to_string(),
                }],
                when: vec![WhenPredicate {
                    predicate: "true".to_string(),
                }],
            },
        );
        PolicyObject {
            kind: PolicyKind::TokenRate,
            name: name.to_string(),
            team_id: "t1".to_string(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            spec: PolicySpec {
                target: TargetRef::gateway("inference-gateway"),
                limits,
            },
            uid: None,
            version: None,
        }
    }

    #[tokio::test]
    async fn test_policy_store_create_conflict_and_update() {
        let store = MemoryPolicyStore::new();
        store.create(&policy("p1")).await.unwrap();

        let err = store.create(&policy("p1")).await.unwrap_err();
        assert!(matches!(err, KeyforgeError::Conflict(_)));

        // The upsert path: fetch, carry version forward, update.
        let existing = store
            .get(PolicyKind::TokenRate, "p1")
            .await
            .unwrap()
            .unwrap();
        assert!(existing.uid.is_some());
        let mut replacement = policy("p1");
        replacement.uid = existing.uid.clone();
        replacement.version = existing.version.clone();
        store.update(&replacement).await.unwrap();

        // Updating with the stale token fails.
        let err = store.update(&replacement).await.unwrap_err();
        assert!(matches!(err, KeyforgeError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_policy_store_delete() {
        let store = MemoryPolicyStore::new();
        store.create(&policy("p1")).await.unwrap();
        store.delete(PolicyKind::TokenRate, "p1").await.unwrap();
        let err = store.delete(PolicyKind::TokenRate, "p1").await.unwrap_err();
        assert!(matches!(err, KeyforgeError::NotFound(_)));
    }
}

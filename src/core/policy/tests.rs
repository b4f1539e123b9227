//! Tests for policy publication

#[cfg(test)]
mod tests {
    use super::super::publisher::PolicyPublisher;
    use super::super::types::{CounterScope, PolicyKind};
    use crate::core::tiers::{LimitOverrides, LimitResolver, Tier};
    use crate::storage::{MemoryPolicyStore, PolicyStore};
    use std::sync::Arc;

    fn publisher() -> (PolicyPublisher, Arc<MemoryPolicyStore>) {
        let store = Arc::new(MemoryPolicyStore::new());
        let publisher = PolicyPublisher::new(store.clone(), "inference-gateway", "default");
        (publisher, store)
    }

    fn standard_limits() -> crate::core::tiers::EffectiveLimits {
        LimitResolver::new(Tier::Standard).resolve("standard", &LimitOverrides::default())
    }

    #[tokio::test]
    async fn test_publish_creates_both_kinds() {
        let (publisher, store) = publisher();
        publisher
            .publish_all("t1", &standard_limits())
            .await
            .unwrap();

        assert_eq!(store.len().await, 2);
        let token = store
            .get(PolicyKind::TokenRate, "team-t1-token-limits")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(token.team_id, "t1");
        let rule = token.spec.limits.get("team-t1-tokens").unwrap();
        assert_eq!(rule.rates[0].limit, 10_000);
        assert_eq!(rule.rates[0].window, "1m");
        assert_eq!(rule.counters[0].expression, "auth.identity.userid");
        assert!(rule.when[0].predicate.contains("\"t1\""));
    }

    #[tokio::test]
    async fn test_unlimited_tier_publishes_nothing() {
        let (publisher, store) = publisher();
        let limits = LimitResolver::new(Tier::Standard)
            .resolve("unlimited", &LimitOverrides::default());
        publisher.publish_all("t1", &limits).await.unwrap();
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_default_team_publishes_nothing() {
        let (publisher, store) = publisher();
        publisher
            .publish_all("default", &standard_limits())
            .await
            .unwrap();
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_second_publish_takes_update_branch() {
        let (publisher, store) = publisher();
        publisher
            .publish_all("t1", &standard_limits())
            .await
            .unwrap();
        publisher
            .publish_all("t1", &standard_limits())
            .await
            .unwrap();

        // Still exactly one object per kind; the bumped version proves the
        // second pass went through get-then-update rather than create.
        assert_eq!(store.len().await, 2);
        let token = store
            .get(PolicyKind::TokenRate, "team-t1-token-limits")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(token.version.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_team_aggregate_counter() {
        let (publisher, store) = publisher();
        publisher
            .publish(
                "t1",
                PolicyKind::TokenRate,
                &standard_limits(),
                CounterScope::TeamAggregate,
            )
            .await
            .unwrap();
        let token = store
            .get(PolicyKind::TokenRate, "team-t1-token-limits")
            .await
            .unwrap()
            .unwrap();
        let rule = token.spec.limits.get("team-t1-tokens").unwrap();
        assert_eq!(rule.counters[0].expression, "\"t1\"");
    }

    #[tokio::test]
    async fn test_retract_is_silent_on_missing_policies() {
        let (publisher, store) = publisher();
        // Nothing was ever published; retraction must not error.
        publisher.retract("ghost-team").await;
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_retract_removes_published_policies() {
        let (publisher, store) = publisher();
        publisher
            .publish_all("t1", &standard_limits())
            .await
            .unwrap();
        publisher.retract("t1").await;
        assert_eq!(store.len().await, 0);
    }
}

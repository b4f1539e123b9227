//! Tier limit resolution

use super::types::{EffectiveLimits, LimitOverrides, Tier};
use tracing::warn;

/// Resolves a tier name plus explicit overrides into an effective limit set.
///
/// The default tier is fixed at construction and validated against the
/// catalog at startup, so the unknown-tier fallback can never loop.
#[derive(Debug, Clone)]
pub struct LimitResolver {
    default_tier: Tier,
}

impl LimitResolver {
    pub fn new(default_tier: Tier) -> Self {
        Self { default_tier }
    }

    pub fn default_tier(&self) -> Tier {
        self.default_tier
    }

    /// Resolve a tier name to a catalog entry.
    ///
    /// An empty name means "use the default"; an unknown name degrades to
    /// the default with a warning rather than failing the request.
    pub fn resolve_tier(&self, tier_name: &str) -> Tier {
        if tier_name.is_empty() {
            return self.default_tier;
        }
        match Tier::parse(tier_name) {
            Some(tier) => tier,
            None => {
                warn!(
                    "Unknown tier '{}', falling back to default tier: {}",
                    tier_name, self.default_tier
                );
                self.default_tier
            }
        }
    }

    /// Resolve tier defaults and apply overrides.
    ///
    /// Only positive numeric overrides and non-empty window overrides
    /// apply; everything else keeps the tier default, including the
    /// unlimited sentinel. A generic time-window override sets both
    /// windows unless a kind-specific window is supplied.
    pub fn resolve(&self, tier_name: &str, overrides: &LimitOverrides) -> EffectiveLimits {
        let tier = self.resolve_tier(tier_name);
        let mut limits = tier.limits();

        if let Some(token_limit) = overrides.token_limit {
            if token_limit > 0 {
                limits.token_limit = token_limit;
            }
        }
        if let Some(request_limit) = overrides.request_limit {
            if request_limit > 0 {
                limits.request_limit = request_limit;
            }
        }
        if let Some(window) = overrides.time_window.as_deref() {
            if !window.is_empty() {
                limits.token_window = window.to_string();
                limits.request_window = window.to_string();
            }
        }
        if let Some(window) = overrides.token_window.as_deref() {
            if !window.is_empty() {
                limits.token_window = window.to_string();
            }
        }
        if let Some(window) = overrides.request_window.as_deref() {
            if !window.is_empty() {
                limits.request_window = window.to_string();
            }
        }

        limits
    }
}

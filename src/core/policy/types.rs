//! Enforcement policy object types
//!
//! These are the declarative artifacts handed to the external gateway
//! controller. They are derived state: everything here can be recomputed
//! from the current team and key records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The two enforcement policy kinds, each an independently upsertable
/// object per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Token-consumption rate policy
    TokenRate,
    /// Request-count rate policy
    RequestRate,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 2] = [PolicyKind::TokenRate, PolicyKind::RequestRate];

    /// Deterministic object name for a team's policy of this kind.
    pub fn policy_name(&self, team_id: &str) -> String {
        match self {
            PolicyKind::TokenRate => format!("team-{}-token-limits", team_id),
            PolicyKind::RequestRate => format!("team-{}-request-limits", team_id),
        }
    }

    /// Name of the limit rule inside the policy spec.
    pub fn rule_name(&self, team_id: &str) -> String {
        match self {
            PolicyKind::TokenRate => format!("team-{}-tokens", team_id),
            PolicyKind::RequestRate => format!("team-{}-requests", team_id),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::TokenRate => f.write_str("token-rate"),
            PolicyKind::RequestRate => f.write_str("request-rate"),
        }
    }
}

/// Whether a limit counts per caller or per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterScope {
    /// One counter per authenticated user, scoped to the team predicate
    #[default]
    PerUser,
    /// A single counter shared by the whole team
    TeamAggregate,
}

/// A declarative enforcement policy object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyObject {
    /// Policy kind (selects the external resource type)
    pub kind: PolicyKind,
    /// Deterministic object name
    pub name: String,
    /// Team this policy targets
    pub team_id: String,
    /// Labels carried on the object
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Annotations carried on the object
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Policy body
    pub spec: PolicySpec,
    /// Opaque identity token assigned by the policy store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Opaque version token required for updates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Policy spec: what to attach to and which limits to enforce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySpec {
    /// The gateway object the policy attaches to
    #[serde(rename = "targetRef")]
    pub target: TargetRef,
    /// Named limit rules
    pub limits: BTreeMap<String, LimitRule>,
}

/// Reference to the gateway the policy attaches to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRef {
    pub group: String,
    pub kind: String,
    pub name: String,
}

impl TargetRef {
    /// Standard gateway-API target for a named gateway.
    pub fn gateway(name: impl Into<String>) -> Self {
        Self {
            group: "gateway.networking.k8s.io".to_string(),
            kind: "Gateway".to_string(),
            name: name.into(),
        }
    }
}

/// One limit rule: rate/window entries, counting keys, and guard
/// predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitRule {
    pub rates: Vec<RateEntry>,
    pub counters: Vec<CounterExpr>,
    pub when: Vec<WhenPredicate>,
}

/// A limit over a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub limit: i64,
    pub window: String,
}

/// Counting-key expression evaluated by the gateway per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterExpr {
    pub expression: String,
}

/// Guard predicate restricting which requests a rule applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenPredicate {
    pub predicate: String,
}

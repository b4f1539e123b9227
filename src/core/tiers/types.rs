//! Tier catalog and limit types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel meaning "no limit" on any numeric limit field.
pub const UNLIMITED: i64 = -1;

/// The fixed tier catalog.
///
/// Tiers are read-only configuration; an unknown tier name never becomes a
/// variant here, it falls back to the configured default at resolve time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Free,
    Standard,
    Premium,
    Unlimited,
}

impl Tier {
    /// All known tiers, in ascending order of capability.
    pub const ALL: [Tier; 4] = [Tier::Free, Tier::Standard, Tier::Premium, Tier::Unlimited];

    /// Parse a tier name; `None` for anything outside the catalog.
    pub fn parse(name: &str) -> Option<Tier> {
        match name {
            "free" => Some(Tier::Free),
            "standard" => Some(Tier::Standard),
            "premium" => Some(Tier::Premium),
            "unlimited" => Some(Tier::Unlimited),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Standard => "standard",
            Tier::Premium => "premium",
            Tier::Unlimited => "unlimited",
        }
    }

    /// Default limits for this tier.
    pub fn limits(&self) -> EffectiveLimits {
        match self {
            Tier::Free => EffectiveLimits {
                tier: self.as_str().to_string(),
                token_limit: 2_000,
                token_window: "1m".to_string(),
                request_limit: 60,
                request_window: "1m".to_string(),
                models_allowed: vec!["simulator-model".to_string()],
            },
            Tier::Standard => EffectiveLimits {
                tier: self.as_str().to_string(),
                token_limit: 10_000,
                token_window: "1m".to_string(),
                request_limit: 120,
                request_window: "1m".to_string(),
                models_allowed: vec![
                    "simulator-model".to_string(),
                    "qwen3-0-6b-instruct".to_string(),
                ],
            },
            Tier::Premium => EffectiveLimits {
                tier: self.as_str().to_string(),
                token_limit: 50_000,
                token_window: "1m".to_string(),
                request_limit: 600,
                request_window: "1m".to_string(),
                models_allowed: vec![
                    "simulator-model".to_string(),
                    "qwen3-0-6b-instruct".to_string(),
                    "premium-models".to_string(),
                ],
            },
            Tier::Unlimited => EffectiveLimits {
                tier: self.as_str().to_string(),
                token_limit: UNLIMITED,
                token_window: "1h".to_string(),
                request_limit: UNLIMITED,
                request_window: "1h".to_string(),
                models_allowed: vec!["*".to_string()],
            },
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::parse(s).ok_or_else(|| format!("unknown tier: {}", s))
    }
}

/// Fully resolved limit set for one credential or team.
///
/// Always fully populated; `UNLIMITED` marks the absence of a numeric cap,
/// never a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveLimits {
    /// Tier the limits were derived from
    pub tier: String,
    /// Token budget per token window
    pub token_limit: i64,
    /// Time window for the token budget (e.g. "1m", "1h")
    pub token_window: String,
    /// Request budget per request window
    pub request_limit: i64,
    /// Time window for the request budget
    pub request_window: String,
    /// Model allow-list ("*" = all models)
    pub models_allowed: Vec<String>,
}

impl EffectiveLimits {
    /// Whether the token budget is uncapped.
    pub fn token_unlimited(&self) -> bool {
        self.token_limit == UNLIMITED
    }

    /// Whether the request budget is uncapped.
    pub fn request_unlimited(&self) -> bool {
        self.request_limit == UNLIMITED
    }
}

/// Optional per-team or per-key limit overrides.
///
/// Zero and negative values are treated as "no override"; an unlimited
/// default can only be replaced by an explicit positive number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitOverrides {
    /// Token budget override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_limit: Option<i64>,
    /// Request budget override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_limit: Option<i64>,
    /// Window override applied to both budgets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<String>,
    /// Kind-specific window overrides; take precedence over `time_window`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_window: Option<String>,
}

impl LimitOverrides {
    /// True when no field carries an applicable override.
    pub fn is_empty(&self) -> bool {
        !self.token_limit.is_some_and(|v| v > 0)
            && !self.request_limit.is_some_and(|v| v > 0)
            && !self.time_window.as_deref().is_some_and(|w| !w.is_empty())
            && !self.token_window.as_deref().is_some_and(|w| !w.is_empty())
            && !self.request_window.as_deref().is_some_and(|w| !w.is_empty())
    }
}

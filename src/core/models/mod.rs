//! Domain models
//!
//! Teams and API keys are stored as label-indexed records; membership is a
//! read-time projection over key records and has no storage of its own.

mod key;
mod member;
mod team;

pub use key::{KeyRecord, KeyStatus};
pub use member::Membership;
pub use team::Team;

/// Selector-queryable label keys carried on stored records.
pub mod labels {
    /// Record discriminator: `team-config`, `team-key` or `team-rate-limit`
    pub const RESOURCE_TYPE: &str = "keyforge/resource-type";
    /// Marks records owned by this service
    pub const MANAGED_BY: &str = "keyforge/managed-by";
    pub const TEAM_ID: &str = "keyforge/team-id";
    pub const USER_ID: &str = "keyforge/user-id";
    pub const TEAM_ROLE: &str = "keyforge/team-role";
    pub const TIER: &str = "keyforge/tier";
    /// Truncated fingerprint, the only queryable identity of a secret
    pub const KEY_FINGERPRINT: &str = "keyforge/key-sha256";

    pub const MANAGED_BY_VALUE: &str = "keyforge";
    pub const TYPE_TEAM_CONFIG: &str = "team-config";
    pub const TYPE_TEAM_KEY: &str = "team-key";
    pub const TYPE_TEAM_RATE_LIMIT: &str = "team-rate-limit";
}

/// Free-text annotation keys carried on stored records.
pub mod annotations {
    pub const DISPLAY_NAME: &str = "keyforge/display-name";
    pub const DESCRIPTION: &str = "keyforge/description";
    pub const DEFAULT_TIER: &str = "keyforge/default-tier";
    pub const TOKEN_LIMIT: &str = "keyforge/token-limit";
    pub const REQUEST_LIMIT: &str = "keyforge/request-limit";
    pub const TIME_WINDOW: &str = "keyforge/time-window";
    pub const MODELS_ALLOWED: &str = "keyforge/models-allowed";
    pub const STATUS: &str = "keyforge/status";
    pub const CREATED_AT: &str = "keyforge/created-at";
    pub const UPDATED_AT: &str = "keyforge/updated-at";
    pub const ALIAS: &str = "keyforge/alias";
    pub const CUSTOM_LIMITS: &str = "keyforge/custom-limits";
}

/// Parse an integer annotation, tolerating absence and garbage.
pub(crate) fn parse_i64(value: Option<&String>) -> i64 {
    value.and_then(|s| s.parse().ok()).unwrap_or(0)
}

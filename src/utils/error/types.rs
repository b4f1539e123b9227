//! Error types for keyforge

use thiserror::Error;

/// Result type alias for keyforge
pub type Result<T> = std::result::Result<T, KeyforgeError>;

/// Main error type for keyforge
///
/// Every request-time failure maps to exactly one of these variants; the
/// HTTP layer translates each variant to a stable error classification.
#[derive(Error, Debug)]
pub enum KeyforgeError {
    /// Configuration errors (startup-time only)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed identifier or unacceptable request field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced team or key does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate identifier on create, or a lost optimistic-concurrency race
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Key creation attempted by a user with no membership in the team
    #[error("Not a member: {0}")]
    NotAMember(String),

    /// Enforcement-policy upsert failed for a non-benign reason
    #[error("Policy publish failed: {0}")]
    Publish(String),

    /// Entity store errors
    #[error("Store error: {0}")]
    Store(String),

    /// Credential generation errors
    #[error("Credential generation failed: {0}")]
    Crypto(String),

    /// Admin authentication errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

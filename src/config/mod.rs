//! Configuration management
//!
//! Configuration loads from environment variables (the deployment path)
//! or a YAML file, then validates. The default-tier invariant is enforced
//! here: a default tier outside the catalog is a startup error, never a
//! request-time one.

use crate::core::tiers::Tier;
use crate::utils::error::{KeyforgeError, Result};
use crate::utils::validation::is_valid_dns_label;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[cfg(test)]
mod tests;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub gateway: GatewayConfig,
    pub limits: LimitsConfig,
    pub default_team: DefaultTeamConfig,
    pub auth: AuthConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Entity/policy store selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Namespace all records live in
    pub namespace: String,
    /// API server URL override (Kubernetes backend)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            namespace: "llm".to_string(),
            api_url: None,
        }
    }
}

/// Available store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// In-memory maps; development and tests
    #[default]
    Memory,
    /// Kubernetes Secrets and Kuadrant policies
    Kubernetes,
}

/// The gateway enforcement policies attach to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub name: String,
    pub namespace: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            name: "inference-gateway".to_string(),
            namespace: "llm".to_string(),
        }
    }
}

/// Limit resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Fallback tier; must exist in the tier catalog
    pub default_tier: String,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            default_tier: "standard".to_string(),
        }
    }
}

/// Reserved default-team settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultTeamConfig {
    /// Create the default team at startup
    pub create: bool,
    pub team_id: String,
    /// Tier for the default team; falls back to the default tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

impl Default for DefaultTeamConfig {
    fn default() -> Self {
        Self {
            create: true,
            team_id: "default".to_string(),
            tier: None,
        }
    }
}

/// Admin authentication settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Static admin key; `None` disables the check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_api_key: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| KeyforgeError::config(format!("failed to read config file: {}", e)))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| KeyforgeError::config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables on top of defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Some(port) = env_var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| KeyforgeError::config(format!("invalid PORT: {}", port)))?;
        }
        if let Some(host) = env_var("HOST") {
            config.server.host = host;
        }
        if let Some(backend) = env_var("STORE_BACKEND") {
            config.store.backend = match backend.as_str() {
                "memory" => StoreBackend::Memory,
                "kubernetes" => StoreBackend::Kubernetes,
                other => {
                    return Err(KeyforgeError::config(format!(
                        "invalid STORE_BACKEND: {}",
                        other
                    )));
                }
            };
        }
        if let Some(namespace) = env_var("KEY_NAMESPACE") {
            config.store.namespace = namespace;
        }
        config.store.api_url = env_var("KUBE_API_URL");
        if let Some(name) = env_var("GATEWAY_NAME") {
            config.gateway.name = name;
        }
        if let Some(namespace) = env_var("GATEWAY_NAMESPACE") {
            config.gateway.namespace = namespace;
        }
        if let Some(tier) = env_var("DEFAULT_TIER") {
            config.limits.default_tier = tier;
        }
        if let Some(create) = env_var("CREATE_DEFAULT_TEAM") {
            config.default_team.create = create == "true";
        }
        if let Some(team_id) = env_var("DEFAULT_TEAM_ID") {
            config.default_team.team_id = team_id;
        }
        config.default_team.tier = env_var("DEFAULT_TEAM_TIER");
        config.auth.admin_api_key = env_var("ADMIN_API_KEY");

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration. Startup-time invariants live here.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(KeyforgeError::config("server port must be non-zero"));
        }
        if !is_valid_dns_label(&self.store.namespace) {
            return Err(KeyforgeError::config(format!(
                "store namespace is not a valid DNS label: {}",
                self.store.namespace
            )));
        }
        if !is_valid_dns_label(&self.default_team.team_id) {
            return Err(KeyforgeError::config(format!(
                "default team id is not a valid DNS label: {}",
                self.default_team.team_id
            )));
        }
        // The unknown-tier fallback relies on the default tier existing in
        // the catalog; anything else is a configuration error.
        if Tier::parse(&self.limits.default_tier).is_none() {
            return Err(KeyforgeError::config(format!(
                "default tier is not in the tier catalog: {}",
                self.limits.default_tier
            )));
        }
        if let Some(tier) = &self.default_team.tier {
            if Tier::parse(tier).is_none() {
                return Err(KeyforgeError::config(format!(
                    "default team tier is not in the tier catalog: {}",
                    tier
                )));
            }
        }
        Ok(())
    }

    /// The validated default tier.
    pub fn default_tier(&self) -> Result<Tier> {
        Tier::parse(&self.limits.default_tier).ok_or_else(|| {
            KeyforgeError::config(format!(
                "default tier is not in the tier catalog: {}",
                self.limits.default_tier
            ))
        })
    }

    /// Tier for the default team; falls back to the default tier.
    pub fn default_team_tier(&self) -> Result<Tier> {
        match &self.default_team.tier {
            Some(tier) => Tier::parse(tier).ok_or_else(|| {
                KeyforgeError::config(format!(
                    "default team tier is not in the tier catalog: {}",
                    tier
                ))
            }),
            None => self.default_tier(),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

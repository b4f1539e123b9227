//! Tests for configuration loading and validation

#[cfg(test)]
mod tests {
    use super::super::{Config, StoreBackend};
    use crate::core::tiers::Tier;
    use crate::utils::error::KeyforgeError;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.default_tier().unwrap(), Tier::Standard);
        assert!(config.default_team.create);
    }

    #[test]
    fn test_unknown_default_tier_fails_at_startup() {
        let mut config = Config::default();
        config.limits.default_tier = "platinum".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, KeyforgeError::Config(_)));
    }

    #[test]
    fn test_invalid_default_team_id_rejected() {
        let mut config = Config::default();
        config.default_team.team_id = "Not-Valid!".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_team_tier_falls_back_to_default_tier() {
        let mut config = Config::default();
        config.limits.default_tier = "premium".to_string();
        assert_eq!(config.default_team_tier().unwrap(), Tier::Premium);

        config.default_team.tier = Some("free".to_string());
        assert_eq!(config.default_team_tier().unwrap(), Tier::Free);
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_from_file_with_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 9999\nlimits:\n  default_tier: premium\nstore:\n  backend: kubernetes\n  namespace: maas\n"
        )
        .unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.default_tier().unwrap(), Tier::Premium);
        assert_eq!(config.store.backend, StoreBackend::Kubernetes);
        assert_eq!(config.store.namespace, "maas");
        // Unspecified sections keep their defaults.
        assert_eq!(config.gateway.name, "inference-gateway");
    }

    #[tokio::test]
    async fn test_from_file_with_bad_tier_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limits:\n  default_tier: mythril\n").unwrap();
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, KeyforgeError::Config(_)));
    }

    #[tokio::test]
    async fn test_from_missing_file_fails() {
        let err = Config::from_file("/definitely/not/here.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, KeyforgeError::Config(_)));
    }
}

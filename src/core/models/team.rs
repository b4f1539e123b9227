//! Team model and record encoding

use super::{annotations, labels, parse_i64};
use crate::core::tiers::LimitOverrides;
use crate::storage::EntityRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A team: the unit that policies target and keys belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Immutable, globally unique identifier (DNS-label-safe)
    pub team_id: String,
    /// Human-readable name
    pub display_name: String,
    pub description: String,
    /// Assigned tier name
    pub tier: String,
    /// Explicit limit overrides recorded at creation
    pub overrides: LimitOverrides,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Deterministic record name for a team.
    pub fn record_name(team_id: &str) -> String {
        format!("team-{}-config", team_id)
    }

    /// Encode into a store record.
    pub fn to_record(&self) -> EntityRecord {
        let overrides = &self.overrides;
        EntityRecord::new(Self::record_name(&self.team_id))
            .label(labels::RESOURCE_TYPE, labels::TYPE_TEAM_CONFIG)
            .label(labels::TEAM_ID, &self.team_id)
            .label(labels::TIER, &self.tier)
            .annotation(annotations::DISPLAY_NAME, &self.display_name)
            .annotation(annotations::DESCRIPTION, &self.description)
            .annotation(annotations::DEFAULT_TIER, &self.tier)
            .annotation(
                annotations::TOKEN_LIMIT,
                overrides.token_limit.unwrap_or(0).to_string(),
            )
            .annotation(
                annotations::REQUEST_LIMIT,
                overrides.request_limit.unwrap_or(0).to_string(),
            )
            .annotation(
                annotations::TIME_WINDOW,
                overrides.time_window.clone().unwrap_or_default(),
            )
            .annotation(annotations::CREATED_AT, self.created_at.to_rfc3339())
            .data_entry("team_id", &self.team_id)
    }

    /// Decode from a store record.
    pub fn from_record(record: &EntityRecord) -> Team {
        let team_id = record
            .labels
            .get(labels::TEAM_ID)
            .cloned()
            .unwrap_or_default();
        let token_limit = parse_i64(record.annotations.get(annotations::TOKEN_LIMIT));
        let request_limit = parse_i64(record.annotations.get(annotations::REQUEST_LIMIT));
        let time_window = record
            .annotations
            .get(annotations::TIME_WINDOW)
            .cloned()
            .unwrap_or_default();

        Team {
            team_id,
            display_name: record
                .annotations
                .get(annotations::DISPLAY_NAME)
                .cloned()
                .unwrap_or_default(),
            description: record
                .annotations
                .get(annotations::DESCRIPTION)
                .cloned()
                .unwrap_or_default(),
            tier: record
                .annotations
                .get(annotations::DEFAULT_TIER)
                .cloned()
                .unwrap_or_default(),
            overrides: LimitOverrides {
                token_limit: (token_limit > 0).then_some(token_limit),
                request_limit: (request_limit > 0).then_some(request_limit),
                time_window: (!time_window.is_empty()).then_some(time_window),
                token_window: None,
                request_window: None,
            },
            created_at: record
                .annotations
                .get(annotations::CREATED_AT)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_name() {
        assert_eq!(Team::record_name("ml-research"), "team-ml-research-config");
    }

    #[test]
    fn test_record_round_trip() {
        let team = Team {
            team_id: "t1".to_string(),
            display_name: "Team One".to_string(),
            description: "first team".to_string(),
            tier: "premium".to_string(),
            overrides: LimitOverrides {
                token_limit: Some(42_000),
                time_window: Some("1h".to_string()),
                ..Default::default()
            },
            created_at: Utc::now(),
        };

        let record = team.to_record();
        assert_eq!(record.name, "team-t1-config");
        assert_eq!(
            record.labels.get(labels::RESOURCE_TYPE).map(String::as_str),
            Some(labels::TYPE_TEAM_CONFIG)
        );

        let decoded = Team::from_record(&record);
        assert_eq!(decoded.team_id, team.team_id);
        assert_eq!(decoded.tier, team.tier);
        assert_eq!(decoded.overrides.token_limit, Some(42_000));
        assert_eq!(decoded.overrides.request_limit, None);
        assert_eq!(decoded.overrides.time_window.as_deref(), Some("1h"));
    }

    #[test]
    fn test_zero_overrides_decode_as_absent() {
        let team = Team {
            team_id: "t2".to_string(),
            display_name: "Team Two".to_string(),
            description: String::new(),
            tier: "free".to_string(),
            overrides: LimitOverrides::default(),
            created_at: Utc::now(),
        };

        let decoded = Team::from_record(&team.to_record());
        assert!(decoded.overrides.is_empty());
    }
}

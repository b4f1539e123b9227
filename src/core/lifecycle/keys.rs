//! API key lifecycle operations

use super::manager::LifecycleManager;
use super::requests::{CreateKeyRequest, UpdateKeyRequest};
use super::types::IssuedKey;
use crate::core::credentials;
use crate::core::models::{KeyRecord, KeyStatus, annotations, labels};
use crate::core::tiers::EffectiveLimits;
use crate::storage::LabelSelector;
use crate::utils::error::{KeyforgeError, Result};
use crate::utils::validation::validate_user_id;
use chrono::Utc;
use tracing::{debug, info};

impl LifecycleManager {
    /// Issue a new API key for a team member.
    ///
    /// For the reserved default team, membership is synthesized. For every
    /// other team it is derived from existing keys, so issuing the first
    /// key of an empty team establishes membership; once a team has keys,
    /// a user without one is rejected. Request-level overrides win over
    /// membership-derived limits.
    pub async fn create_key(&self, team_id: &str, request: CreateKeyRequest) -> Result<IssuedKey> {
        validate_user_id(&request.user_id)?;
        let team = self.require_team(team_id).await?;

        let member = if team_id == self.settings.default_team_id {
            self.synthesize_default_membership(&request.user_id)
        } else {
            match self.find_membership(team_id, &request.user_id).await? {
                Some(member) => member,
                None => {
                    // The team's very first key establishes membership at
                    // the team's configured limits; once the team has any
                    // keys, a user without one is not a member.
                    let existing = self
                        .entities
                        .list(&Self::team_keys_selector(team_id))
                        .await?;
                    if !existing.is_empty() {
                        return Err(KeyforgeError::not_a_member(format!(
                            "user {} is not a member of team {}",
                            request.user_id, team_id
                        )));
                    }
                    self.bootstrap_membership(&team, &request.user_id)
                }
            }
        };

        let credential = credentials::generate(self.settings.secret_bytes)?;

        let token_limit = request
            .overrides
            .token_limit
            .filter(|v| *v > 0)
            .unwrap_or(member.token_limit);
        let request_limit = request
            .overrides
            .request_limit
            .filter(|v| *v > 0)
            .unwrap_or(member.request_limit);
        let time_window = request
            .overrides
            .time_window
            .clone()
            .filter(|w| !w.is_empty())
            .unwrap_or_else(|| member.time_window.clone());
        let models_allowed = if request.models.is_empty() {
            member.models.clone()
        } else {
            request.models.clone()
        };

        let key = KeyRecord {
            name: KeyRecord::record_name(&request.user_id, team_id, credential.name_prefix()),
            user_id: request.user_id.clone(),
            team_id: team_id.to_string(),
            role: member.role.clone(),
            tier: member.tier.clone(),
            token_limit,
            request_limit,
            time_window,
            models_allowed,
            status: KeyStatus::Active,
            alias: request.alias.clone(),
            custom_limits: request.custom_limits.clone(),
            fingerprint: credential.fingerprint.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };

        self.entities.create(key.to_record(&credential.secret)).await?;

        // Team policies apply to the new key through its team label; no
        // per-key policy object is published.
        info!(
            "API key issued for user {} in team {}: {}",
            key.user_id, key.team_id, key.name
        );

        let effective_limits = EffectiveLimits {
            tier: key.tier.clone(),
            token_limit: key.token_limit,
            token_window: key.time_window.clone(),
            request_limit: key.request_limit,
            request_window: key.time_window.clone(),
            models_allowed: key.models_allowed.clone(),
        };

        Ok(IssuedKey {
            secret: credential.secret,
            fingerprint: credential.fingerprint,
            effective_limits,
            key,
        })
    }

    /// Update mutable fields of a key record in place.
    ///
    /// Identity fields (team, user, fingerprint, secret) never change; a
    /// new secret is a new record.
    pub async fn update_key(&self, key_name: &str, request: UpdateKeyRequest) -> Result<KeyRecord> {
        if request.is_empty() {
            return Err(KeyforgeError::validation("no valid updates provided"));
        }

        let mut record = self
            .entities
            .get(key_name)
            .await?
            .filter(|record| {
                record.labels.get(labels::RESOURCE_TYPE).map(String::as_str)
                    == Some(labels::TYPE_TEAM_KEY)
            })
            .ok_or_else(|| KeyforgeError::not_found(format!("API key {} not found", key_name)))?;

        if let Some(token_limit) = request.token_limit {
            record
                .annotations
                .insert(annotations::TOKEN_LIMIT.to_string(), token_limit.to_string());
        }
        if let Some(request_limit) = request.request_limit {
            record.annotations.insert(
                annotations::REQUEST_LIMIT.to_string(),
                request_limit.to_string(),
            );
        }
        if let Some(window) = request.time_window {
            record
                .annotations
                .insert(annotations::TIME_WINDOW.to_string(), window);
        }
        if let Some(status) = request.status {
            record
                .annotations
                .insert(annotations::STATUS.to_string(), status.as_str().to_string());
        }
        if let Some(alias) = request.alias {
            record
                .annotations
                .insert(annotations::ALIAS.to_string(), alias);
        }
        record.annotations.insert(
            annotations::UPDATED_AT.to_string(),
            Utc::now().to_rfc3339(),
        );

        let updated = self.entities.update(record).await?;
        info!("API key updated: {}", key_name);
        Ok(KeyRecord::from_record(&updated))
    }

    /// Delete a key by its exact record name.
    pub async fn delete_key_by_name(&self, key_name: &str) -> Result<()> {
        let record = self
            .entities
            .get(key_name)
            .await?
            .ok_or_else(|| KeyforgeError::not_found(format!("API key {} not found", key_name)))?;

        if record.labels.get(labels::TEAM_ID).is_none() {
            return Err(KeyforgeError::validation(format!(
                "record {} is not a team API key",
                key_name
            )));
        }

        self.entities.delete(key_name).await?;
        info!("API key deleted: {}", key_name);
        Ok(())
    }

    /// Delete a key by its presented secret.
    ///
    /// The fingerprint is recomputed and used as the lookup identity; the
    /// secret itself is never queried.
    pub async fn delete_key_by_secret(&self, secret: &str) -> Result<()> {
        let fingerprint = credentials::fingerprint(secret);
        let selector = LabelSelector::new()
            .with(labels::MANAGED_BY, labels::MANAGED_BY_VALUE)
            .with(labels::KEY_FINGERPRINT, &fingerprint);

        let matches = self.entities.list(&selector).await?;
        let record = matches
            .first()
            .ok_or_else(|| KeyforgeError::not_found("API key not found"))?;
        if matches.len() > 1 {
            debug!(
                "Fingerprint {} matched {} records, deleting the first",
                fingerprint,
                matches.len()
            );
        }

        self.entities.delete(&record.name).await?;
        info!("API key deleted by secret: {}", record.name);
        Ok(())
    }
}

//! In-memory store implementations
//!
//! Map-of-maps stand-ins for the external stores, satisfying the same
//! contracts including create-if-absent conflicts and version-checked
//! updates. Used by tests and local development.

use super::types::{EntityRecord, LabelSelector};
use super::{EntityStore, PolicyStore};
use crate::core::policy::{PolicyKind, PolicyObject};
use crate::utils::error::{KeyforgeError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// In-memory entity store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, EntityRecord>>,
    revision: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_version(&self) -> String {
        (self.revision.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    /// Number of stored records (test helper).
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create(&self, mut record: EntityRecord) -> Result<EntityRecord> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.name) {
            return Err(KeyforgeError::conflict(format!(
                "record {} already exists",
                record.name
            )));
        }
        record.version = Some(self.next_version());
        records.insert(record.name.clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, name: &str) -> Result<Option<EntityRecord>> {
        Ok(self.records.read().await.get(name).cloned())
    }

    async fn update(&self, mut record: EntityRecord) -> Result<EntityRecord> {
        let mut records = self.records.write().await;
        let existing = records.get(&record.name).ok_or_else(|| {
            KeyforgeError::not_found(format!("record {} does not exist", record.name))
        })?;
        if record.version != existing.version {
            return Err(KeyforgeError::conflict(format!(
                "record {} was modified concurrently",
                record.name
            )));
        }
        record.version = Some(self.next_version());
        records.insert(record.name.clone(), record.clone());
        Ok(record)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let mut records = self.records.write().await;
        records
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| KeyforgeError::not_found(format!("record {} does not exist", name)))
    }

    async fn delete_by_selector(&self, selector: &LabelSelector) -> Result<u64> {
        let mut records = self.records.write().await;
        let doomed: Vec<String> = records
            .values()
            .filter(|record| selector.matches(&record.labels))
            .map(|record| record.name.clone())
            .collect();
        for name in &doomed {
            records.remove(name);
        }
        Ok(doomed.len() as u64)
    }

    async fn list(&self, selector: &LabelSelector) -> Result<Vec<EntityRecord>> {
        let records = self.records.read().await;
        let mut matched: Vec<EntityRecord> = records
            .values()
            .filter(|record| selector.matches(&record.labels))
            .cloned()
            .collect();
        // Deterministic order for scan-derived results.
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matched)
    }
}

/// In-memory policy store.
#[derive(Debug, Default)]
pub struct MemoryPolicyStore {
    policies: RwLock<HashMap<(PolicyKind, String), PolicyObject>>,
    revision: AtomicU64,
}

impl MemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_version(&self) -> String {
        (self.revision.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    /// Number of stored policy objects (test helper).
    pub async fn len(&self) -> usize {
        self.policies.read().await.len()
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn create(&self, policy: &PolicyObject) -> Result<()> {
        let mut policies = self.policies.write().await;
        let key = (policy.kind, policy.name.clone());
        if policies.contains_key(&key) {
            return Err(KeyforgeError::conflict(format!(
                "policy {} already exists",
                policy.name
            )));
        }
        let version = self.next_version();
        let mut stored = policy.clone();
        stored.uid = Some(format!("uid-{}", version));
        stored.version = Some(version);
        policies.insert(key, stored);
        Ok(())
    }

    async fn get(&self, kind: PolicyKind, name: &str) -> Result<Option<PolicyObject>> {
        Ok(self
            .policies
            .read()
            .await
            .get(&(kind, name.to_string()))
            .cloned())
    }

    async fn update(&self, policy: &PolicyObject) -> Result<()> {
        let mut policies = self.policies.write().await;
        let key = (policy.kind, policy.name.clone());
        let existing = policies.get(&key).ok_or_else(|| {
            KeyforgeError::not_found(format!("policy {} does not exist", policy.name))
        })?;
        if policy.version != existing.version {
            return Err(KeyforgeError::conflict(format!(
                "policy {} was modified concurrently",
                policy.name
            )));
        }
        let mut stored = policy.clone();
        stored.version = Some(self.next_version());
        policies.insert(key, stored);
        Ok(())
    }

    async fn delete(&self, kind: PolicyKind, name: &str) -> Result<()> {
        let mut policies = self.policies.write().await;
        policies
            .remove(&(kind, name.to_string()))
            .map(|_| ())
            .ok_or_else(|| KeyforgeError::not_found(format!("policy {} does not exist", name)))
    }
}

//! External store adapters
//!
//! The engine persists nothing itself: teams and API keys live in a
//! label-indexed entity store, enforcement policies in a declarative
//! policy store. Both are abstract traits here, with an in-memory
//! implementation for tests and development and a Kubernetes-backed
//! implementation for production.

mod kubernetes;
mod memory;
mod types;

#[cfg(test)]
mod tests;

pub use kubernetes::{KubePolicyStore, KubeSettings, KubeStore};
pub use memory::{MemoryPolicyStore, MemoryStore};
pub use types::{EntityRecord, LabelSelector};

use crate::core::policy::{PolicyKind, PolicyObject};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Label-indexed record store.
///
/// Create-if-absent is the only cross-caller coordination primitive: two
/// concurrent creates of the same name race and exactly one wins, the
/// loser sees a conflict error.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Create a record; `Conflict` if the name already exists.
    async fn create(&self, record: EntityRecord) -> Result<EntityRecord>;

    /// Fetch a record by exact name.
    async fn get(&self, name: &str) -> Result<Option<EntityRecord>>;

    /// Replace a record; the record's version token must match the stored
    /// one or the update fails with `Conflict`.
    async fn update(&self, record: EntityRecord) -> Result<EntityRecord>;

    /// Delete a record by exact name; `NotFound` if absent.
    async fn delete(&self, name: &str) -> Result<()>;

    /// Delete every record matching the selector; returns the count.
    async fn delete_by_selector(&self, selector: &LabelSelector) -> Result<u64>;

    /// List records matching the selector.
    async fn list(&self, selector: &LabelSelector) -> Result<Vec<EntityRecord>>;
}

/// Declarative enforcement-policy store.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Create a policy object; `Conflict` if the name already exists.
    async fn create(&self, policy: &PolicyObject) -> Result<()>;

    /// Fetch a policy object with its current identity/version metadata.
    async fn get(&self, kind: PolicyKind, name: &str) -> Result<Option<PolicyObject>>;

    /// Replace a policy object; requires the current version metadata on
    /// the passed object.
    async fn update(&self, policy: &PolicyObject) -> Result<()>;

    /// Delete a policy object; `NotFound` if absent.
    async fn delete(&self, kind: PolicyKind, name: &str) -> Result<()>;
}

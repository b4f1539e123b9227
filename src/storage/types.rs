//! Entity store record types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A label-indexed record in the external entity store.
///
/// The shape mirrors what a Kubernetes Secret carries: exact-match labels,
/// free-text annotations, an opaque string payload, and an opaque version
/// token used for optimistic concurrency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Unique record name within the store
    pub name: String,
    /// Exact-match, selector-queryable labels
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Free-text annotations, not queryable
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Opaque payload
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    /// Opaque version token assigned by the store; `None` before creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl EntityRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn data_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// An equality-match label selector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSelector {
    matches: BTreeMap<String, String>,
}

impl LabelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.matches.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Whether a record's labels satisfy every equality match.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.matches
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }

    /// Render as a `key=value,key=value` query string.
    pub fn to_query(&self) -> String {
        self.matches
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

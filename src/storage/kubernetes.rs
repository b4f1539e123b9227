//! Kubernetes-backed store implementations
//!
//! Teams and API keys persist as Secrets; enforcement policies as Kuadrant
//! custom resources. Both talk to the API server directly over its REST
//! interface with the pod's service-account credentials.

use super::types::{EntityRecord, LabelSelector};
use super::{EntityStore, PolicyStore};
use crate::core::policy::{PolicyKind, PolicyObject, PolicySpec};
use crate::utils::error::{KeyforgeError, Result};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

const SERVICE_ACCOUNT_TOKEN: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";
const SERVICE_ACCOUNT_CA: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

/// Connection settings for the API server.
#[derive(Debug, Clone)]
pub struct KubeSettings {
    /// API server base URL
    pub api_url: String,
    /// Namespace all records live in
    pub namespace: String,
    /// Bearer token file
    pub token_path: PathBuf,
    /// Cluster CA bundle
    pub ca_path: PathBuf,
}

impl Default for KubeSettings {
    fn default() -> Self {
        Self {
            api_url: "https://kubernetes.default.svc".to_string(),
            namespace: "llm".to_string(),
            token_path: PathBuf::from(SERVICE_ACCOUNT_TOKEN),
            ca_path: PathBuf::from(SERVICE_ACCOUNT_CA),
        }
    }
}

/// Shared API-server client.
#[derive(Debug, Clone)]
struct KubeClient {
    http: reqwest::Client,
    api_url: String,
    namespace: String,
    token: String,
}

impl KubeClient {
    fn new(settings: &KubeSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if settings.ca_path.exists() {
            let pem = std::fs::read(&settings.ca_path)?;
            let cert = reqwest::Certificate::from_pem(&pem)?;
            builder = builder.add_root_certificate(cert);
        }
        let http = builder.build()?;

        let token = if settings.token_path.exists() {
            std::fs::read_to_string(&settings.token_path)?
                .trim()
                .to_string()
        } else {
            String::new()
        };

        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            namespace: settings.namespace.clone(),
            token,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{}", self.api_url, path));
        if !self.token.is_empty() {
            builder = builder.bearer_auth(&self.token);
        }
        builder
    }
}

/// Map a non-success API response onto the error taxonomy.
async fn api_error(context: &str, response: reqwest::Response) -> KeyforgeError {
    let status = response.status();
    let detail = response.text().await.unwrap_or_default();
    match status {
        StatusCode::CONFLICT => KeyforgeError::conflict(format!("{}: already exists", context)),
        StatusCode::NOT_FOUND => KeyforgeError::not_found(format!("{}: not found", context)),
        _ => KeyforgeError::store(format!("{}: {} {}", context, status, detail)),
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMeta {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(default)]
    labels: BTreeMap<String, String>,
    #[serde(default)]
    annotations: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uid: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretManifest {
    api_version: String,
    kind: String,
    metadata: ObjectMeta,
    #[serde(rename = "type")]
    secret_type: String,
    /// Base64-encoded payload, present on reads
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    data: BTreeMap<String, String>,
    /// Plaintext payload, accepted on writes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    string_data: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct SecretList {
    #[serde(default)]
    items: Vec<SecretManifest>,
}

/// Entity store backed by Kubernetes Secrets.
#[derive(Debug, Clone)]
pub struct KubeStore {
    client: KubeClient,
}

impl KubeStore {
    pub fn new(settings: &KubeSettings) -> Result<Self> {
        Ok(Self {
            client: KubeClient::new(settings)?,
        })
    }

    fn secrets_path(&self) -> String {
        format!("/api/v1/namespaces/{}/secrets", self.client.namespace)
    }

    fn secret_path(&self, name: &str) -> String {
        format!("{}/{}", self.secrets_path(), name)
    }

    fn to_manifest(&self, record: &EntityRecord) -> SecretManifest {
        SecretManifest {
            api_version: "v1".to_string(),
            kind: "Secret".to_string(),
            metadata: ObjectMeta {
                name: record.name.clone(),
                namespace: Some(self.client.namespace.clone()),
                labels: record.labels.clone(),
                annotations: record.annotations.clone(),
                resource_version: record.version.clone(),
                uid: None,
            },
            secret_type: "Opaque".to_string(),
            data: BTreeMap::new(),
            string_data: record.data.clone(),
        }
    }

    fn from_manifest(manifest: SecretManifest) -> Result<EntityRecord> {
        let mut data = BTreeMap::new();
        for (key, encoded) in manifest.data {
            let bytes = general_purpose::STANDARD
                .decode(&encoded)
                .map_err(|e| KeyforgeError::store(format!("undecodable secret payload: {}", e)))?;
            let value = String::from_utf8(bytes)
                .map_err(|e| KeyforgeError::store(format!("non-UTF-8 secret payload: {}", e)))?;
            data.insert(key, value);
        }
        Ok(EntityRecord {
            name: manifest.metadata.name,
            labels: manifest.metadata.labels,
            annotations: manifest.metadata.annotations,
            data,
            version: manifest.metadata.resource_version,
        })
    }
}

#[async_trait]
impl EntityStore for KubeStore {
    async fn create(&self, record: EntityRecord) -> Result<EntityRecord> {
        let mut manifest = self.to_manifest(&record);
        manifest.metadata.resource_version = None;
        let response = self
            .client
            .request(reqwest::Method::POST, &self.secrets_path())
            .json(&manifest)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(&format!("create secret {}", record.name), response).await);
        }
        Self::from_manifest(response.json().await?)
    }

    async fn get(&self, name: &str) -> Result<Option<EntityRecord>> {
        let response = self
            .client
            .request(reqwest::Method::GET, &self.secret_path(name))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(&format!("get secret {}", name), response).await);
        }
        Self::from_manifest(response.json().await?).map(Some)
    }

    async fn update(&self, record: EntityRecord) -> Result<EntityRecord> {
        let manifest = self.to_manifest(&record);
        let response = self
            .client
            .request(reqwest::Method::PUT, &self.secret_path(&record.name))
            .json(&manifest)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(&format!("update secret {}", record.name), response).await);
        }
        Self::from_manifest(response.json().await?)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .request(reqwest::Method::DELETE, &self.secret_path(name))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(&format!("delete secret {}", name), response).await);
        }
        Ok(())
    }

    async fn delete_by_selector(&self, selector: &LabelSelector) -> Result<u64> {
        // The collection delete returns the deleted items.
        let response = self
            .client
            .request(reqwest::Method::DELETE, &self.secrets_path())
            .query(&[("labelSelector", selector.to_query())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error("delete secrets by selector", response).await);
        }
        let list: SecretList = response.json().await?;
        Ok(list.items.len() as u64)
    }

    async fn list(&self, selector: &LabelSelector) -> Result<Vec<EntityRecord>> {
        let response = self
            .client
            .request(reqwest::Method::GET, &self.secrets_path())
            .query(&[("labelSelector", selector.to_query())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error("list secrets", response).await);
        }
        let list: SecretList = response.json().await?;
        debug!("Listed {} secrets", list.items.len());
        list.items.into_iter().map(Self::from_manifest).collect()
    }
}

/// API group, version and resource plural for a policy kind.
fn policy_resource(kind: PolicyKind) -> (&'static str, &'static str, &'static str, &'static str) {
    match kind {
        PolicyKind::TokenRate => (
            "kuadrant.io",
            "v1alpha1",
            "tokenratelimitpolicies",
            "TokenRateLimitPolicy",
        ),
        PolicyKind::RequestRate => ("kuadrant.io", "v1", "ratelimitpolicies", "RateLimitPolicy"),
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolicyManifest {
    api_version: String,
    kind: String,
    metadata: ObjectMeta,
    spec: PolicySpec,
}

/// Policy store backed by Kuadrant custom resources.
#[derive(Debug, Clone)]
pub struct KubePolicyStore {
    client: KubeClient,
}

impl KubePolicyStore {
    pub fn new(settings: &KubeSettings) -> Result<Self> {
        Ok(Self {
            client: KubeClient::new(settings)?,
        })
    }

    fn collection_path(&self, kind: PolicyKind) -> String {
        let (group, version, plural, _) = policy_resource(kind);
        format!(
            "/apis/{}/{}/namespaces/{}/{}",
            group, version, self.client.namespace, plural
        )
    }

    fn object_path(&self, kind: PolicyKind, name: &str) -> String {
        format!("{}/{}", self.collection_path(kind), name)
    }

    fn to_manifest(&self, policy: &PolicyObject) -> PolicyManifest {
        let (group, version, _, kind_name) = policy_resource(policy.kind);
        PolicyManifest {
            api_version: format!("{}/{}", group, version),
            kind: kind_name.to_string(),
            metadata: ObjectMeta {
                name: policy.name.clone(),
                namespace: Some(self.client.namespace.clone()),
                labels: policy.labels.clone(),
                annotations: policy.annotations.clone(),
                resource_version: policy.version.clone(),
                uid: policy.uid.clone(),
            },
            spec: policy.spec.clone(),
        }
    }

    fn from_manifest(kind: PolicyKind, manifest: PolicyManifest, team_label: &str) -> PolicyObject {
        let team_id = manifest
            .metadata
            .labels
            .get(team_label)
            .cloned()
            .unwrap_or_default();
        PolicyObject {
            kind,
            name: manifest.metadata.name,
            team_id,
            labels: manifest.metadata.labels,
            annotations: manifest.metadata.annotations,
            spec: manifest.spec,
            uid: manifest.metadata.uid,
            version: manifest.metadata.resource_version,
        }
    }
}

#[async_trait]
impl PolicyStore for KubePolicyStore {
    async fn create(&self, policy: &PolicyObject) -> Result<()> {
        let mut manifest = self.to_manifest(policy);
        manifest.metadata.resource_version = None;
        manifest.metadata.uid = None;
        let response = self
            .client
            .request(reqwest::Method::POST, &self.collection_path(policy.kind))
            .json(&manifest)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(&format!("create policy {}", policy.name), response).await);
        }
        Ok(())
    }

    async fn get(&self, kind: PolicyKind, name: &str) -> Result<Option<PolicyObject>> {
        let response = self
            .client
            .request(reqwest::Method::GET, &self.object_path(kind, name))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(&format!("get policy {}", name), response).await);
        }
        let manifest: PolicyManifest = response.json().await?;
        Ok(Some(Self::from_manifest(
            kind,
            manifest,
            crate::core::models::labels::TEAM_ID,
        )))
    }

    async fn update(&self, policy: &PolicyObject) -> Result<()> {
        let manifest = self.to_manifest(policy);
        let response = self
            .client
            .request(
                reqwest::Method::PUT,
                &self.object_path(policy.kind, &policy.name),
            )
            .json(&manifest)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(&format!("update policy {}", policy.name), response).await);
        }
        Ok(())
    }

    async fn delete(&self, kind: PolicyKind, name: &str) -> Result<()> {
        let response = self
            .client
            .request(reqwest::Method::DELETE, &self.object_path(kind, name))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(&format!("delete policy {}", name), response).await);
        }
        Ok(())
    }
}

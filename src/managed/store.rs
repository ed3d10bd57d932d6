//! # Cluster Object Store
//!
//! Minimal collaborator interface for persisting a managed resource back to
//! the cluster. Adapters use it for exactly one thing: writing
//! late-initialized spec fields after a compare-and-write check.

use anyhow::Context as _;
use async_trait::async_trait;
use k8s_openapi::ClusterResourceScope;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::constants;

/// `update(object)` against the cluster store. Mockable in adapter tests.
#[async_trait]
pub trait ObjectStore<T>: Send + Sync {
    async fn update(&self, obj: &T) -> anyhow::Result<()>;
}

/// Production store backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl<T> ObjectStore<T> for KubeStore
where
    T: Resource<Scope = ClusterResourceScope, DynamicType = ()>
        + Clone
        + Serialize
        + DeserializeOwned
        + std::fmt::Debug
        + Send
        + Sync,
{
    // Merge-patches the spec rather than replacing the whole object: the
    // object in hand comes from the watch cache and its resourceVersion may
    // already be stale within the same reconciliation pass.
    async fn update(&self, obj: &T) -> anyhow::Result<()> {
        let name = obj
            .meta()
            .name
            .as_deref()
            .context("managed resource has no name")?;
        let spec = spec_document(obj)?;
        let api: Api<T> = Api::all(self.client.clone());
        api.patch(
            name,
            &PatchParams::apply(constants::FIELD_MANAGER),
            &Patch::Merge(json!({ "spec": spec })),
        )
        .await
        .with_context(|| format!("patching spec of {name}"))?;
        Ok(())
    }
}

/// The resource's spec subtree. Every managed resource has one.
fn spec_document<T: Serialize>(obj: &T) -> anyhow::Result<serde_json::Value> {
    let mut value = serde_json::to_value(obj).context("serializing managed resource")?;
    match value.get_mut("spec") {
        Some(spec) if !spec.is_null() => Ok(spec.take()),
        _ => anyhow::bail!("managed resource has no spec"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::iam::{RoleParameters, RoleSpec};
    use crate::crd::Role;

    #[test]
    fn spec_document_carries_late_initialized_fields() {
        let mut role = Role::new(
            "some arbitrary name",
            RoleSpec {
                resource_spec: Default::default(),
                for_provider: RoleParameters::default(),
            },
        );
        role.spec.for_provider.path = Some("/service/".to_string());

        let spec = spec_document(&role).unwrap();
        assert_eq!(spec["forProvider"]["path"], json!("/service/"));
    }

    #[test]
    fn spec_document_rejects_specless_values() {
        assert!(spec_document(&json!({"metadata": {}})).is_err());
    }
}

//! # Custom Resource Definitions
//!
//! CRD types for the AWS resource controller.
//!
//! Each managed resource kind follows the same shape: a cluster-scoped
//! custom resource whose spec carries the desired provider-side state
//! (`for_provider`) plus generic management metadata, and whose status
//! carries conditions and the last observed provider-side attributes
//! (`at_provider`).

pub mod condition;
pub mod iam;
pub mod provider;
pub mod secretsmanager;

pub use condition::Condition;
pub use iam::{Role, RoleParameters, UserPolicyAttachment, UserPolicyAttachmentParameters};
pub use provider::ProviderConfig;
pub use secretsmanager::{Secret, SecretParameters};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What happens to the external resource when the managed resource is
/// deleted from the cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum DeletionPolicy {
    /// Delete the external resource along with the managed resource.
    #[default]
    Delete,
    /// Leave the external resource in place and only remove the managed
    /// resource from the cluster.
    Orphan,
}

/// Management metadata shared by every managed resource spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    /// Deletion policy for the external resource
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
    /// Name of the ProviderConfig holding the AWS credentials to use.
    /// Defaults to "default" when unset.
    #[serde(default)]
    pub provider_config_ref: Option<String>,
}

impl ResourceSpec {
    /// The referenced ProviderConfig name, falling back to "default".
    pub fn provider_config_name(&self) -> &str {
        self.provider_config_ref.as_deref().unwrap_or("default")
    }
}

/// Reference to a key in a Kubernetes Secret.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    /// Namespace of the secret
    pub namespace: String,
    /// Name of the secret
    pub name: String,
    /// Key within the secret data
    pub key: String,
}

/// A key/value tag attached to a provider resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Tag key
    pub key: String,
    /// Tag value
    pub value: String,
}

//! # Secrets Manager Managed Resources
//!
//! CRD types for the `Secret` resource kind. The secret payload itself is
//! never stored in the custom resource; it is drawn from a referenced
//! Kubernetes Secret at reconcile time.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::condition::{upsert, Condition};
use super::{ResourceSpec, SecretKeySelector, Tag};

/// A Secrets Manager secret.
///
/// The external name of a Secret is the Secrets Manager secret name (or ARN
/// once observed).
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "Secret",
    group = "secretsmanager.aws.controller.dev",
    version = "v1alpha1",
    status = "SecretStatus",
    shortname = "awssecret",
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].reason"}, {"name":"ARN", "type":"string", "jsonPath":".status.atProvider.arn"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SecretSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    /// Desired state of the Secrets Manager secret
    pub for_provider: SecretParameters,
}

/// Desired Secrets Manager secret attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretParameters {
    /// Kubernetes secret key holding the secret payload
    pub secret_ref: Option<SecretKeySelector>,
    /// A description of the secret
    #[serde(default)]
    pub description: Option<String>,
    /// KMS key used to encrypt the secret value. When unset the provider
    /// uses the account's default key; the observed value is
    /// late-initialized back into the spec.
    #[serde(default)]
    pub kms_key_id: Option<String>,
    /// Number of days a deleted secret stays recoverable (7 to 30).
    /// Mutually exclusive with `forceDeleteWithoutRecovery`.
    #[serde(default)]
    pub recovery_window_in_days: Option<i64>,
    /// Delete immediately without any recovery window
    #[serde(default)]
    pub force_delete_without_recovery: Option<bool>,
    /// Tags attached to the secret
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Provider-observed secret attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretObservation {
    /// Amazon Resource Name of the secret
    #[serde(default)]
    pub arn: Option<String>,
    /// When the secret was created (RFC3339)
    #[serde(default)]
    pub created_date: Option<String>,
    /// When the secret is scheduled for deletion, if a delete was requested
    #[serde(default)]
    pub deleted_date: Option<String>,
}

/// Status of a Secret resource
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretStatus {
    /// Conditions of the resource
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Last observed provider-side attributes
    #[serde(default)]
    pub at_provider: Option<SecretObservation>,
}

impl Secret {
    /// Replace the condition of the same type on the resource status.
    pub fn set_condition(&mut self, condition: Condition) {
        let status = self.status.get_or_insert_with(SecretStatus::default);
        upsert(&mut status.conditions, condition);
    }

    /// Record the observed provider-side attributes.
    pub fn set_observation(&mut self, observation: SecretObservation) {
        let status = self.status.get_or_insert_with(SecretStatus::default);
        status.at_provider = Some(observation);
    }
}

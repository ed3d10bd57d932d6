//! # IAM Managed Resources
//!
//! CRD types for the IAM resource kinds: `Role` and `UserPolicyAttachment`.
//! IAM is a global AWS service, so both kinds ignore the ProviderConfig
//! region and talk to the aws-global partition endpoint.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::condition::{upsert, Condition};
use super::{ResourceSpec, Tag};

/// An IAM role together with its assume-role (trust) policy document.
///
/// The external name of a Role is the IAM role name.
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "Role",
    group = "iam.aws.controller.dev",
    version = "v1beta1",
    status = "RoleStatus",
    shortname = "iamrole",
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].reason"}, {"name":"ARN", "type":"string", "jsonPath":".status.atProvider.arn"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    /// Desired state of the IAM role
    pub for_provider: RoleParameters,
}

/// Desired IAM role attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleParameters {
    /// The trust relationship policy document granting an entity permission
    /// to assume the role, as a JSON document. Compared canonically: key
    /// order and whitespace differences do not count as drift.
    pub assume_role_policy_document: String,
    /// A description of the role
    #[serde(default)]
    pub description: Option<String>,
    /// Maximum session duration in seconds (3600 to 43200)
    #[serde(default)]
    pub max_session_duration: Option<i32>,
    /// Path to the role
    #[serde(default)]
    pub path: Option<String>,
    /// ARN of the policy used to set the role's permissions boundary
    #[serde(default)]
    pub permissions_boundary: Option<String>,
    /// Tags attached to the role
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Provider-observed IAM role attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleObservation {
    /// Amazon Resource Name of the role
    #[serde(default)]
    pub arn: Option<String>,
    /// Stable and unique string identifying the role
    #[serde(default)]
    pub role_id: Option<String>,
    /// When the role was created (RFC3339)
    #[serde(default)]
    pub create_date: Option<String>,
}

/// Status of a Role resource
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleStatus {
    /// Conditions of the resource
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Last observed provider-side attributes
    #[serde(default)]
    pub at_provider: Option<RoleObservation>,
}

impl Role {
    /// Replace the condition of the same type on the resource status.
    pub fn set_condition(&mut self, condition: Condition) {
        let status = self.status.get_or_insert_with(RoleStatus::default);
        upsert(&mut status.conditions, condition);
    }

    /// Record the observed provider-side attributes.
    pub fn set_observation(&mut self, observation: RoleObservation) {
        let status = self.status.get_or_insert_with(RoleStatus::default);
        status.at_provider = Some(observation);
    }
}

/// An attachment of a managed policy to an IAM user.
///
/// The natural key of an attachment is the (user name, policy ARN) pair;
/// there is no separate provider-assigned identifier.
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "UserPolicyAttachment",
    group = "iam.aws.controller.dev",
    version = "v1alpha1",
    status = "UserPolicyAttachmentStatus",
    shortname = "iamupa",
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].reason"}, {"name":"User", "type":"string", "jsonPath":".spec.forProvider.userName"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct UserPolicyAttachmentSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    /// Desired state of the attachment
    pub for_provider: UserPolicyAttachmentParameters,
}

/// Desired attachment attributes. Both fields form the natural key: any
/// change implies replacement of the attachment, never mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPolicyAttachmentParameters {
    /// Name of the IAM user the policy is attached to
    pub user_name: String,
    /// ARN of the managed policy to attach
    pub policy_arn: String,
}

/// Provider-observed attachment attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPolicyAttachmentObservation {
    /// ARN of the attached policy as reported by the provider
    #[serde(default)]
    pub attached_policy_arn: Option<String>,
}

/// Status of a UserPolicyAttachment resource
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPolicyAttachmentStatus {
    /// Conditions of the resource
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Last observed provider-side attributes
    #[serde(default)]
    pub at_provider: Option<UserPolicyAttachmentObservation>,
}

impl UserPolicyAttachment {
    /// Replace the condition of the same type on the resource status.
    pub fn set_condition(&mut self, condition: Condition) {
        let status = self
            .status
            .get_or_insert_with(UserPolicyAttachmentStatus::default);
        upsert(&mut status.conditions, condition);
    }

    /// Record the observed provider-side attributes.
    pub fn set_observation(&mut self, observation: UserPolicyAttachmentObservation) {
        let status = self
            .status
            .get_or_insert_with(UserPolicyAttachmentStatus::default);
        status.at_provider = Some(observation);
    }
}

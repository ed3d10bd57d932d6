//! # IAM Client Facades
//!
//! Capability-scoped facades over the IAM SDK: [`RoleClient`] for role
//! lifecycle calls and [`UserPolicyAttachmentClient`] for attachment calls,
//! plus the pure helpers adapters use for late-initialization, observation
//! mapping and drift detection.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_iam::primitives::DateTimeFormat;
use aws_sdk_iam::types::{AttachedPolicy, Role as SdkRole, Tag as SdkTag};
use aws_sdk_iam::Client;

use super::{classify, AwsError};
use crate::crd::iam::{RoleObservation, RoleParameters};

/// Role lifecycle operations.
#[async_trait]
pub trait RoleClient: Send + Sync {
    async fn get_role(&self, role_name: &str) -> Result<SdkRole, AwsError>;
    async fn create_role(&self, role_name: &str, params: &RoleParameters) -> Result<(), AwsError>;
    /// Update the role's base attributes (description, session duration).
    async fn update_role(
        &self,
        role_name: &str,
        description: Option<&str>,
        max_session_duration: Option<i32>,
    ) -> Result<(), AwsError>;
    /// Replace the role's trust policy document.
    async fn update_assume_role_policy(
        &self,
        role_name: &str,
        document: &str,
    ) -> Result<(), AwsError>;
    async fn delete_role(&self, role_name: &str) -> Result<(), AwsError>;
}

/// User-policy attachment operations.
#[async_trait]
pub trait UserPolicyAttachmentClient: Send + Sync {
    async fn list_attached_user_policies(
        &self,
        user_name: &str,
    ) -> Result<Vec<AttachedPolicy>, AwsError>;
    async fn attach_user_policy(&self, user_name: &str, policy_arn: &str)
        -> Result<(), AwsError>;
    async fn detach_user_policy(&self, user_name: &str, policy_arn: &str)
        -> Result<(), AwsError>;
}

/// IAM facade backed by the AWS SDK. Implements both capability traits so a
/// single client can serve either adapter.
#[derive(Debug, Clone)]
pub struct Iam {
    client: Client,
}

impl Iam {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl RoleClient for Iam {
    async fn get_role(&self, role_name: &str) -> Result<SdkRole, AwsError> {
        let out = self
            .client
            .get_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(classify)?;
        out.role
            .ok_or_else(|| AwsError::other("GetRole returned an empty role"))
    }

    async fn create_role(&self, role_name: &str, params: &RoleParameters) -> Result<(), AwsError> {
        let mut req = self
            .client
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(&params.assume_role_policy_document)
            .set_description(params.description.clone())
            .set_max_session_duration(params.max_session_duration)
            .set_path(params.path.clone())
            .set_permissions_boundary(params.permissions_boundary.clone());
        for tag in &params.tags {
            let tag = SdkTag::builder()
                .key(&tag.key)
                .value(&tag.value)
                .build()
                .map_err(|e| AwsError::Other(Box::new(e)))?;
            req = req.tags(tag);
        }
        req.send().await.map(|_| ()).map_err(classify)
    }

    async fn update_role(
        &self,
        role_name: &str,
        description: Option<&str>,
        max_session_duration: Option<i32>,
    ) -> Result<(), AwsError> {
        self.client
            .update_role()
            .role_name(role_name)
            .set_description(description.map(str::to_owned))
            .set_max_session_duration(max_session_duration)
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn update_assume_role_policy(
        &self,
        role_name: &str,
        document: &str,
    ) -> Result<(), AwsError> {
        self.client
            .update_assume_role_policy()
            .role_name(role_name)
            .policy_document(document)
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn delete_role(&self, role_name: &str) -> Result<(), AwsError> {
        self.client
            .delete_role()
            .role_name(role_name)
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }
}

#[async_trait]
impl UserPolicyAttachmentClient for Iam {
    async fn list_attached_user_policies(
        &self,
        user_name: &str,
    ) -> Result<Vec<AttachedPolicy>, AwsError> {
        let out = self
            .client
            .list_attached_user_policies()
            .user_name(user_name)
            .send()
            .await
            .map_err(classify)?;
        Ok(out.attached_policies.unwrap_or_default())
    }

    async fn attach_user_policy(
        &self,
        user_name: &str,
        policy_arn: &str,
    ) -> Result<(), AwsError> {
        self.client
            .attach_user_policy()
            .user_name(user_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn detach_user_policy(
        &self,
        user_name: &str,
        policy_arn: &str,
    ) -> Result<(), AwsError> {
        self.client
            .detach_user_policy()
            .user_name(user_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }
}

/// Map the observed role to the resource's `at_provider` status block.
pub fn role_observation(role: &SdkRole) -> RoleObservation {
    RoleObservation {
        arn: Some(role.arn().to_string()).filter(|s| !s.is_empty()),
        role_id: Some(role.role_id().to_string()).filter(|s| !s.is_empty()),
        create_date: role.create_date().fmt(DateTimeFormat::DateTime).ok(),
    }
}

/// Fill unset optional role fields from the observed role. User-set values
/// are never overwritten.
pub fn late_initialize_role(params: &mut RoleParameters, role: &SdkRole) {
    if params.description.is_none() {
        params.description = role.description().map(str::to_string);
    }
    if params.max_session_duration.is_none() {
        params.max_session_duration = role.max_session_duration();
    }
    if params.path.is_none() && !role.path().is_empty() {
        params.path = Some(role.path().to_string());
    }
    if params.permissions_boundary.is_none() {
        params.permissions_boundary = role
            .permissions_boundary()
            .and_then(|b| b.permissions_boundary_arn())
            .map(str::to_string);
    }
}

/// Whether the role's base attributes (everything except the trust policy)
/// match the desired state. Unset desired fields count as matching whatever
/// the provider holds.
pub fn base_attributes_match(params: &RoleParameters, role: &SdkRole) -> bool {
    unset_or_eq(params.description.as_deref(), role.description())
        && unset_or_eq(params.max_session_duration, role.max_session_duration())
}

/// Whether the observed trust policy matches the desired one.
pub fn trust_policy_matches(params: &RoleParameters, role: &SdkRole) -> bool {
    policy_documents_match(
        &params.assume_role_policy_document,
        role.assume_role_policy_document().unwrap_or_default(),
    )
}

/// Full up-to-date check for a role: base attributes plus trust policy.
pub fn role_up_to_date(params: &RoleParameters, role: &SdkRole) -> bool {
    base_attributes_match(params, role) && trust_policy_matches(params, role)
}

/// Canonical policy document comparison. The provider returns documents
/// URL-encoded and with arbitrary whitespace/key order, so both sides are
/// decoded and parsed as JSON and compared by value; when either side is not
/// valid JSON the raw strings are compared instead.
pub fn policy_documents_match(desired: &str, observed: &str) -> bool {
    let observed = urlencoding::decode(observed)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| observed.to_string());
    match (
        serde_json::from_str::<serde_json::Value>(desired),
        serde_json::from_str::<serde_json::Value>(&observed),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => desired == observed,
    }
}

fn unset_or_eq<T: PartialEq>(desired: Option<T>, observed: Option<T>) -> bool {
    match desired {
        None => true,
        Some(d) => observed.is_some_and(|o| o == d),
    }
}

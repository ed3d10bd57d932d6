//! # Secrets Manager Client Facade
//!
//! [`SecretsClient`] wraps the Secrets Manager operations the adapter needs,
//! plus the pure helpers for observation mapping, late-initialization and
//! drift detection.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_secretsmanager::operation::describe_secret::DescribeSecretOutput;
use aws_sdk_secretsmanager::primitives::DateTimeFormat;
use aws_sdk_secretsmanager::types::Tag as SdkTag;
use aws_sdk_secretsmanager::Client;

use super::{classify, AwsError};
use crate::crd::secretsmanager::{SecretObservation, SecretParameters};

/// Secret lifecycle operations.
#[async_trait]
pub trait SecretsClient: Send + Sync {
    async fn describe_secret(&self, secret_id: &str) -> Result<DescribeSecretOutput, AwsError>;
    /// Current secret string, or `None` when the secret has no current
    /// version yet.
    async fn get_secret_value(&self, secret_id: &str) -> Result<Option<String>, AwsError>;
    async fn create_secret(
        &self,
        name: &str,
        value: &str,
        params: &SecretParameters,
    ) -> Result<(), AwsError>;
    /// Update the secret's metadata (description, KMS key).
    async fn update_secret(
        &self,
        secret_id: &str,
        description: Option<&str>,
        kms_key_id: Option<&str>,
    ) -> Result<(), AwsError>;
    /// Stage a new secret string as the current version.
    async fn put_secret_value(&self, secret_id: &str, value: &str) -> Result<(), AwsError>;
    async fn delete_secret(
        &self,
        secret_id: &str,
        recovery_window_in_days: Option<i64>,
        force_delete_without_recovery: bool,
    ) -> Result<(), AwsError>;
}

/// Secrets Manager facade backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct SecretsManager {
    client: Client,
}

impl SecretsManager {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl SecretsClient for SecretsManager {
    async fn describe_secret(&self, secret_id: &str) -> Result<DescribeSecretOutput, AwsError> {
        self.client
            .describe_secret()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(classify)
    }

    async fn get_secret_value(&self, secret_id: &str) -> Result<Option<String>, AwsError> {
        let out = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(classify)?;
        Ok(out.secret_string)
    }

    async fn create_secret(
        &self,
        name: &str,
        value: &str,
        params: &SecretParameters,
    ) -> Result<(), AwsError> {
        let mut req = self
            .client
            .create_secret()
            .name(name)
            .secret_string(value)
            .set_description(params.description.clone())
            .set_kms_key_id(params.kms_key_id.clone());
        for tag in &params.tags {
            req = req.tags(SdkTag::builder().key(&tag.key).value(&tag.value).build());
        }
        req.send().await.map(|_| ()).map_err(classify)
    }

    async fn update_secret(
        &self,
        secret_id: &str,
        description: Option<&str>,
        kms_key_id: Option<&str>,
    ) -> Result<(), AwsError> {
        self.client
            .update_secret()
            .secret_id(secret_id)
            .set_description(description.map(str::to_owned))
            .set_kms_key_id(kms_key_id.map(str::to_owned))
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn put_secret_value(&self, secret_id: &str, value: &str) -> Result<(), AwsError> {
        self.client
            .put_secret_value()
            .secret_id(secret_id)
            .secret_string(value)
            .send()
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn delete_secret(
        &self,
        secret_id: &str,
        recovery_window_in_days: Option<i64>,
        force_delete_without_recovery: bool,
    ) -> Result<(), AwsError> {
        // The provider rejects requests carrying both options.
        let req = if force_delete_without_recovery {
            self.client
                .delete_secret()
                .secret_id(secret_id)
                .force_delete_without_recovery(true)
        } else {
            self.client
                .delete_secret()
                .secret_id(secret_id)
                .set_recovery_window_in_days(recovery_window_in_days)
        };
        req.send().await.map(|_| ()).map_err(classify)
    }
}

/// Map the observed secret to the resource's `at_provider` status block.
pub fn secret_observation(observed: &DescribeSecretOutput) -> SecretObservation {
    SecretObservation {
        arn: observed.arn().map(str::to_string),
        created_date: observed
            .created_date()
            .and_then(|d| d.fmt(DateTimeFormat::DateTime).ok()),
        deleted_date: observed
            .deleted_date()
            .and_then(|d| d.fmt(DateTimeFormat::DateTime).ok()),
    }
}

/// Fill unset optional secret fields from the observed secret. User-set
/// values are never overwritten.
pub fn late_initialize_secret(params: &mut SecretParameters, observed: &DescribeSecretOutput) {
    if params.kms_key_id.is_none() {
        params.kms_key_id = observed.kms_key_id().map(str::to_string);
    }
}

/// Whether the secret's metadata (everything except the payload) matches the
/// desired state. Unset desired fields count as matching whatever the
/// provider holds.
pub fn metadata_matches(params: &SecretParameters, observed: &DescribeSecretOutput) -> bool {
    let description_matches = match params.description.as_deref() {
        None => true,
        Some(d) => observed.description() == Some(d),
    };
    let kms_matches = match params.kms_key_id.as_deref() {
        None => true,
        Some(k) => observed.kms_key_id() == Some(k),
    };
    description_matches && kms_matches
}

/// Whether the current secret string matches the desired payload.
pub fn value_matches(current_value: Option<&str>, desired_value: &str) -> bool {
    current_value == Some(desired_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed() -> DescribeSecretOutput {
        DescribeSecretOutput::builder()
            .arn("arn:aws:secretsmanager:eu-west-1:123456789012:secret:example")
            .name("example")
            .description("observed description")
            .kms_key_id("alias/aws/secretsmanager")
            .build()
    }

    #[test]
    fn late_initialize_fills_kms_key_only_when_unset() {
        let mut params = SecretParameters::default();
        late_initialize_secret(&mut params, &observed());
        assert_eq!(params.kms_key_id.as_deref(), Some("alias/aws/secretsmanager"));

        let mut params = SecretParameters {
            kms_key_id: Some("alias/custom".to_string()),
            ..Default::default()
        };
        late_initialize_secret(&mut params, &observed());
        assert_eq!(params.kms_key_id.as_deref(), Some("alias/custom"));
    }

    #[test]
    fn metadata_comparison_respects_unset_optionals() {
        let params = SecretParameters::default();
        assert!(metadata_matches(&params, &observed()));

        let params = SecretParameters {
            description: Some("desired description".to_string()),
            ..Default::default()
        };
        assert!(!metadata_matches(&params, &observed()));
    }

    #[test]
    fn value_comparison_is_exact() {
        assert!(value_matches(Some("s3cret"), "s3cret"));
        assert!(!value_matches(Some("other"), "s3cret"));
        assert!(!value_matches(None, "s3cret"));
    }

    #[test]
    fn observation_maps_arn() {
        let observation = secret_observation(&observed());
        assert_eq!(
            observation.arn.as_deref(),
            Some("arn:aws:secretsmanager:eu-west-1:123456789012:secret:example")
        );
        assert!(observation.deleted_date.is_none());
    }
}

//! # ProviderConfig
//!
//! Cluster-scoped configuration resource that tells connectors how to
//! authenticate against AWS. Managed resources reference a ProviderConfig
//! by name via `providerConfigRef`.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::SecretKeySelector;

/// ProviderConfig Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: aws.controller.dev/v1alpha1
/// kind: ProviderConfig
/// metadata:
///   name: default
/// spec:
///   region: eu-west-1
///   credentials:
///     source: Secret
///     secretRef:
///       namespace: controller-system
///       name: aws-creds
///       key: credentials
/// ```
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "ProviderConfig",
    group = "aws.controller.dev",
    version = "v1alpha1",
    shortname = "pc"
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigSpec {
    /// Default AWS region for regional resource kinds. Global kinds (IAM)
    /// always use the aws-global partition endpoint. When unset, the SDK's
    /// default region chain applies.
    #[serde(default)]
    pub region: Option<String>,
    /// How provider credentials are obtained
    pub credentials: ProviderCredentials,
}

/// Provider credential source
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "source")]
pub enum ProviderCredentials {
    /// Read a static access key pair from a Kubernetes Secret. The
    /// referenced key must hold an INI-style credentials payload with
    /// `aws_access_key_id` and `aws_secret_access_key` lines.
    #[serde(rename_all = "camelCase")]
    Secret {
        /// Reference to the secret key holding the credentials
        secret_ref: SecretKeySelector,
    },
    /// Use the ambient identity of the controller pod (IRSA or instance
    /// profile) via the SDK's default credential chain.
    InjectedIdentity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_deserialize_by_source_tag() {
        let yaml = r#"
region: us-east-1
credentials:
  source: Secret
  secretRef:
    namespace: kube-system
    name: aws-creds
    key: credentials
"#;
        let spec: ProviderConfigSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.region.as_deref(), Some("us-east-1"));
        match spec.credentials {
            ProviderCredentials::Secret { secret_ref } => {
                assert_eq!(secret_ref.namespace, "kube-system");
                assert_eq!(secret_ref.key, "credentials");
            }
            ProviderCredentials::InjectedIdentity => panic!("expected secret source"),
        }
    }

    #[test]
    fn injected_identity_needs_no_secret_ref() {
        let yaml = "credentials:\n  source: InjectedIdentity\n";
        let spec: ProviderConfigSpec = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            spec.credentials,
            ProviderCredentials::InjectedIdentity
        ));
        assert!(spec.region.is_none());
    }
}

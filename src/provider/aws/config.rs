//! # AWS SDK Configuration
//!
//! Resolves the SDK configuration for a managed resource from the
//! ProviderConfig it references: either a static access key pair stored in a
//! Kubernetes Secret, or the pod's ambient identity (IRSA / instance
//! profile) through the SDK's default credential chain.

use anyhow::{bail, Context as _, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use k8s_openapi::api::core::v1::Secret as K8sSecret;
use kube::{Api, Client};
use tracing::debug;

use crate::crd::provider::ProviderCredentials;
use crate::crd::{ProviderConfig, SecretKeySelector};

/// Partition endpoint used by global-only resource kinds (IAM).
pub const GLOBAL_REGION: &str = "aws-global";

/// Load an SDK configuration for the named ProviderConfig.
///
/// `region_override` wins over the ProviderConfig's default region; global
/// resource kinds pass [`GLOBAL_REGION`] here. When neither is set the SDK's
/// own region chain applies.
pub async fn load_sdk_config(
    client: &Client,
    provider_config_name: &str,
    region_override: Option<&str>,
) -> Result<SdkConfig> {
    let api: Api<ProviderConfig> = Api::all(client.clone());
    let pc = api
        .get(provider_config_name)
        .await
        .with_context(|| format!("getting ProviderConfig {provider_config_name}"))?;

    let region = region_override
        .map(str::to_owned)
        .or_else(|| pc.spec.region.clone());

    let mut builder = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        builder = builder.region(Region::new(region));
    }

    match &pc.spec.credentials {
        ProviderCredentials::Secret { secret_ref } => {
            debug!(
                secret = %secret_ref.name,
                namespace = %secret_ref.namespace,
                "resolving static credentials from secret"
            );
            let credentials = credentials_from_secret(client, secret_ref).await?;
            builder = builder.credentials_provider(credentials);
        }
        ProviderCredentials::InjectedIdentity => {
            debug!("using injected identity via the default credential chain");
        }
    }

    Ok(builder.load().await)
}

/// Read an INI-style credentials payload out of a Kubernetes Secret key.
async fn credentials_from_secret(
    client: &Client,
    selector: &SecretKeySelector,
) -> Result<Credentials> {
    let api: Api<K8sSecret> = Api::namespaced(client.clone(), &selector.namespace);
    let secret = api.get(&selector.name).await.with_context(|| {
        format!(
            "getting credentials secret {}/{}",
            selector.namespace, selector.name
        )
    })?;
    let data = secret
        .data
        .as_ref()
        .and_then(|d| d.get(&selector.key))
        .with_context(|| format!("credentials secret has no key {}", selector.key))?;
    let payload = std::str::from_utf8(&data.0).context("credentials payload is not UTF-8")?;
    parse_credentials(payload)
}

/// Parse `aws_access_key_id` / `aws_secret_access_key` lines out of an
/// INI-style credentials payload, ignoring profile headers and comments.
fn parse_credentials(payload: &str) -> Result<Credentials> {
    let mut access_key_id = None;
    let mut secret_access_key = None;
    let mut session_token = None;

    for line in payload.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('[') || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "aws_access_key_id" => access_key_id = Some(value.trim().to_string()),
            "aws_secret_access_key" => secret_access_key = Some(value.trim().to_string()),
            "aws_session_token" => session_token = Some(value.trim().to_string()),
            _ => {}
        }
    }

    let (Some(access_key_id), Some(secret_access_key)) = (access_key_id, secret_access_key) else {
        bail!("credentials payload is missing aws_access_key_id or aws_secret_access_key");
    };

    Ok(Credentials::new(
        access_key_id,
        secret_access_key,
        session_token,
        None,
        "provider-config-secret",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_key_pair() {
        let creds = parse_credentials(
            "[default]\naws_access_key_id = AKIAEXAMPLE\naws_secret_access_key = secret/key\n",
        )
        .unwrap();
        assert_eq!(creds.access_key_id(), "AKIAEXAMPLE");
        assert_eq!(creds.secret_access_key(), "secret/key");
    }

    #[test]
    fn parses_session_token_when_present() {
        let creds = parse_credentials(
            "aws_access_key_id=a\naws_secret_access_key=b\naws_session_token=c\n",
        )
        .unwrap();
        assert_eq!(creds.session_token(), Some("c"));
    }

    #[test]
    fn rejects_incomplete_payload() {
        assert!(parse_credentials("aws_access_key_id = AKIAEXAMPLE\n").is_err());
        assert!(parse_credentials("# nothing here\n").is_err());
    }
}

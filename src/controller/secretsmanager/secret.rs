//! # Secret Controller
//!
//! Lifecycle adapter for the Secrets Manager `Secret` managed resource. The
//! secret payload lives in a referenced Kubernetes Secret and is resolved at
//! reconcile time; updates split into metadata (`UpdateSecret`) and payload
//! (`PutSecretValue`) calls and fail fast on the first error.

use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret as K8sSecret;
use kube::{Api, Client};

use crate::crd::secretsmanager::SecretParameters;
use crate::crd::{condition, Secret, SecretKeySelector};
use crate::managed::{
    downcast, downcast_ref, external_name, Connector, Error, ExternalClient, ExternalCreation,
    ExternalObservation, ExternalUpdate, KubeStore, Managed, ObjectStore,
};
use crate::provider::aws::load_sdk_config;
use crate::provider::aws::secrets_manager::{
    late_initialize_secret, metadata_matches, secret_observation, value_matches, SecretsClient,
    SecretsManager,
};
use crate::runtime;

const ERR_UNEXPECTED_OBJECT: &str = "managed resource is not a Secret";
const ERR_PROVIDER_CONFIG: &str = "cannot resolve provider config";
const ERR_DESCRIBE: &str = "failed to describe the Secret";
const ERR_GET_VALUE: &str = "failed to get the Secret value";
const ERR_CREATE: &str = "failed to create the Secret";
const ERR_UPDATE: &str = "failed to update the Secret";
const ERR_PUT_VALUE: &str = "failed to put the Secret value";
const ERR_DELETE: &str = "failed to delete the Secret";
const ERR_KUBE_UPDATE: &str = "cannot late initialize Secret";
const ERR_RESOLVE_VALUE: &str = "cannot resolve the referenced secret value";

/// Start the Secret controller and block until it terminates.
pub async fn run(client: Client) -> anyhow::Result<()> {
    let connector = Arc::new(SecretConnector::new(client.clone()));
    runtime::run_controller::<Secret>(client, connector).await
}

/// Resolves the desired secret payload from the referenced Kubernetes
/// Secret. Mockable in adapter tests.
#[async_trait]
pub trait ValueFetcher: Send + Sync {
    async fn fetch(&self, selector: &SecretKeySelector) -> anyhow::Result<String>;
}

/// Production fetcher backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeValueFetcher {
    client: Client,
}

impl KubeValueFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for KubeValueFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeValueFetcher").finish_non_exhaustive()
    }
}

#[async_trait]
impl ValueFetcher for KubeValueFetcher {
    async fn fetch(&self, selector: &SecretKeySelector) -> anyhow::Result<String> {
        let api: Api<K8sSecret> = Api::namespaced(self.client.clone(), &selector.namespace);
        let secret = api.get(&selector.name).await.with_context(|| {
            format!(
                "getting payload secret {}/{}",
                selector.namespace, selector.name
            )
        })?;
        let data = secret
            .data
            .as_ref()
            .and_then(|d| d.get(&selector.key))
            .with_context(|| format!("payload secret has no key {}", selector.key))?;
        let value = std::str::from_utf8(&data.0).context("secret payload is not UTF-8")?;
        Ok(value.to_string())
    }
}

/// Resolves the referenced ProviderConfig into a live Secrets Manager
/// client. Secrets Manager is regional; the ProviderConfig's region applies.
pub struct SecretConnector {
    client: Client,
}

impl SecretConnector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for SecretConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretConnector").finish_non_exhaustive()
    }
}

#[async_trait]
impl Connector for SecretConnector {
    async fn connect(&self, mg: &dyn Managed) -> Result<Box<dyn ExternalClient>, Error> {
        let cr = downcast_ref::<Secret>(mg, ERR_UNEXPECTED_OBJECT)?;
        let config = load_sdk_config(
            &self.client,
            cr.spec.resource_spec.provider_config_name(),
            None,
        )
        .await
        .map_err(|e| Error::resolve(e, ERR_PROVIDER_CONFIG))?;

        Ok(Box::new(SecretExternal {
            client: SecretsManager::new(&config),
            store: KubeStore::new(self.client.clone()),
            values: KubeValueFetcher::new(self.client.clone()),
        }))
    }
}

struct SecretExternal<C, S, F> {
    client: C,
    store: S,
    values: F,
}

impl<C, S, F> SecretExternal<C, S, F>
where
    F: ValueFetcher,
{
    async fn desired_value(&self, params: &SecretParameters) -> Result<String, Error> {
        let selector = params.secret_ref.as_ref().ok_or_else(|| {
            Error::resolve(
                anyhow::anyhow!("spec.forProvider.secretRef is not set"),
                ERR_RESOLVE_VALUE,
            )
        })?;
        self.values
            .fetch(selector)
            .await
            .map_err(|e| Error::resolve(e, ERR_RESOLVE_VALUE))
    }
}

#[async_trait]
impl<C, S, F> ExternalClient for SecretExternal<C, S, F>
where
    C: SecretsClient,
    S: ObjectStore<Secret>,
    F: ValueFetcher,
{
    async fn observe(&self, mg: &mut dyn Managed) -> Result<ExternalObservation, Error> {
        let cr = downcast::<Secret>(mg, ERR_UNEXPECTED_OBJECT)?;
        let Some(name) = external_name(cr) else {
            return Ok(ExternalObservation::default());
        };

        let observed = match self.client.describe_secret(&name).await {
            Ok(out) => out,
            Err(e) if e.is_not_found() => return Ok(ExternalObservation::default()),
            Err(e) => return Err(Error::provider(e, ERR_DESCRIBE)),
        };

        // A secret inside its recovery window still exists but takes no
        // further calls until the provider finishes (or cancels) deletion.
        if observed.deleted_date().is_some() {
            cr.set_observation(secret_observation(&observed));
            cr.set_condition(condition::unavailable());
            return Ok(ExternalObservation {
                resource_exists: true,
                resource_up_to_date: true,
            });
        }

        let current_value = match self.client.get_secret_value(&name).await {
            Ok(value) => value,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(Error::provider(e, ERR_GET_VALUE)),
        };
        let desired_value = self.desired_value(&cr.spec.for_provider).await?;

        let before = cr.spec.for_provider.clone();
        late_initialize_secret(&mut cr.spec.for_provider, &observed);
        if cr.spec.for_provider != before {
            self.store
                .update(cr)
                .await
                .map_err(|e| Error::store(e, ERR_KUBE_UPDATE))?;
        }

        cr.set_condition(condition::available());
        cr.set_observation(secret_observation(&observed));

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: metadata_matches(&cr.spec.for_provider, &observed)
                && value_matches(current_value.as_deref(), &desired_value),
        })
    }

    async fn create(&self, mg: &mut dyn Managed) -> Result<ExternalCreation, Error> {
        let cr = downcast::<Secret>(mg, ERR_UNEXPECTED_OBJECT)?;
        cr.set_condition(condition::creating());

        let value = self.desired_value(&cr.spec.for_provider).await?;
        let name = external_name(cr).unwrap_or_default();
        self.client
            .create_secret(&name, &value, &cr.spec.for_provider)
            .await
            .map_err(|e| Error::provider(e, ERR_CREATE))?;

        Ok(ExternalCreation::default())
    }

    async fn update(&self, mg: &mut dyn Managed) -> Result<ExternalUpdate, Error> {
        let cr = downcast::<Secret>(mg, ERR_UNEXPECTED_OBJECT)?;
        let name = external_name(cr).unwrap_or_default();

        let observed = self
            .client
            .describe_secret(&name)
            .await
            .map_err(|e| Error::provider(e, ERR_DESCRIBE))?;

        if !metadata_matches(&cr.spec.for_provider, &observed) {
            self.client
                .update_secret(
                    &name,
                    cr.spec.for_provider.description.as_deref(),
                    cr.spec.for_provider.kms_key_id.as_deref(),
                )
                .await
                .map_err(|e| Error::provider(e, ERR_UPDATE))?;
        }

        let current_value = match self.client.get_secret_value(&name).await {
            Ok(value) => value,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(Error::provider(e, ERR_GET_VALUE)),
        };
        let desired_value = self.desired_value(&cr.spec.for_provider).await?;
        if !value_matches(current_value.as_deref(), &desired_value) {
            self.client
                .put_secret_value(&name, &desired_value)
                .await
                .map_err(|e| Error::provider(e, ERR_PUT_VALUE))?;
        }

        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mg: &mut dyn Managed) -> Result<(), Error> {
        let cr = downcast::<Secret>(mg, ERR_UNEXPECTED_OBJECT)?;
        cr.set_condition(condition::deleting());

        let name = external_name(cr).unwrap_or_default();
        let result = self
            .client
            .delete_secret(
                &name,
                cr.spec.for_provider.recovery_window_in_days,
                cr.spec.for_provider.force_delete_without_recovery.unwrap_or(false),
            )
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Error::provider(e, ERR_DELETE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use aws_sdk_secretsmanager::operation::describe_secret::DescribeSecretOutput;
    use aws_sdk_secretsmanager::primitives::DateTime;

    use super::*;
    use crate::crd::iam::{RoleParameters, RoleSpec};
    use crate::crd::secretsmanager::SecretSpec;
    use crate::crd::Role;
    use crate::managed::set_external_name;
    use crate::provider::aws::AwsError;

    const SECRET_NAME: &str = "some arbitrary name";
    const PAYLOAD: &str = "s3cret-payload";

    struct MockSecretsClient {
        describe: Box<dyn Fn(&str) -> Result<DescribeSecretOutput, AwsError> + Send + Sync>,
        get_value: Box<dyn Fn(&str) -> Result<Option<String>, AwsError> + Send + Sync>,
        create: Box<dyn Fn(&str, &str) -> Result<(), AwsError> + Send + Sync>,
        update: Box<dyn Fn(&str) -> Result<(), AwsError> + Send + Sync>,
        put_value: Box<dyn Fn(&str, &str) -> Result<(), AwsError> + Send + Sync>,
        delete: Box<dyn Fn(&str, Option<i64>, bool) -> Result<(), AwsError> + Send + Sync>,
    }

    impl Default for MockSecretsClient {
        fn default() -> Self {
            Self {
                describe: Box::new(|_| panic!("unexpected DescribeSecret call")),
                get_value: Box::new(|_| panic!("unexpected GetSecretValue call")),
                create: Box::new(|_, _| panic!("unexpected CreateSecret call")),
                update: Box::new(|_| panic!("unexpected UpdateSecret call")),
                put_value: Box::new(|_, _| panic!("unexpected PutSecretValue call")),
                delete: Box::new(|_, _, _| panic!("unexpected DeleteSecret call")),
            }
        }
    }

    #[async_trait]
    impl SecretsClient for MockSecretsClient {
        async fn describe_secret(
            &self,
            secret_id: &str,
        ) -> Result<DescribeSecretOutput, AwsError> {
            (self.describe)(secret_id)
        }

        async fn get_secret_value(&self, secret_id: &str) -> Result<Option<String>, AwsError> {
            (self.get_value)(secret_id)
        }

        async fn create_secret(
            &self,
            name: &str,
            value: &str,
            _params: &SecretParameters,
        ) -> Result<(), AwsError> {
            (self.create)(name, value)
        }

        async fn update_secret(
            &self,
            secret_id: &str,
            _description: Option<&str>,
            _kms_key_id: Option<&str>,
        ) -> Result<(), AwsError> {
            (self.update)(secret_id)
        }

        async fn put_secret_value(&self, secret_id: &str, value: &str) -> Result<(), AwsError> {
            (self.put_value)(secret_id, value)
        }

        async fn delete_secret(
            &self,
            secret_id: &str,
            recovery_window_in_days: Option<i64>,
            force_delete_without_recovery: bool,
        ) -> Result<(), AwsError> {
            (self.delete)(secret_id, recovery_window_in_days, force_delete_without_recovery)
        }
    }

    struct MockStore {
        update: Box<dyn Fn(&Secret) -> anyhow::Result<()> + Send + Sync>,
    }

    impl Default for MockStore {
        fn default() -> Self {
            Self {
                update: Box::new(|_| panic!("unexpected store update")),
            }
        }
    }

    #[async_trait]
    impl ObjectStore<Secret> for MockStore {
        async fn update(&self, obj: &Secret) -> anyhow::Result<()> {
            (self.update)(obj)
        }
    }

    struct MockFetcher {
        fetch: Box<dyn Fn(&SecretKeySelector) -> anyhow::Result<String> + Send + Sync>,
    }

    impl Default for MockFetcher {
        fn default() -> Self {
            Self {
                fetch: Box::new(|_| Ok(PAYLOAD.to_string())),
            }
        }
    }

    #[async_trait]
    impl ValueFetcher for MockFetcher {
        async fn fetch(&self, selector: &SecretKeySelector) -> anyhow::Result<String> {
            (self.fetch)(selector)
        }
    }

    fn secret() -> Secret {
        let mut cr = Secret::new(
            "test-secret",
            SecretSpec {
                resource_spec: Default::default(),
                for_provider: SecretParameters {
                    secret_ref: Some(SecretKeySelector {
                        namespace: "default".to_string(),
                        name: "payload".to_string(),
                        key: "value".to_string(),
                    }),
                    ..Default::default()
                },
            },
        );
        set_external_name(&mut cr, SECRET_NAME);
        cr
    }

    fn observed() -> DescribeSecretOutput {
        DescribeSecretOutput::builder()
            .arn("arn:aws:secretsmanager:eu-west-1:123456789012:secret:example")
            .name(SECRET_NAME)
            .kms_key_id("alias/aws/secretsmanager")
            .created_date(DateTime::from_secs(0))
            .build()
    }

    fn external(
        client: MockSecretsClient,
        store: MockStore,
        values: MockFetcher,
    ) -> SecretExternal<MockSecretsClient, MockStore, MockFetcher> {
        SecretExternal {
            client,
            store,
            values,
        }
    }

    fn ready_reason(cr: &Secret) -> Option<&str> {
        cr.status.as_ref()?.conditions.first()?.reason.as_deref()
    }

    #[tokio::test]
    async fn observe_rejects_unexpected_kind() {
        let mut mg = Role::new(
            "not-a-secret",
            RoleSpec {
                resource_spec: Default::default(),
                for_provider: RoleParameters::default(),
            },
        );

        let err = external(
            MockSecretsClient::default(),
            MockStore::default(),
            MockFetcher::default(),
        )
        .observe(&mut mg)
        .await
        .unwrap_err();

        assert!(err.is_terminal());
        assert_eq!(err.to_string(), ERR_UNEXPECTED_OBJECT);
        assert!(mg.status.is_none());
    }

    #[tokio::test]
    async fn create_update_and_delete_reject_unexpected_kind() {
        let external = external(
            MockSecretsClient::default(),
            MockStore::default(),
            MockFetcher::default(),
        );
        let mut mg = Role::new(
            "not-a-secret",
            RoleSpec {
                resource_spec: Default::default(),
                for_provider: RoleParameters::default(),
            },
        );

        assert!(external.create(&mut mg).await.unwrap_err().is_terminal());
        assert!(external.update(&mut mg).await.unwrap_err().is_terminal());
        assert!(external.delete(&mut mg).await.unwrap_err().is_terminal());
        assert!(mg.status.is_none());
    }

    #[tokio::test]
    async fn observe_reports_absent_secret() {
        let client = MockSecretsClient {
            describe: Box::new(|_| {
                Err(AwsError::NotFound {
                    code: "ResourceNotFoundException".to_string(),
                })
            }),
            ..Default::default()
        };
        let mut cr = secret();

        let observation = external(client, MockStore::default(), MockFetcher::default())
            .observe(&mut cr)
            .await
            .unwrap();

        assert!(!observation.resource_exists);
        assert!(cr.status.is_none());
    }

    #[tokio::test]
    async fn observe_wraps_describe_failure() {
        let client = MockSecretsClient {
            describe: Box::new(|_| Err(AwsError::other("boom"))),
            ..Default::default()
        };
        let mut cr = secret();

        let err = external(client, MockStore::default(), MockFetcher::default())
            .observe(&mut cr)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), ERR_DESCRIBE);
    }

    #[tokio::test]
    async fn observe_late_initializes_and_reports_in_sync() {
        let client = MockSecretsClient {
            describe: Box::new(|id| {
                assert_eq!(id, SECRET_NAME);
                Ok(observed())
            }),
            get_value: Box::new(|_| Ok(Some(PAYLOAD.to_string()))),
            ..Default::default()
        };
        let stored = Arc::new(AtomicBool::new(false));
        let store = {
            let stored = Arc::clone(&stored);
            MockStore {
                update: Box::new(move |cr| {
                    assert_eq!(
                        cr.spec.for_provider.kms_key_id.as_deref(),
                        Some("alias/aws/secretsmanager")
                    );
                    stored.store(true, Ordering::SeqCst);
                    Ok(())
                }),
            }
        };
        let mut cr = secret();

        let observation = external(client, store, MockFetcher::default())
            .observe(&mut cr)
            .await
            .unwrap();

        assert!(stored.load(Ordering::SeqCst));
        assert!(observation.resource_exists);
        assert!(observation.resource_up_to_date);
        assert_eq!(ready_reason(&cr), Some("Available"));
        let at_provider = cr.status.as_ref().unwrap().at_provider.as_ref().unwrap();
        assert!(at_provider.arn.is_some());
        assert!(at_provider.created_date.is_some());
    }

    #[tokio::test]
    async fn observe_detects_value_drift() {
        let client = MockSecretsClient {
            describe: Box::new(|_| Ok(observed())),
            get_value: Box::new(|_| Ok(Some("stale payload".to_string()))),
            ..Default::default()
        };
        let mut cr = secret();
        cr.spec.for_provider.kms_key_id = Some("alias/aws/secretsmanager".to_string());

        let observation = external(client, MockStore::default(), MockFetcher::default())
            .observe(&mut cr)
            .await
            .unwrap();

        assert!(observation.resource_exists);
        assert!(!observation.resource_up_to_date);
    }

    #[tokio::test]
    async fn observe_treats_missing_current_version_as_drift() {
        let client = MockSecretsClient {
            describe: Box::new(|_| Ok(observed())),
            get_value: Box::new(|_| {
                Err(AwsError::NotFound {
                    code: "ResourceNotFoundException".to_string(),
                })
            }),
            ..Default::default()
        };
        let mut cr = secret();
        cr.spec.for_provider.kms_key_id = Some("alias/aws/secretsmanager".to_string());

        let observation = external(client, MockStore::default(), MockFetcher::default())
            .observe(&mut cr)
            .await
            .unwrap();

        assert!(!observation.resource_up_to_date);
    }

    #[tokio::test]
    async fn observe_marks_scheduled_deletion_unavailable() {
        let client = MockSecretsClient {
            describe: Box::new(|_| {
                Ok(DescribeSecretOutput::builder()
                    .arn("arn:aws:secretsmanager:eu-west-1:123456789012:secret:example")
                    .name(SECRET_NAME)
                    .deleted_date(DateTime::from_secs(1))
                    .build())
            }),
            // Remaining calls panic: a deleted secret takes no further calls.
            ..Default::default()
        };
        let mut cr = secret();

        let observation = external(client, MockStore::default(), MockFetcher::default())
            .observe(&mut cr)
            .await
            .unwrap();

        assert!(observation.resource_exists);
        assert!(observation.resource_up_to_date);
        assert_eq!(ready_reason(&cr), Some("Unavailable"));
        let at_provider = cr.status.as_ref().unwrap().at_provider.as_ref().unwrap();
        assert!(at_provider.deleted_date.is_some());
    }

    #[tokio::test]
    async fn observe_fails_when_value_reference_unresolvable() {
        let client = MockSecretsClient {
            describe: Box::new(|_| Ok(observed())),
            get_value: Box::new(|_| Ok(Some(PAYLOAD.to_string()))),
            ..Default::default()
        };
        let values = MockFetcher {
            fetch: Box::new(|_| Err(anyhow::anyhow!("no such secret"))),
        };
        let mut cr = secret();

        let err = external(client, MockStore::default(), values)
            .observe(&mut cr)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), ERR_RESOLVE_VALUE);
    }

    #[tokio::test]
    async fn create_sends_resolved_payload_and_marks_creating() {
        let client = MockSecretsClient {
            create: Box::new(|name, value| {
                assert_eq!(name, SECRET_NAME);
                assert_eq!(value, PAYLOAD);
                Ok(())
            }),
            ..Default::default()
        };
        let mut cr = secret();

        external(client, MockStore::default(), MockFetcher::default())
            .create(&mut cr)
            .await
            .unwrap();

        assert_eq!(ready_reason(&cr), Some("Creating"));
    }

    #[tokio::test]
    async fn create_marks_creating_even_on_failure() {
        let client = MockSecretsClient {
            create: Box::new(|_, _| Err(AwsError::other("boom"))),
            ..Default::default()
        };
        let mut cr = secret();

        let err = external(client, MockStore::default(), MockFetcher::default())
            .create(&mut cr)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), ERR_CREATE);
        assert_eq!(ready_reason(&cr), Some("Creating"));
    }

    #[tokio::test]
    async fn create_fails_without_a_value_reference() {
        let mut cr = secret();
        cr.spec.for_provider.secret_ref = None;

        let err = external(
            MockSecretsClient::default(),
            MockStore::default(),
            MockFetcher::default(),
        )
        .create(&mut cr)
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), ERR_RESOLVE_VALUE);
    }

    #[tokio::test]
    async fn update_is_noop_when_in_sync() {
        let client = MockSecretsClient {
            describe: Box::new(|_| Ok(observed())),
            get_value: Box::new(|_| Ok(Some(PAYLOAD.to_string()))),
            ..Default::default()
        };
        let mut cr = secret();

        // Both mutation mocks panic if called.
        external(client, MockStore::default(), MockFetcher::default())
            .update(&mut cr)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_fails_fast_on_metadata_failure() {
        let client = MockSecretsClient {
            describe: Box::new(|_| Ok(observed())),
            update: Box::new(|_| Err(AwsError::other("boom"))),
            ..Default::default()
        };
        let mut cr = secret();
        cr.spec.for_provider.description = Some("new description".to_string());

        let err = external(client, MockStore::default(), MockFetcher::default())
            .update(&mut cr)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), ERR_UPDATE);
    }

    #[tokio::test]
    async fn update_replaces_stale_payload() {
        let client = MockSecretsClient {
            describe: Box::new(|_| Ok(observed())),
            get_value: Box::new(|_| Ok(Some("stale payload".to_string()))),
            put_value: Box::new(|id, value| {
                assert_eq!(id, SECRET_NAME);
                assert_eq!(value, PAYLOAD);
                Ok(())
            }),
            ..Default::default()
        };
        let mut cr = secret();

        external(client, MockStore::default(), MockFetcher::default())
            .update(&mut cr)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_passes_recovery_options() {
        let client = MockSecretsClient {
            delete: Box::new(|id, window, force| {
                assert_eq!(id, SECRET_NAME);
                assert_eq!(window, Some(14));
                assert!(!force);
                Ok(())
            }),
            ..Default::default()
        };
        let mut cr = secret();
        cr.spec.for_provider.recovery_window_in_days = Some(14);

        external(client, MockStore::default(), MockFetcher::default())
            .delete(&mut cr)
            .await
            .unwrap();

        assert_eq!(ready_reason(&cr), Some("Deleting"));
    }

    #[tokio::test]
    async fn delete_ignores_absent_secret() {
        let client = MockSecretsClient {
            delete: Box::new(|_, _, _| {
                Err(AwsError::NotFound {
                    code: "ResourceNotFoundException".to_string(),
                })
            }),
            ..Default::default()
        };
        let mut cr = secret();

        external(client, MockStore::default(), MockFetcher::default())
            .delete(&mut cr)
            .await
            .unwrap();

        assert_eq!(ready_reason(&cr), Some("Deleting"));
    }

    #[tokio::test]
    async fn delete_wraps_provider_failure() {
        let client = MockSecretsClient {
            delete: Box::new(|_, _, _| Err(AwsError::other("boom"))),
            ..Default::default()
        };
        let mut cr = secret();

        let err = external(client, MockStore::default(), MockFetcher::default())
            .delete(&mut cr)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), ERR_DELETE);
    }
}

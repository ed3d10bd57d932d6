//! # Role Controller
//!
//! Lifecycle adapter for the `Role` managed resource. The external name of a
//! Role is the IAM role name; updates are split into two provider calls
//! (base attributes, then the trust policy) and fail fast on the first
//! error, leaving the remainder to the next reconciliation.

use std::sync::Arc;

use async_trait::async_trait;
use kube::Client;

use crate::crd::{condition, Role};
use crate::managed::{
    downcast, downcast_ref, external_name, Connector, Error, ExternalClient, ExternalCreation,
    ExternalObservation, ExternalUpdate, KubeStore, Managed, ObjectStore,
};
use crate::provider::aws::iam::{
    base_attributes_match, late_initialize_role, role_observation, role_up_to_date,
    trust_policy_matches, Iam, RoleClient,
};
use crate::provider::aws::{load_sdk_config, GLOBAL_REGION};
use crate::runtime;

const ERR_UNEXPECTED_OBJECT: &str = "managed resource is not a Role";
const ERR_PROVIDER_CONFIG: &str = "cannot resolve provider config";
const ERR_GET: &str = "failed to get the Role";
const ERR_CREATE: &str = "failed to create the Role";
const ERR_UPDATE: &str = "failed to update the Role";
const ERR_DELETE: &str = "failed to delete the Role";
const ERR_KUBE_UPDATE: &str = "cannot late initialize Role";

/// Start the Role controller and block until it terminates.
pub async fn run(client: Client) -> anyhow::Result<()> {
    let connector = Arc::new(RoleConnector::new(client.clone()));
    runtime::run_controller::<Role>(client, connector).await
}

/// Resolves the referenced ProviderConfig into a live IAM client. IAM is
/// global, so the region is always pinned to the partition endpoint.
pub struct RoleConnector {
    client: Client,
}

impl RoleConnector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for RoleConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleConnector").finish_non_exhaustive()
    }
}

#[async_trait]
impl Connector for RoleConnector {
    async fn connect(&self, mg: &dyn Managed) -> Result<Box<dyn ExternalClient>, Error> {
        let cr = downcast_ref::<Role>(mg, ERR_UNEXPECTED_OBJECT)?;
        let config = load_sdk_config(
            &self.client,
            cr.spec.resource_spec.provider_config_name(),
            Some(GLOBAL_REGION),
        )
        .await
        .map_err(|e| Error::resolve(e, ERR_PROVIDER_CONFIG))?;

        Ok(Box::new(RoleExternal {
            client: Iam::new(&config),
            store: KubeStore::new(self.client.clone()),
        }))
    }
}

struct RoleExternal<C, S> {
    client: C,
    store: S,
}

#[async_trait]
impl<C, S> ExternalClient for RoleExternal<C, S>
where
    C: RoleClient,
    S: ObjectStore<Role>,
{
    async fn observe(&self, mg: &mut dyn Managed) -> Result<ExternalObservation, Error> {
        let cr = downcast::<Role>(mg, ERR_UNEXPECTED_OBJECT)?;
        let Some(name) = external_name(cr) else {
            return Ok(ExternalObservation::default());
        };

        let observed = match self.client.get_role(&name).await {
            Ok(role) => role,
            Err(e) if e.is_not_found() => return Ok(ExternalObservation::default()),
            Err(e) => return Err(Error::provider(e, ERR_GET)),
        };

        let before = cr.spec.for_provider.clone();
        late_initialize_role(&mut cr.spec.for_provider, &observed);
        if cr.spec.for_provider != before {
            self.store
                .update(cr)
                .await
                .map_err(|e| Error::store(e, ERR_KUBE_UPDATE))?;
        }

        cr.set_condition(condition::available());
        cr.set_observation(role_observation(&observed));

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: role_up_to_date(&cr.spec.for_provider, &observed),
        })
    }

    async fn create(&self, mg: &mut dyn Managed) -> Result<ExternalCreation, Error> {
        let cr = downcast::<Role>(mg, ERR_UNEXPECTED_OBJECT)?;
        cr.set_condition(condition::creating());

        let name = external_name(cr).unwrap_or_default();
        self.client
            .create_role(&name, &cr.spec.for_provider)
            .await
            .map_err(|e| Error::provider(e, ERR_CREATE))?;

        Ok(ExternalCreation::default())
    }

    async fn update(&self, mg: &mut dyn Managed) -> Result<ExternalUpdate, Error> {
        let cr = downcast::<Role>(mg, ERR_UNEXPECTED_OBJECT)?;
        let name = external_name(cr).unwrap_or_default();

        let observed = self
            .client
            .get_role(&name)
            .await
            .map_err(|e| Error::provider(e, ERR_GET))?;

        if !base_attributes_match(&cr.spec.for_provider, &observed) {
            self.client
                .update_role(
                    &name,
                    cr.spec.for_provider.description.as_deref(),
                    cr.spec.for_provider.max_session_duration,
                )
                .await
                .map_err(|e| Error::provider(e, ERR_UPDATE))?;
        }

        if !trust_policy_matches(&cr.spec.for_provider, &observed) {
            self.client
                .update_assume_role_policy(
                    &name,
                    &cr.spec.for_provider.assume_role_policy_document,
                )
                .await
                .map_err(|e| Error::provider(e, ERR_UPDATE))?;
        }

        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mg: &mut dyn Managed) -> Result<(), Error> {
        let cr = downcast::<Role>(mg, ERR_UNEXPECTED_OBJECT)?;
        cr.set_condition(condition::deleting());

        let name = external_name(cr).unwrap_or_default();
        match self.client.delete_role(&name).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Error::provider(e, ERR_DELETE)),
        }
    }
}

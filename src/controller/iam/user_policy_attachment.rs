//! # UserPolicyAttachment Controller
//!
//! Lifecycle adapter for the `UserPolicyAttachment` managed resource. An
//! attachment has no mutable attributes: its (user name, policy ARN) pair is
//! the natural key, so an attachment that exists is always up to date and
//! Update is a documented no-op.

use std::sync::Arc;

use async_trait::async_trait;
use kube::Client;

use crate::crd::iam::UserPolicyAttachmentObservation;
use crate::crd::{condition, UserPolicyAttachment};
use crate::managed::{
    downcast, downcast_ref, Connector, Error, ExternalClient, ExternalCreation,
    ExternalObservation, ExternalUpdate, Managed,
};
use crate::provider::aws::iam::{Iam, UserPolicyAttachmentClient};
use crate::provider::aws::{load_sdk_config, GLOBAL_REGION};
use crate::runtime;

const ERR_UNEXPECTED_OBJECT: &str = "managed resource is not a UserPolicyAttachment";
const ERR_PROVIDER_CONFIG: &str = "cannot resolve provider config";
const ERR_GET: &str = "failed to get UserPolicyAttachments for user";
const ERR_ATTACH: &str = "failed to attach the policy to user";
const ERR_DETACH: &str = "failed to detach the policy to user";

/// Start the UserPolicyAttachment controller and block until it terminates.
pub async fn run(client: Client) -> anyhow::Result<()> {
    let connector = Arc::new(UserPolicyAttachmentConnector::new(client.clone()));
    runtime::run_controller::<UserPolicyAttachment>(client, connector).await
}

/// Resolves the referenced ProviderConfig into a live IAM client.
pub struct UserPolicyAttachmentConnector {
    client: Client,
}

impl UserPolicyAttachmentConnector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for UserPolicyAttachmentConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPolicyAttachmentConnector")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Connector for UserPolicyAttachmentConnector {
    async fn connect(&self, mg: &dyn Managed) -> Result<Box<dyn ExternalClient>, Error> {
        let cr = downcast_ref::<UserPolicyAttachment>(mg, ERR_UNEXPECTED_OBJECT)?;
        let config = load_sdk_config(
            &self.client,
            cr.spec.resource_spec.provider_config_name(),
            Some(GLOBAL_REGION),
        )
        .await
        .map_err(|e| Error::resolve(e, ERR_PROVIDER_CONFIG))?;

        Ok(Box::new(UserPolicyAttachmentExternal {
            client: Iam::new(&config),
        }))
    }
}

struct UserPolicyAttachmentExternal<C> {
    client: C,
}

#[async_trait]
impl<C> ExternalClient for UserPolicyAttachmentExternal<C>
where
    C: UserPolicyAttachmentClient,
{
    async fn observe(&self, mg: &mut dyn Managed) -> Result<ExternalObservation, Error> {
        let cr = downcast::<UserPolicyAttachment>(mg, ERR_UNEXPECTED_OBJECT)?;

        let attached = match self
            .client
            .list_attached_user_policies(&cr.spec.for_provider.user_name)
            .await
        {
            Ok(attached) => attached,
            // An absent user means an absent attachment.
            Err(e) if e.is_not_found() => return Ok(ExternalObservation::default()),
            Err(e) => return Err(Error::provider(e, ERR_GET)),
        };

        let found = attached
            .iter()
            .any(|p| p.policy_arn() == Some(cr.spec.for_provider.policy_arn.as_str()));
        if !found {
            return Ok(ExternalObservation::default());
        }

        cr.set_condition(condition::available());
        cr.set_observation(UserPolicyAttachmentObservation {
            attached_policy_arn: Some(cr.spec.for_provider.policy_arn.clone()),
        });

        // The natural key is the whole desired state, so an existing
        // attachment can never drift.
        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: true,
        })
    }

    async fn create(&self, mg: &mut dyn Managed) -> Result<ExternalCreation, Error> {
        let cr = downcast::<UserPolicyAttachment>(mg, ERR_UNEXPECTED_OBJECT)?;
        cr.set_condition(condition::creating());

        self.client
            .attach_user_policy(
                &cr.spec.for_provider.user_name,
                &cr.spec.for_provider.policy_arn,
            )
            .await
            .map_err(|e| Error::provider(e, ERR_ATTACH))?;

        Ok(ExternalCreation::default())
    }

    async fn update(&self, mg: &mut dyn Managed) -> Result<ExternalUpdate, Error> {
        downcast::<UserPolicyAttachment>(mg, ERR_UNEXPECTED_OBJECT)?;
        // Attachments are immutable; any spec change re-keys the resource
        // and is reconciled through delete and create.
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, mg: &mut dyn Managed) -> Result<(), Error> {
        let cr = downcast::<UserPolicyAttachment>(mg, ERR_UNEXPECTED_OBJECT)?;
        cr.set_condition(condition::deleting());

        match self
            .client
            .detach_user_policy(
                &cr.spec.for_provider.user_name,
                &cr.spec.for_provider.policy_arn,
            )
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Error::provider(e, ERR_DETACH)),
        }
    }
}

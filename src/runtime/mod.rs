//! # Reconciliation Runtime
//!
//! Generic watch-loop wiring shared by every resource kind. The runtime owns
//! scheduling, finalizers, external-name defaulting, status persistence and
//! retry policy; the per-kind adapters behind [`Connector`] stay free of all
//! of it and are driven purely through the lifecycle contract.

pub mod error_policy;
pub mod initialization;
pub mod server;

pub use error_policy::error_policy;
pub use initialization::{initialize, InitializationResult};

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client};
use kube_runtime::controller::{Action, Controller};
use kube_runtime::finalizer::{finalizer, Event};
use kube_runtime::watcher;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::constants;
use crate::managed::{
    self, external_name, set_external_name, Connector, ExternalClient, Managed, ManagedResource,
    EXTERNAL_NAME_ANNOTATION,
};
use crate::observability::metrics;

/// Shared state handed to every reconciliation pass of one resource kind.
pub struct Context {
    pub client: Client,
    pub connector: Arc<dyn Connector>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}

/// Errors surfaced by the reconcile driver.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    External(#[from] managed::Error),

    #[error("kubernetes api error: {0}")]
    Kube(#[from] kube::Error),

    #[error("serializing managed resource: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Finalizer(#[from] Box<kube_runtime::finalizer::Error<ReconcileError>>),
}

impl ReconcileError {
    /// True for wiring mistakes that must not be retried; the error policy
    /// parks the object until its spec changes.
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::External(e) => e.is_terminal(),
            Self::Finalizer(e) => match e.as_ref() {
                kube_runtime::finalizer::Error::ApplyFailed(err)
                | kube_runtime::finalizer::Error::CleanupFailed(err) => err.is_terminal(),
                _ => false,
            },
            _ => false,
        }
    }
}

/// Start a controller for one resource kind and block until it terminates.
pub async fn run_controller<T>(client: Client, connector: Arc<dyn Connector>) -> anyhow::Result<()>
where
    T: ManagedResource,
{
    let api: Api<T> = Api::all(client.clone());
    let context = Arc::new(Context { client, connector });
    let kind = T::kind(&());

    info!(%kind, "starting controller");
    Controller::new(api, watcher::Config::default())
        .shutdown_on_signal()
        .run(reconcile::<T>, error_policy::<T>, context)
        .for_each(|result| async move {
            match result {
                Ok((obj, _)) => debug!(object = %obj.name, "reconciliation complete"),
                Err(e) => warn!(error = %e, "controller stream error"),
            }
        })
        .await;
    info!(%kind, "controller terminated");

    Ok(())
}

/// One reconciliation pass: finalizer bookkeeping around apply/cleanup.
pub async fn reconcile<T>(obj: Arc<T>, ctx: Arc<Context>) -> Result<Action, ReconcileError>
where
    T: ManagedResource,
{
    let kind = T::kind(&());
    metrics::increment_reconciliations(&kind);
    let timer = std::time::Instant::now();

    let api: Api<T> = Api::all(ctx.client.clone());
    let result = finalizer(&api, constants::FINALIZER, obj, |event| async {
        match event {
            Event::Apply(obj) => apply(obj, &ctx).await,
            Event::Cleanup(obj) => cleanup(obj, &ctx).await,
        }
    })
    .await
    .map_err(|e| ReconcileError::Finalizer(Box::new(e)));

    metrics::observe_reconcile_duration(&kind, timer.elapsed().as_secs_f64());
    result
}

/// The apply half of a pass: default the external name, connect, observe,
/// then create or update as the observation dictates. Status is patched back
/// even when the lifecycle call failed, so conditions set before the failing
/// call (Creating, Deleting) survive it.
async fn apply<T>(obj: Arc<T>, ctx: &Context) -> Result<Action, ReconcileError>
where
    T: ManagedResource,
{
    let kind = T::kind(&());
    let name = obj
        .meta()
        .name
        .clone()
        .unwrap_or_default();
    let api: Api<T> = Api::all(ctx.client.clone());
    let mut mg = (*obj).clone();

    if external_name(&mg).is_none() {
        set_external_name(&mut mg, &name);
        let patch = json!({
            "metadata": { "annotations": { EXTERNAL_NAME_ANNOTATION: name } }
        });
        api.patch(
            &name,
            &PatchParams::apply(constants::FIELD_MANAGER),
            &Patch::Merge(&patch),
        )
        .await?;
        info!(%kind, object = %name, "defaulted external name");
    }

    let external = ctx.connector.connect(&mg).await?;
    let outcome = drive(external.as_ref(), &mut mg, &kind, &name).await;
    patch_status(&api, &name, &mg).await?;
    outcome.map_err(ReconcileError::External)
}

/// Observe and act. Split out so `apply` can persist status regardless of
/// which lifecycle call failed.
async fn drive<T>(
    external: &dyn ExternalClient,
    mg: &mut T,
    kind: &str,
    name: &str,
) -> Result<Action, managed::Error>
where
    T: Managed,
{
    let observation = external.observe(mg).await?;

    if !observation.resource_exists {
        info!(%kind, object = %name, "external resource absent, creating");
        external.create(mg).await?;
        metrics::increment_external_creates(kind);
        return Ok(Action::requeue(Duration::from_secs(
            constants::SHORT_REQUEUE_SECS,
        )));
    }

    if !observation.resource_up_to_date {
        info!(%kind, object = %name, "external resource diverged, updating");
        external.update(mg).await?;
        metrics::increment_external_updates(kind);
        return Ok(Action::requeue(Duration::from_secs(
            constants::SHORT_REQUEUE_SECS,
        )));
    }

    debug!(%kind, object = %name, "external resource in sync");
    Ok(Action::requeue(Duration::from_secs(
        constants::DEFAULT_REQUEUE_SECS,
    )))
}

/// The cleanup half of a pass: honor the deletion policy, then delete the
/// external resource. Returning Ok lets the finalizer machinery remove the
/// finalizer and release the object.
async fn cleanup<T>(obj: Arc<T>, ctx: &Context) -> Result<Action, ReconcileError>
where
    T: ManagedResource,
{
    let kind = T::kind(&());
    let name = obj
        .meta()
        .name
        .clone()
        .unwrap_or_default();
    let mut mg = (*obj).clone();

    if mg.deletion_policy() == crate::crd::DeletionPolicy::Orphan {
        info!(%kind, object = %name, "deletion policy is Orphan, leaving external resource in place");
        return Ok(Action::await_change());
    }

    let external = ctx.connector.connect(&mg).await?;
    external.delete(&mut mg).await?;
    metrics::increment_external_deletes(&kind);
    info!(%kind, object = %name, "external resource deleted");

    Ok(Action::await_change())
}

/// Patch the resource status back to the cluster with a merge patch. A
/// resource that never grew a status is left untouched.
async fn patch_status<T>(api: &Api<T>, name: &str, mg: &T) -> Result<(), ReconcileError>
where
    T: ManagedResource,
{
    let Some(status) = status_document(mg)? else {
        return Ok(());
    };
    api.patch_status(
        name,
        &PatchParams::apply(constants::FIELD_MANAGER),
        &Patch::Merge(json!({ "status": status })),
    )
    .await?;
    Ok(())
}

/// The resource's status subtree, if it has one.
fn status_document<T: Serialize>(mg: &T) -> Result<Option<serde_json::Value>, serde_json::Error> {
    let mut value = serde_json::to_value(mg)?;
    Ok(match value.get_mut("status") {
        Some(status) if !status.is_null() => Some(status.take()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::crd::iam::{RoleParameters, RoleSpec};
    use crate::crd::{condition, Role};
    use crate::managed::{ExternalCreation, ExternalObservation, ExternalUpdate};

    struct ScriptedExternal {
        observation: ExternalObservation,
        created: std::sync::atomic::AtomicBool,
        updated: std::sync::atomic::AtomicBool,
    }

    impl ScriptedExternal {
        fn new(observation: ExternalObservation) -> Self {
            Self {
                observation,
                created: Default::default(),
                updated: Default::default(),
            }
        }
    }

    #[async_trait]
    impl ExternalClient for ScriptedExternal {
        async fn observe(&self, _mg: &mut dyn Managed) -> Result<ExternalObservation, managed::Error> {
            Ok(self.observation)
        }

        async fn create(&self, _mg: &mut dyn Managed) -> Result<ExternalCreation, managed::Error> {
            self.created.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(ExternalCreation::default())
        }

        async fn update(&self, _mg: &mut dyn Managed) -> Result<ExternalUpdate, managed::Error> {
            self.updated.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(ExternalUpdate::default())
        }

        async fn delete(&self, _mg: &mut dyn Managed) -> Result<(), managed::Error> {
            Ok(())
        }
    }

    fn role() -> Role {
        Role::new(
            "test-role",
            RoleSpec {
                resource_spec: Default::default(),
                for_provider: RoleParameters::default(),
            },
        )
    }

    #[tokio::test]
    async fn drive_creates_absent_resources() {
        let external = ScriptedExternal::new(ExternalObservation {
            resource_exists: false,
            resource_up_to_date: false,
        });
        let mut mg = role();

        drive(&external, &mut mg, "Role", "test-role").await.unwrap();

        assert!(external.created.load(std::sync::atomic::Ordering::SeqCst));
        assert!(!external.updated.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn drive_updates_stale_resources() {
        let external = ScriptedExternal::new(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: false,
        });
        let mut mg = role();

        drive(&external, &mut mg, "Role", "test-role").await.unwrap();

        assert!(!external.created.load(std::sync::atomic::Ordering::SeqCst));
        assert!(external.updated.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn drive_leaves_in_sync_resources_alone() {
        let external = ScriptedExternal::new(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: true,
        });
        let mut mg = role();

        drive(&external, &mut mg, "Role", "test-role").await.unwrap();

        assert!(!external.created.load(std::sync::atomic::Ordering::SeqCst));
        assert!(!external.updated.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn status_document_skips_statusless_resources() {
        let mg = role();
        assert!(status_document(&mg).unwrap().is_none());
    }

    #[test]
    fn status_document_extracts_conditions() {
        let mut mg = role();
        mg.set_condition(condition::available());

        let status = status_document(&mg).unwrap().expect("status present");
        assert_eq!(
            status["conditions"][0]["reason"],
            serde_json::json!("Available")
        );
    }

    #[test]
    fn unexpected_kind_errors_are_terminal_through_the_finalizer_wrapper() {
        let inner = ReconcileError::External(managed::Error::UnexpectedObjectKind(
            "managed resource is not a Role",
        ));
        let wrapped = ReconcileError::Finalizer(Box::new(
            kube_runtime::finalizer::Error::ApplyFailed(inner),
        ));
        assert!(wrapped.is_terminal());

        let kube_err = ReconcileError::External(managed::Error::provider(
            std::io::Error::other("boom"),
            "failed to get the Role",
        ));
        assert!(!kube_err.is_terminal());
    }
}

//! # Managed Resource Lifecycle Contract
//!
//! The four-operation lifecycle every resource adapter implements, plus the
//! connector that binds an adapter to live provider credentials.
//!
//! The reconciliation runtime drives adapters exclusively through these
//! traits: it calls [`Connector::connect`] once per pass, then
//! [`ExternalClient::observe`] and, depending on the observation,
//! [`ExternalClient::create`], [`ExternalClient::update`] or
//! [`ExternalClient::delete`]. Adapters hold no cross-invocation state and
//! never retry internally; every failure is surfaced once, tagged with the
//! operation that failed, and retry policy stays with the runtime.

pub mod store;

pub use store::{KubeStore, ObjectStore};

use std::any::Any;

use async_trait::async_trait;

use crate::crd::DeletionPolicy;

/// Annotation correlating a managed resource to exactly one live provider
/// resource. Defaulted to the object name by the runtime before the adapter
/// first runs, and immutable once the resource is observed to exist.
pub const EXTERNAL_NAME_ANNOTATION: &str = "aws.controller.dev/external-name";

/// A cluster-stored object describing desired state of an external AWS
/// resource. Object safety is deliberate: the runtime hands adapters a
/// `&mut dyn Managed`, and each adapter downcasts to the one concrete kind
/// it was built for.
pub trait Managed: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// What to do with the external resource when the managed resource is
    /// deleted from the cluster.
    fn deletion_policy(&self) -> DeletionPolicy;
}

/// Downcast a managed resource to the adapter's concrete kind, failing with
/// the adapter's "unexpected object kind" message. This is the single type
/// guard at every lifecycle entry point; the error is a wiring mistake and
/// is never retried.
pub fn downcast<'a, T: Managed>(
    mg: &'a mut dyn Managed,
    unexpected: &'static str,
) -> Result<&'a mut T, Error> {
    mg.as_any_mut()
        .downcast_mut::<T>()
        .ok_or(Error::UnexpectedObjectKind(unexpected))
}

/// Immutable variant of [`downcast`], used by connectors.
pub fn downcast_ref<'a, T: Managed>(
    mg: &'a dyn Managed,
    unexpected: &'static str,
) -> Result<&'a T, Error> {
    mg.as_any()
        .downcast_ref::<T>()
        .ok_or(Error::UnexpectedObjectKind(unexpected))
}

/// The external name correlating the managed resource to its live provider
/// counterpart. Empty/absent means the resource has never been named.
pub fn external_name<T: kube::Resource>(mg: &T) -> Option<String> {
    mg.meta()
        .annotations
        .as_ref()
        .and_then(|a| a.get(EXTERNAL_NAME_ANNOTATION))
        .cloned()
}

/// Set the external name annotation on the managed resource.
pub fn set_external_name<T: kube::Resource>(mg: &mut T, name: &str) {
    mg.meta_mut()
        .annotations
        .get_or_insert_with(Default::default)
        .insert(EXTERNAL_NAME_ANNOTATION.to_string(), name.to_string());
}

/// Outcome of observing the external resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    /// Whether a live provider resource correlated to this managed resource
    /// exists at all. `false` signals the runtime to create it; it is never
    /// an error condition.
    pub resource_exists: bool,
    /// Whether the live resource matches the desired configuration. Only
    /// meaningful when `resource_exists` is true.
    pub resource_up_to_date: bool,
}

/// Outcome of a create call. Empty in the base case: no connection details
/// are published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalCreation {}

/// Outcome of an update call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalUpdate {}

/// A resource adapter bound to a live provider client, driving one resource
/// kind through its lifecycle.
#[async_trait]
pub trait ExternalClient: Send + Sync {
    /// Fetch the current provider-side state, late-initialize unset optional
    /// spec fields from it, record the observation on the resource status
    /// and report existence and up-to-dateness.
    async fn observe(&self, mg: &mut dyn Managed) -> Result<ExternalObservation, Error>;

    /// Create the external resource from the desired state. The `Creating`
    /// condition is set before the provider call is issued, so a crash
    /// mid-create is visible on the next pass.
    async fn create(&self, mg: &mut dyn Managed) -> Result<ExternalCreation, Error>;

    /// Bring the external resource in line with the desired state. Issues
    /// one provider call per divergent sub-resource and fails fast on the
    /// first error; the next reconciliation retries the rest.
    async fn update(&self, mg: &mut dyn Managed) -> Result<ExternalUpdate, Error>;

    /// Delete the external resource. Deleting an already-absent resource is
    /// success, not an error.
    async fn delete(&self, mg: &mut dyn Managed) -> Result<(), Error>;
}

/// Resolves provider credentials/config referenced by a managed resource and
/// produces a live [`ExternalClient`]. Resolution failure is fatal for the
/// pass; no partial adapter is ever returned.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, mg: &dyn Managed) -> Result<Box<dyn ExternalClient>, Error>;
}

/// Bound alias for the kube-facing side of a managed resource kind: the
/// lifecycle contract plus everything the watch machinery and status
/// patching need. Blanket-implemented; adapters never implement it by hand.
pub trait ManagedResource:
    Managed
    + kube::Resource<Scope = k8s_openapi::ClusterResourceScope, DynamicType = ()>
    + Clone
    + serde::Serialize
    + serde::de::DeserializeOwned
    + std::fmt::Debug
    + Send
    + Sync
    + 'static
{
}

impl<T> ManagedResource for T where
    T: Managed
        + kube::Resource<Scope = k8s_openapi::ClusterResourceScope, DynamicType = ()>
        + Clone
        + serde::Serialize
        + serde::de::DeserializeOwned
        + std::fmt::Debug
        + Send
        + Sync
        + 'static
{
}

/// Adapter error taxonomy. Every provider failure is wrapped with a short
/// static tag naming the operation that failed, preserving the cause for
/// diagnostics. Provider "not found" responses never surface here: Observe
/// maps them to `resource_exists: false` and Delete treats them as success.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The adapter was invoked with the wrong resource kind. A wiring
    /// mistake: reported, never retried.
    #[error("{0}")]
    UnexpectedObjectKind(&'static str),

    /// A provider call failed for a reason other than "not found".
    #[error("{tag}")]
    Provider {
        tag: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Writing late-initialized fields back to the cluster store failed.
    #[error("{tag}")]
    Store {
        tag: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Resolving a desired-state input (provider config, referenced secret
    /// payload) failed.
    #[error("{tag}")]
    Resolve {
        tag: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    /// Wrap a provider failure with the fixed operation tag.
    pub fn provider(
        source: impl std::error::Error + Send + Sync + 'static,
        tag: &'static str,
    ) -> Self {
        Self::Provider {
            tag,
            source: Box::new(source),
        }
    }

    /// Wrap a cluster store failure with the fixed operation tag.
    pub fn store(source: anyhow::Error, tag: &'static str) -> Self {
        Self::Store { tag, source }
    }

    /// Wrap an input resolution failure with the fixed operation tag.
    pub fn resolve(source: anyhow::Error, tag: &'static str) -> Self {
        Self::Resolve { tag, source }
    }

    /// True for wiring mistakes the runtime must report without retrying.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::UnexpectedObjectKind(_))
    }
}

macro_rules! impl_managed {
    ($kind:ty) => {
        impl Managed for $kind {
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
            fn deletion_policy(&self) -> DeletionPolicy {
                self.spec.resource_spec.deletion_policy
            }
        }
    };
}

impl_managed!(crate::crd::Role);
impl_managed!(crate::crd::UserPolicyAttachment);
impl_managed!(crate::crd::Secret);

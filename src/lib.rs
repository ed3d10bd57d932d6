//! # AWS Resource Controller
//!
//! A Kubernetes controller set that reconciles cluster-stored managed
//! resources against live AWS objects through an
//! observe/create/update/delete lifecycle.
//!
//! ## Overview
//!
//! Each managed resource kind is a cluster-scoped custom resource whose spec
//! carries the desired provider-side state and whose status carries
//! conditions and the last observed provider-side attributes:
//!
//! 1. **IAM Role** - role attributes and the assume-role (trust) policy
//!    document, compared canonically
//! 2. **IAM UserPolicyAttachment** - attachment of a managed policy to a
//!    user; immutable, keyed by (user name, policy ARN)
//! 3. **Secrets Manager Secret** - metadata plus a payload drawn from a
//!    referenced Kubernetes Secret at reconcile time
//!
//! Credentials come from a `ProviderConfig` resource: either a static key
//! pair stored in a Kubernetes Secret or the pod's ambient identity.
//!
//! ## Features
//!
//! - **External-name correlation**: one managed resource maps to at most one
//!   live AWS resource via the external-name annotation
//! - **Late initialization**: unset optional spec fields are filled from
//!   observed values, never overwriting user-set values
//! - **Finalizer-backed deletion**: external resources are deleted (or
//!   orphaned, per deletion policy) before the object is released
//! - **Prometheus metrics**: per-kind reconciliation counters and durations
//! - **Health probes**: HTTP endpoints for liveness and readiness checks

pub mod constants;
pub mod controller;
pub mod crd;
pub mod managed;
pub mod observability;
pub mod provider;
pub mod runtime;

//! # Error Policy
//!
//! Retry policy for failed reconciliation passes. Adapters never retry
//! internally; every requeue decision is made here.

use std::sync::Arc;
use std::time::Duration;

use kube_runtime::controller::Action;
use tracing::error;

use crate::constants;
use crate::managed::ManagedResource;
use crate::observability::metrics;
use crate::runtime::{Context, ReconcileError};

/// Tag the error, bump the per-kind error metric and decide the requeue.
/// Wiring mistakes (wrong-kind objects) are terminal: the object is parked
/// until its spec changes instead of being retried into the same failure.
pub fn error_policy<T>(obj: Arc<T>, error: &ReconcileError, _ctx: Arc<Context>) -> Action
where
    T: ManagedResource,
{
    let kind = T::kind(&());
    let name = obj.meta().name.as_deref().unwrap_or("unknown");

    error!(%kind, object = %name, error = %error, "reconciliation failed");
    metrics::increment_reconciliation_errors(&kind);

    if error.is_terminal() {
        return Action::await_change();
    }
    Action::requeue(Duration::from_secs(constants::ERROR_REQUEUE_SECS))
}

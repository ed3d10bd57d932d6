//! # Reconciliation Metrics
//!
//! Counters and histograms for the reconcile loop, labelled by resource
//! kind so one controller binary serving several kinds stays observable
//! per kind.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{HistogramVec, IntCounterVec};
use std::sync::LazyLock;

static RECONCILIATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "aws_resource_controller_reconciliations_total",
            "Total number of reconciliation passes",
        ),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "aws_resource_controller_reconciliation_errors_total",
            "Total number of failed reconciliation passes",
        ),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILE_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "aws_resource_controller_reconcile_duration_seconds",
            "Duration of reconciliation passes in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
        &["kind"],
    )
    .expect("Failed to create RECONCILE_DURATION metric - this should never happen")
});

static EXTERNAL_CREATES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "aws_resource_controller_external_creates_total",
            "Total number of external resources created",
        ),
        &["kind"],
    )
    .expect("Failed to create EXTERNAL_CREATES_TOTAL metric - this should never happen")
});

static EXTERNAL_UPDATES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "aws_resource_controller_external_updates_total",
            "Total number of external resource updates issued",
        ),
        &["kind"],
    )
    .expect("Failed to create EXTERNAL_UPDATES_TOTAL metric - this should never happen")
});

static EXTERNAL_DELETES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "aws_resource_controller_external_deletes_total",
            "Total number of external resources deleted",
        ),
        &["kind"],
    )
    .expect("Failed to create EXTERNAL_DELETES_TOTAL metric - this should never happen")
});

/// Register reconciliation metrics with the registry
pub(crate) fn register_reconcile_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILE_DURATION.clone()))?;
    REGISTRY.register(Box::new(EXTERNAL_CREATES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EXTERNAL_UPDATES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EXTERNAL_DELETES_TOTAL.clone()))?;
    Ok(())
}

// Public functions for reconciliation metrics

pub fn increment_reconciliations(kind: &str) {
    RECONCILIATIONS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn increment_reconciliation_errors(kind: &str) {
    RECONCILIATION_ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn observe_reconcile_duration(kind: &str, duration: f64) {
    RECONCILE_DURATION.with_label_values(&[kind]).observe(duration);
}

pub fn increment_external_creates(kind: &str) {
    EXTERNAL_CREATES_TOTAL.with_label_values(&[kind]).inc();
}

pub fn increment_external_updates(kind: &str) {
    EXTERNAL_UPDATES_TOTAL.with_label_values(&[kind]).inc();
}

pub fn increment_external_deletes(kind: &str) {
    EXTERNAL_DELETES_TOTAL.with_label_values(&[kind]).inc();
}

//! # Metrics
//!
//! Prometheus metric registration and text-format rendering. All metrics
//! live in a dedicated registry so the `/metrics` endpoint only exposes
//! controller metrics.

pub mod reconcile_metrics;
pub(crate) mod registry;

pub use reconcile_metrics::*;

use anyhow::Result;
use prometheus::Encoder;

/// Register all controller metrics with the registry. Called once during
/// initialization; double registration is an error.
pub fn register_metrics() -> Result<()> {
    reconcile_metrics::register_reconcile_metrics()
}

/// Render all registered metrics in the Prometheus text format.
pub fn gather() -> Result<String> {
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry::REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

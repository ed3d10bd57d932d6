//! # Observability
//!
//! Prometheus metrics for the controller. The probe/metrics HTTP server
//! that exposes them lives in [`crate::runtime::server`].

pub mod metrics;

//! # Resource Controllers
//!
//! One module per managed resource kind. Each module wires a connector and
//! a lifecycle adapter for its kind and exposes a `run` entry point that
//! registers the kind with the reconciliation runtime.

pub mod iam;
pub mod secretsmanager;

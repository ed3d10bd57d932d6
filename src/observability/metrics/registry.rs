//! # Metrics Registry
//!
//! Dedicated Prometheus registry for controller metrics.

use prometheus::Registry;
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

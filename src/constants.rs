//! # Constants
//!
//! Shared controller constants: finalizer and field-manager identity,
//! requeue intervals, and probe/metrics server defaults.

/// Finalizer guarding external-resource cleanup on managed resource delete.
pub const FINALIZER: &str = "aws.controller.dev/finalizer";

/// Field manager used for server-side patches issued by the controller.
pub const FIELD_MANAGER: &str = "aws-resource-controller";

/// Steady-state drift-detection interval for in-sync resources.
pub const DEFAULT_REQUEUE_SECS: u64 = 300;

/// Short requeue after a create or update so the next observation confirms
/// the result quickly.
pub const SHORT_REQUEUE_SECS: u64 = 30;

/// Requeue interval after a non-terminal reconciliation error.
pub const ERROR_REQUEUE_SECS: u64 = 60;

/// Default port for the probe/metrics HTTP server.
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// How long to wait for the HTTP server to bind before giving up.
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 30;

/// Poll interval while waiting for the HTTP server to bind.
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 100;

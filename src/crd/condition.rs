//! # Resource Conditions
//!
//! Condition types and constructors shared by all managed resource statuses.
//!
//! A managed resource carries at most one condition per type; setting a
//! condition replaces the previous condition of the same type wholesale.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition type used for lifecycle transitions.
pub const TYPE_READY: &str = "Ready";

/// Condition represents a condition of a managed resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition
    pub r#type: String,
    /// Status of the condition (True, False, Unknown)
    pub status: String,
    /// Last transition time (RFC3339)
    #[serde(default)]
    pub last_transition_time: Option<String>,
    /// Reason for the condition
    #[serde(default)]
    pub reason: Option<String>,
    /// Message describing the condition
    #[serde(default)]
    pub message: Option<String>,
}

impl Condition {
    fn ready(status: &str, reason: &str) -> Self {
        Self {
            r#type: TYPE_READY.to_string(),
            status: status.to_string(),
            last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
            reason: Some(reason.to_string()),
            message: None,
        }
    }
}

/// The external resource exists and matches the desired state.
pub fn available() -> Condition {
    Condition::ready("True", "Available")
}

/// The external resource exists but is not usable (e.g. observed divergence
/// that cannot be corrected automatically).
pub fn unavailable() -> Condition {
    Condition::ready("False", "Unavailable")
}

/// A create call has been (or is about to be) issued for the external
/// resource. Set before the provider call so that a crash mid-create is
/// visible on the next reconciliation.
pub fn creating() -> Condition {
    Condition::ready("False", "Creating")
}

/// A delete call has been (or is about to be) issued for the external
/// resource. Set before the provider call regardless of its outcome.
pub fn deleting() -> Condition {
    Condition::ready("False", "Deleting")
}

/// Replace the condition of the same type, or append when no condition of
/// that type is present. Keeps at most one condition per type.
pub fn upsert(conditions: &mut Vec<Condition>, condition: Condition) {
    match conditions.iter_mut().find(|c| c.r#type == condition.r#type) {
        Some(existing) => *existing = condition,
        None => conditions.push(condition),
    }
}

//! # AWS Client Facades
//!
//! SDK configuration resolution and the shared error classification used by
//! every AWS facade. Facade traits live next to the service they wrap
//! ([`iam`], [`secrets_manager`]).

pub mod config;
pub mod iam;
pub mod secrets_manager;

pub use config::{load_sdk_config, GLOBAL_REGION};

use aws_sdk_iam::error::{ProvideErrorMetadata, SdkError};

/// Provider error codes that mean the requested resource does not exist.
const NOT_FOUND_CODES: &[&str] = &[
    "NoSuchEntity",
    "NoSuchEntityException",
    "ResourceNotFoundException",
];

/// A classified provider failure. Facade implementations translate raw SDK
/// errors into this type; adapters only ever ask [`AwsError::is_not_found`].
#[derive(Debug, thiserror::Error)]
pub enum AwsError {
    /// The provider reported that the requested entity does not exist.
    #[error("{code}: entity not found")]
    NotFound { code: String },

    /// Any other provider failure (throttling, access denied, 5xx, network).
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl AwsError {
    /// The predicate the reconciliation adapters use to decide whether an
    /// error means "absent" rather than "failed".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// A generic provider failure from a plain message. Mostly useful in
    /// tests and for SDK responses that are structurally malformed.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into().into())
    }
}

/// Classify an SDK error by its error-metadata code.
pub(crate) fn classify<E, R>(err: SdkError<E, R>) -> AwsError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match err.code() {
        Some(code) if NOT_FOUND_CODES.contains(&code) => AwsError::NotFound {
            code: code.to_string(),
        },
        _ => AwsError::Other(Box::new(err)),
    }
}

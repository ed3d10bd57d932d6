//! # Provider Clients
//!
//! Capability-scoped client facades wrapping the cloud provider SDKs. Each
//! facade exposes one method per provider operation and returns a
//! classifiable [`aws::AwsError`], so that adapters can distinguish "not
//! found" from everything else without knowing SDK error shapes.

pub mod aws;

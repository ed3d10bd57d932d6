//! # IAM Controllers
//!
//! Adapters for the IAM resource kinds. IAM is global, so both connectors
//! resolve their SDK configuration against the aws-global endpoint.

pub mod role;
pub mod user_policy_attachment;

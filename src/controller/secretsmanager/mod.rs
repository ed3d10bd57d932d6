//! # Secrets Manager Controllers
//!
//! Adapters for the Secrets Manager resource kinds.

pub mod secret;

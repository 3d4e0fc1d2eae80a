//! # Kubernetes Integration
//!
//! Credential secret reads, per-role secret materialization, and status
//! reporting through the status subresource.

pub mod secrets;
pub mod status;

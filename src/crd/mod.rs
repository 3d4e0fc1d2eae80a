//! # Custom Resource Definitions
//!
//! CRD types for the pg-operator: PostgresConnection (how to reach a CNPG
//! cluster) and Database (what to provision on it), plus their status types.

pub mod connection;
pub mod database;
pub mod status;

pub use connection::{PostgresConnection, PostgresConnectionSpec, SecretReference, SslMode};
pub use database::{ConnectionReference, Database, DatabaseSpec, DatabaseUser, Permission};
pub use status::{Condition, DatabaseStatus, PostgresConnectionStatus};

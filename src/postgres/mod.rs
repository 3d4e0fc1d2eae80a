//! # PostgreSQL Provisioning
//!
//! Connection resolution and establishment, database provisioning, and role
//! provisioning against the target server. All operations are idempotent:
//! existing databases, roles, and grants are left as they are.

pub mod connection;
pub mod database;
pub mod role;

pub use connection::{connect, resolve, ConnectionParams};

//! # pg-operator
//!
//! A Kubernetes operator that provisions PostgreSQL databases, roles, and
//! credential secrets against clusters managed by CloudNativePG.
//!
//! ## Overview
//!
//! The operator watches two custom resources:
//!
//! 1. **PostgresConnection** - describes how to reach a CNPG cluster
//!    (service discovery, credential secret selection, SSL mode) and is
//!    continuously validated by opening and pinging a connection.
//! 2. **Database** - references a PostgresConnection and declares a database,
//!    its roles with their permissions, and per-role credential secrets.
//!
//! Reconciliation is idempotent and best-effort: an existing database or
//! secret is never altered, role provisioning stops at the first failing role
//! while keeping prior successes in status, and every outcome is reported
//! through the `Ready` condition with a fixed requeue cadence (5 minutes when
//! ready, 1 minute while broken).

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod error;
pub mod k8s;
pub mod postgres;
pub mod utils;

pub use config::OperatorConfig;
pub use crd::{
    Condition, ConnectionReference, Database, DatabaseSpec, DatabaseStatus, DatabaseUser,
    Permission, PostgresConnection, PostgresConnectionSpec, PostgresConnectionStatus,
    SecretReference, SslMode,
};
pub use error::Error;

//! # Constants
//!
//! Fixed defaults shared across the operator.

/// Default PostgreSQL port when the PostgresConnection spec leaves it unset.
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Upper bound for opening and pinging a PostgreSQL connection.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Requeue interval after a successful reconciliation (periodic re-validation).
pub const REQUEUE_READY_SECS: u64 = 300;

/// Requeue interval after a failed reconciliation (fast retry while broken).
pub const REQUEUE_NOT_READY_SECS: u64 = 60;

/// Default DNS domain of the cluster, used when deriving CNPG service hosts.
pub const DEFAULT_CLUSTER_DOMAIN: &str = "cluster.local";

/// Environment variable overriding the cluster DNS domain.
pub const CLUSTER_DOMAIN_ENV: &str = "KUBERNETES_CLUSTER_DOMAIN";

/// Number of random bytes in a generated role password (before encoding).
pub const PASSWORD_BYTES: usize = 32;

/// Field manager recorded on status patches and secret writes.
pub const FIELD_MANAGER: &str = "pg-operator";

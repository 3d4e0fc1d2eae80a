//! # PostgresConnection CRD
//!
//! Describes how to reach a CloudNativePG cluster: service discovery,
//! credential secret selection, and SSL mode. The connection reconciler
//! validates the descriptor by opening and pinging a connection.

use crate::crd::status::PostgresConnectionStatus;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// PostgresConnection Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: postgres.silverswarm.io/v1
/// kind: PostgresConnection
/// metadata:
///   name: main-cluster
///   namespace: default
/// spec:
///   clusterName: pg1
///   clusterNamespace: databases
///   sslMode: require
/// ```
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "PostgresConnection",
    group = "postgres.silverswarm.io",
    version = "v1",
    namespaced,
    status = "PostgresConnectionStatus",
    shortname = "pgconn",
    printcolumn = r#"{"name":"Cluster", "type":"string", "jsonPath":".spec.clusterName"}, {"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}, {"name":"Message", "type":"string", "jsonPath":".status.message"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct PostgresConnectionSpec {
    /// Name of the CNPG cluster to connect to.
    pub cluster_name: String,
    /// Namespace of the CNPG cluster.
    /// Defaults to the namespace of this PostgresConnection.
    #[serde(default)]
    pub cluster_namespace: Option<String>,
    /// Explicit credential secret, overriding CNPG secret name derivation.
    /// The secret must carry `username` and `password` keys.
    #[serde(default)]
    pub super_user_secret: Option<SecretReference>,
    /// Use the CNPG application secret (`<cluster>-app`) instead of the
    /// superuser secret (`<cluster>-superuser`).
    #[serde(default)]
    pub use_app_secret: bool,
    /// Explicit PostgreSQL host, bypassing CNPG service discovery.
    /// Defaults to `<clusterName>-rw.<clusterNamespace>.svc.<clusterDomain>`.
    #[serde(default)]
    pub host: Option<String>,
    /// PostgreSQL port. Defaults to 5432.
    #[serde(default)]
    pub port: Option<u16>,
    /// SSL mode for the connection. Defaults to `require`.
    #[serde(default)]
    pub ssl_mode: SslMode,
}

/// Reference to a credential secret.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretReference {
    /// Name of the secret.
    pub name: String,
    /// Namespace of the secret.
    /// Defaults to the namespace of the PostgresConnection.
    #[serde(default)]
    pub namespace: Option<String>,
}

/// PostgreSQL SSL mode, mirroring libpq's `sslmode` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum SslMode {
    #[serde(rename = "disable")]
    Disable,
    #[serde(rename = "allow")]
    Allow,
    #[serde(rename = "prefer")]
    Prefer,
    #[default]
    #[serde(rename = "require")]
    Require,
    #[serde(rename = "verify-ca")]
    VerifyCa,
    #[serde(rename = "verify-full")]
    VerifyFull,
}

impl SslMode {
    /// The libpq spelling of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

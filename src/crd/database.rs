//! # Database CRD
//!
//! Declares a database on a referenced PostgresConnection: target name, owner
//! and encoding, plus the roles to create with their permissions and
//! credential secrets.

use crate::crd::status::DatabaseStatus;
use crate::error::Error;
use kube::CustomResource;
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

/// Database Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: postgres.silverswarm.io/v1
/// kind: Database
/// metadata:
///   name: app
///   namespace: default
/// spec:
///   connectionRef:
///     name: main-cluster
///   databaseName: app
///   users:
///     - name: reader
///       permissions: ["CONNECT", "SELECT"]
/// ```
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "Database",
    group = "postgres.silverswarm.io",
    version = "v1",
    namespaced,
    status = "DatabaseStatus",
    shortname = "pgdb",
    printcolumn = r#"{"name":"Database", "type":"string", "jsonPath":".spec.databaseName"}, {"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}, {"name":"Message", "type":"string", "jsonPath":".status.message"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSpec {
    /// Reference to the PostgresConnection used to reach the cluster.
    pub connection_ref: ConnectionReference,
    /// Name of the database to create.
    /// Must match `^[a-zA-Z][a-zA-Z0-9_]*$`.
    pub database_name: String,
    /// Owner of the database. Defaults to `postgres`.
    #[serde(default)]
    pub owner: Option<String>,
    /// Encoding of the database. Defaults to `UTF8`.
    #[serde(default)]
    pub encoding: Option<String>,
    /// Roles to create for this database, provisioned in declaration order.
    #[serde(default)]
    pub users: Vec<DatabaseUser>,
}

impl DatabaseSpec {
    /// Effective owner: the declared value, or `postgres` when unset or empty.
    pub fn owner(&self) -> &str {
        match self.owner.as_deref() {
            Some(owner) if !owner.is_empty() => owner,
            _ => "postgres",
        }
    }

    /// Effective encoding: the declared value, or `UTF8` when unset or empty.
    pub fn encoding(&self) -> &str {
        match self.encoding.as_deref() {
            Some(encoding) if !encoding.is_empty() => encoding,
            _ => "UTF8",
        }
    }
}

/// Reference to a PostgresConnection resource.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReference {
    /// Name of the PostgresConnection.
    pub name: String,
    /// Namespace of the PostgresConnection.
    /// Defaults to the namespace of the Database resource.
    #[serde(default)]
    pub namespace: Option<String>,
}

/// A role to create for the database, with its permissions.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseUser {
    /// Name of the role. Must match `^[a-zA-Z][a-zA-Z0-9_]*$`.
    pub name: String,
    /// Permissions granted to the role, applied in declaration order.
    pub permissions: Vec<Permission>,
    /// Create a credential secret for this role. Defaults to true.
    #[serde(default = "default_true")]
    pub create_secret: bool,
    /// Name of the credential secret.
    /// Defaults to `<databaseName>-<name>`.
    #[serde(default)]
    pub secret_name: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Permission tokens recognized on a role declaration.
///
/// The set is closed: unknown tokens are rejected when the resource is
/// decoded, before any statement is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Permission {
    Connect,
    Create,
    Usage,
    Select,
    Insert,
    Update,
    Delete,
    All,
}

impl Permission {
    /// The declared spelling of this token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Connect => "CONNECT",
            Permission::Create => "CREATE",
            Permission::Usage => "USAGE",
            Permission::Select => "SELECT",
            Permission::Insert => "INSERT",
            Permission::Update => "UPDATE",
            Permission::Delete => "DELETE",
            Permission::All => "ALL",
        }
    }

    /// Build the single GRANT statement for this token.
    ///
    /// CONNECT/CREATE target the database, USAGE targets schema `public`,
    /// the DML verbs target all tables in schema `public`, and ALL grants
    /// all privileges on the database in one statement.
    pub fn grant_statement(&self, database: &str, role: &str) -> String {
        match self {
            Permission::Connect => format!("GRANT CONNECT ON DATABASE {database} TO {role}"),
            Permission::Create => format!("GRANT CREATE ON DATABASE {database} TO {role}"),
            Permission::Usage => format!("GRANT USAGE ON SCHEMA public TO {role}"),
            Permission::Select => format!("GRANT SELECT ON ALL TABLES IN SCHEMA public TO {role}"),
            Permission::Insert => format!("GRANT INSERT ON ALL TABLES IN SCHEMA public TO {role}"),
            Permission::Update => format!("GRANT UPDATE ON ALL TABLES IN SCHEMA public TO {role}"),
            Permission::Delete => format!("GRANT DELETE ON ALL TABLES IN SCHEMA public TO {role}"),
            Permission::All => format!("GRANT ALL PRIVILEGES ON DATABASE {database} TO {role}"),
        }
    }
}

impl FromStr for Permission {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "CONNECT" => Ok(Permission::Connect),
            "CREATE" => Ok(Permission::Create),
            "USAGE" => Ok(Permission::Usage),
            "SELECT" => Ok(Permission::Select),
            "INSERT" => Ok(Permission::Insert),
            "UPDATE" => Ok(Permission::Update),
            "DELETE" => Ok(Permission::Delete),
            "ALL" => Ok(Permission::All),
            other => Err(Error::UnsupportedPermission(other.to_string())),
        }
    }
}

impl TryFrom<String> for Permission {
    type Error = Error;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.as_str().to_string()
    }
}

impl JsonSchema for Permission {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("Permission")
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        // Structural schema for the Kubernetes CRD: a closed string enum
        let schema_value = serde_json::json!({
            "type": "string",
            "enum": ["CONNECT", "CREATE", "USAGE", "SELECT", "INSERT", "UPDATE", "DELETE", "ALL"],
            "description": "Database permission granted to the role."
        });
        Schema::try_from(schema_value).expect("Failed to create Schema for Permission")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_encoding_default_when_unset_or_empty() {
        let spec: DatabaseSpec = serde_json::from_value(serde_json::json!({
            "connectionRef": { "name": "main-cluster" },
            "databaseName": "app",
            "owner": "",
            "encoding": ""
        }))
        .unwrap();
        assert_eq!(spec.owner(), "postgres");
        assert_eq!(spec.encoding(), "UTF8");

        let spec: DatabaseSpec = serde_json::from_value(serde_json::json!({
            "connectionRef": { "name": "main-cluster" },
            "databaseName": "app",
            "owner": "app_owner",
            "encoding": "LATIN1"
        }))
        .unwrap();
        assert_eq!(spec.owner(), "app_owner");
        assert_eq!(spec.encoding(), "LATIN1");
    }

    #[test]
    fn create_secret_defaults_to_true() {
        let user: DatabaseUser = serde_json::from_value(serde_json::json!({
            "name": "reader",
            "permissions": ["CONNECT"]
        }))
        .unwrap();
        assert!(user.create_secret);
        assert_eq!(user.secret_name, None);
    }

    #[test]
    fn unknown_permission_is_rejected_at_decode_time() {
        let result: Result<DatabaseUser, _> = serde_json::from_value(serde_json::json!({
            "name": "reader",
            "permissions": ["CONNECT", "TRUNCATE"]
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unsupported permission"), "got: {err}");
        assert!(err.contains("TRUNCATE"), "got: {err}");
    }
}

//! # Status Types
//!
//! Observed state for PostgresConnection and Database resources. Each status
//! reflects the outcome of the last reconciliation, not a historical log, and
//! carries a single `Ready` condition that is replaced on every update.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Status of a PostgresConnection resource.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostgresConnectionStatus {
    /// Whether the connection was validated on the last check.
    #[serde(default)]
    pub ready: bool,
    /// Human-readable status information.
    #[serde(default)]
    pub message: Option<String>,
    /// Last time the connection was verified (RFC3339).
    #[serde(default)]
    pub last_checked: Option<String>,
    /// Latest available observations.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Status of a Database resource.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatus {
    /// Whether the database and all declared roles are provisioned.
    #[serde(default)]
    pub ready: bool,
    /// Whether the database object was confirmed present or created.
    #[serde(default)]
    pub database_created: bool,
    /// Roles fully provisioned (role, grants, secret) in declaration order.
    /// On partial failure this keeps the roles completed before the failure.
    #[serde(default)]
    pub users_created: Vec<String>,
    /// Human-readable status information.
    #[serde(default)]
    pub message: Option<String>,
    /// Latest available observations.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// A typed, timestamped boolean observation attached to a resource's status.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition, e.g. `Ready`.
    pub r#type: String,
    /// Status of the condition: `True` or `False`.
    pub status: String,
    /// Machine-readable reason for the last transition.
    pub reason: String,
    /// Human-readable message for the last transition.
    pub message: String,
    /// Time of the last transition (RFC3339).
    pub last_transition_time: String,
}

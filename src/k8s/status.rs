//! # Status Reporting
//!
//! Writes observed state through the status subresource and derives the
//! requeue interval from the outcome: 5 minutes when ready (periodic
//! re-validation), 1 minute while broken (fast retry).

use crate::constants;
use crate::crd::{
    Condition, Database, DatabaseStatus, PostgresConnection, PostgresConnectionStatus,
};
use crate::error::Error;
use kube::api::{Api, Patch, PatchParams};
use kube::{Client, ResourceExt};
use kube_runtime::controller::Action;
use std::time::Duration;

/// Requeue interval derived from readiness.
pub fn requeue_after(ready: bool) -> Action {
    if ready {
        Action::requeue(Duration::from_secs(constants::REQUEUE_READY_SECS))
    } else {
        Action::requeue(Duration::from_secs(constants::REQUEUE_NOT_READY_SECS))
    }
}

/// Build the single `Ready` condition carried by both resource statuses.
/// Conditions are replaced on every update, never appended.
pub fn ready_condition(ready: bool, message: &str) -> Condition {
    Condition {
        r#type: "Ready".to_string(),
        status: if ready { "True" } else { "False" }.to_string(),
        reason: if ready {
            "ReconciliationSucceeded"
        } else {
            "ReconciliationFailed"
        }
        .to_string(),
        message: message.to_string(),
        last_transition_time: chrono::Utc::now().to_rfc3339(),
    }
}

/// Persist the observed state of a PostgresConnection and return the
/// requeue action for the outcome.
pub async fn update_connection_status(
    client: &Client,
    connection: &PostgresConnection,
    ready: bool,
    message: &str,
) -> Result<Action, Error> {
    let namespace = connection.namespace().unwrap_or_else(|| "default".into());
    let api: Api<PostgresConnection> = Api::namespaced(client.clone(), &namespace);

    let status = PostgresConnectionStatus {
        ready,
        message: Some(message.to_string()),
        last_checked: Some(chrono::Utc::now().to_rfc3339()),
        conditions: vec![ready_condition(ready, message)],
    };

    api.patch_status(
        &connection.name_any(),
        &PatchParams::apply(constants::FIELD_MANAGER),
        &Patch::Merge(serde_json::json!({ "status": status })),
    )
    .await?;

    Ok(requeue_after(ready))
}

/// Persist the observed state of a Database and return the requeue action
/// for the outcome. `users_created` is the list of roles fully provisioned
/// before any failure.
pub async fn update_database_status(
    client: &Client,
    database: &Database,
    ready: bool,
    database_created: bool,
    users_created: &[String],
    message: &str,
) -> Result<Action, Error> {
    let namespace = database.namespace().unwrap_or_else(|| "default".into());
    let api: Api<Database> = Api::namespaced(client.clone(), &namespace);

    let status = DatabaseStatus {
        ready,
        database_created,
        users_created: users_created.to_vec(),
        message: Some(message.to_string()),
        conditions: vec![ready_condition(ready, message)],
    };

    api.patch_status(
        &database.name_any(),
        &PatchParams::apply(constants::FIELD_MANAGER),
        &Patch::Merge(serde_json::json!({ "status": status })),
    )
    .await?;

    Ok(requeue_after(ready))
}

//! # PostgresConnection Reconciler
//!
//! Validates a connection descriptor by resolving credentials and opening a
//! pinged connection, then reports readiness. Every reconciliation
//! re-validates from scratch; there is no terminal state.

use crate::constants;
use crate::controller::Context;
use crate::crd::PostgresConnection;
use crate::error::Error;
use crate::k8s::status;
use crate::postgres;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use sqlx::Connection as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Reconcile a PostgresConnection resource.
///
/// Validation failures are recorded in status and answered with a fast
/// requeue; only a failed status write is returned as an error.
pub async fn reconcile(
    connection: Arc<PostgresConnection>,
    ctx: Arc<Context>,
) -> Result<Action, Error> {
    let name = connection.name_any();
    let namespace = connection.namespace().unwrap_or_else(|| "default".into());
    info!("reconciling PostgresConnection {namespace}/{name}");

    match validate(&connection, &ctx).await {
        Ok(()) => {
            info!("connection {namespace}/{name} validated");
            status::update_connection_status(
                &ctx.client,
                &connection,
                true,
                "Connection validated successfully",
            )
            .await
        }
        Err(e) => {
            warn!("connection {namespace}/{name} validation failed: {e}");
            status::update_connection_status(&ctx.client, &connection, false, &e.to_string())
                .await
        }
    }
}

/// Resolve the descriptor and open a pinged connection, releasing the
/// handle immediately after the liveness check.
async fn validate(connection: &PostgresConnection, ctx: &Context) -> Result<(), Error> {
    let params = postgres::resolve(&ctx.client, connection, &ctx.config).await?;
    let conn = postgres::connect(&params, ctx.config.connect_timeout).await?;
    let _ = conn.close().await;
    Ok(())
}

/// Requeue policy when the reconciliation itself errored (status write
/// failure): fixed fast retry, no backoff growth. Write conflicts and
/// transient API conditions are expected and logged below error level.
pub fn error_policy(
    connection: Arc<PostgresConnection>,
    error: &Error,
    _ctx: Arc<Context>,
) -> Action {
    if error.is_conflict() || error.is_retryable() {
        warn!(
            "transient error for PostgresConnection {}: {error}",
            connection.name_any()
        );
    } else {
        error!(
            "reconciliation error for PostgresConnection {}: {error}",
            connection.name_any()
        );
    }
    Action::requeue(Duration::from_secs(constants::REQUEUE_NOT_READY_SECS))
}

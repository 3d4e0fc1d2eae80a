//! # Controllers
//!
//! Wires the PostgresConnection and Database reconcilers into kube-runtime
//! controllers. Each resource is reconciled single-flight by the runtime;
//! different resources may reconcile concurrently.

pub mod connection;
pub mod database;

use crate::config::OperatorConfig;
use crate::crd::{Database, PostgresConnection};
use anyhow::Result;
use futures::StreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, ListParams};
use kube::Client;
use kube_runtime::{watcher, Controller};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared context handed to every reconciliation.
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client.
    pub client: Client,
    /// Ambient configuration (cluster domain, connect timeout).
    pub config: OperatorConfig,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Run both controllers until shutdown.
pub async fn run(client: Client, config: OperatorConfig) -> Result<()> {
    let ctx = Arc::new(Context {
        client: client.clone(),
        config,
    });

    let connections: Api<PostgresConnection> = Api::all(client.clone());
    let databases: Api<Database> = Api::all(client.clone());

    // Surface missing CRDs early; the watch retries regardless, so this is
    // diagnostic rather than fatal.
    if let Err(e) = connections.list(&ListParams::default().limit(1)).await {
        error!("PostgresConnection CRD is not queryable: {e}. Is the CRD installed?");
    }
    if let Err(e) = databases.list(&ListParams::default().limit(1)).await {
        error!("Database CRD is not queryable: {e}. Is the CRD installed?");
    }

    info!("starting PostgresConnection and Database controllers");

    let connection_controller = Controller::new(connections, watcher::Config::default())
        .shutdown_on_signal()
        .run(connection::reconcile, connection::error_policy, ctx.clone())
        .for_each(|result| async move {
            match result {
                Ok((obj, _)) => debug!("reconciled PostgresConnection {obj}"),
                Err(e) => warn!("PostgresConnection reconciliation failed: {e}"),
            }
        });

    // Owning the generated credential secrets makes their deletion trigger a
    // re-reconcile of the declaring Database.
    let database_controller = Controller::new(databases, watcher::Config::default())
        .owns(Api::<Secret>::all(client), watcher::Config::default())
        .shutdown_on_signal()
        .run(database::reconcile, database::error_policy, ctx)
        .for_each(|result| async move {
            match result {
                Ok((obj, _)) => debug!("reconciled Database {obj}"),
                Err(e) => warn!("Database reconciliation failed: {e}"),
            }
        });

    tokio::join!(connection_controller, database_controller);
    Ok(())
}

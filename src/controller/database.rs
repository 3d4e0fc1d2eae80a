//! # Database Reconciler
//!
//! Orchestrates provisioning for a Database resource: resolve the referenced
//! PostgresConnection, gate on its readiness, connect, ensure the database,
//! then provision each declared role in order (role, grants, credential
//! secret). Role provisioning stops at the first failure; roles completed
//! before it are preserved in status.

use crate::constants;
use crate::controller::Context;
use crate::crd::{Database, DatabaseUser, PostgresConnection};
use crate::error::Error;
use crate::k8s::{secrets, status};
use crate::postgres;
use crate::utils;
use kube::api::Api;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use sqlx::{Connection, PgConnection};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Reconcile a Database resource.
///
/// Every business failure is converted into a status update with a fast
/// requeue; only a failed status write is returned as an error.
pub async fn reconcile(database: Arc<Database>, ctx: Arc<Context>) -> Result<Action, Error> {
    let name = database.name_any();
    let namespace = database.namespace().unwrap_or_else(|| "default".into());
    info!("reconciling Database {namespace}/{name}");

    let connection = match get_connection(&database, &ctx).await {
        Ok(connection) => connection,
        Err(e) => {
            warn!("database {namespace}/{name}: {e}");
            return status::update_database_status(
                &ctx.client,
                &database,
                false,
                false,
                &[],
                &e.to_string(),
            )
            .await;
        }
    };

    let connection_ready = connection.status.as_ref().is_some_and(|s| s.ready);
    if !connection_ready {
        return status::update_database_status(
            &ctx.client,
            &database,
            false,
            false,
            &[],
            "PostgreSQL connection is not ready",
        )
        .await;
    }

    let params = match postgres::resolve(&ctx.client, &connection, &ctx.config).await {
        Ok(params) => params,
        Err(e) => {
            return status::update_database_status(
                &ctx.client,
                &database,
                false,
                false,
                &[],
                &e.to_string(),
            )
            .await;
        }
    };

    let mut conn = match postgres::connect(&params, ctx.config.connect_timeout).await {
        Ok(conn) => conn,
        Err(e) => {
            return status::update_database_status(
                &ctx.client,
                &database,
                false,
                false,
                &[],
                &e.to_string(),
            )
            .await;
        }
    };

    let outcome = provision(&mut conn, &database, &ctx).await;
    // the handle is owned exclusively by this reconciliation; release it on
    // every path before reporting
    let _ = conn.close().await;

    match outcome {
        Ok((database_created, users_created)) => {
            info!(
                "database {namespace}/{name} ready ({} roles)",
                users_created.len()
            );
            status::update_database_status(
                &ctx.client,
                &database,
                true,
                database_created,
                &users_created,
                "Database and users ready",
            )
            .await
        }
        Err((database_created, users_created, e)) => {
            warn!("database {namespace}/{name} provisioning failed: {e}");
            status::update_database_status(
                &ctx.client,
                &database,
                false,
                database_created,
                &users_created,
                &e.to_string(),
            )
            .await
        }
    }
}

/// Look up the referenced PostgresConnection. The reference namespace
/// defaults to the Database's own namespace.
async fn get_connection(database: &Database, ctx: &Context) -> Result<PostgresConnection, Error> {
    let reference = &database.spec.connection_ref;
    let namespace = reference
        .namespace
        .clone()
        .filter(|ns| !ns.is_empty())
        .or_else(|| database.namespace())
        .unwrap_or_else(|| "default".into());

    let api: Api<PostgresConnection> = Api::namespaced(ctx.client.clone(), &namespace);
    api.get(&reference.name)
        .await
        .map_err(|e| connection_lookup_error(e, &namespace, &reference.name))
}

/// Shape the status message for a failed PostgresConnection lookup: a
/// missing reference reads differently from a transient API failure.
fn connection_lookup_error(err: kube::Error, namespace: &str, name: &str) -> Error {
    let err = Error::Kube(err);
    if err.is_not_found() {
        Error::Resolution(format!(
            "PostgresConnection {namespace}/{name} does not exist"
        ))
    } else {
        Error::Resolution(format!(
            "failed to get PostgresConnection {namespace}/{name}: {err}"
        ))
    }
}

/// Outcome of a failed provisioning pass: what had been confirmed before the
/// failure, plus the failure itself.
type ProvisionFailure = (bool, Vec<String>, Error);

/// Ensure the database exists, then provision declared roles in order.
/// Stops at the first failing role; the accumulated role list reflects only
/// roles fully completed before the failure.
async fn provision(
    conn: &mut PgConnection,
    database: &Database,
    ctx: &Context,
) -> Result<(bool, Vec<String>), ProvisionFailure> {
    let spec = &database.spec;

    let database_created = match postgres::database::ensure_database(conn, spec).await {
        Ok(created) => created,
        Err(e) => return Err((false, Vec::new(), e)),
    };

    let mut users_created = Vec::with_capacity(spec.users.len());
    for user in &spec.users {
        if let Err(e) = provision_user(conn, database, user, ctx).await {
            return Err((database_created, users_created, e));
        }
        users_created.push(user.name.clone());
    }

    Ok((database_created, users_created))
}

/// Provision a single role: ensure it exists, apply its grants, and
/// materialize its credential secret.
///
/// One password is generated per role per reconciliation and used for both
/// the role and its secret. A pre-existing role is realigned to that password
/// BEFORE the secret is written: a failed alignment leaves no secret behind,
/// so the next reconciliation retries it instead of trusting a secret the
/// live role never carried. An existing secret leaves both untouched (no
/// rotation).
async fn provision_user(
    conn: &mut PgConnection,
    database: &Database,
    user: &DatabaseUser,
    ctx: &Context,
) -> Result<(), Error> {
    let password = utils::generate_password();

    let role_created = postgres::role::ensure_role(conn, &user.name, &password).await?;
    postgres::role::grant_permissions(conn, &database.spec.database_name, user).await?;

    if user.create_secret {
        let secret_exists = secrets::role_secret_exists(&ctx.client, database, user).await?;
        if needs_password_alignment(role_created, secret_exists) {
            postgres::role::set_role_password(conn, &user.name, &password).await?;
        }
        if !secret_exists {
            secrets::create_role_secret(&ctx.client, database, user, &password).await?;
        }
    }

    Ok(())
}

/// A pre-existing role must be realigned with the freshly generated password
/// before that password is materialized. A role created in this pass already
/// carries it, and an existing secret is never rotated.
fn needs_password_alignment(role_created: bool, secret_exists: bool) -> bool {
    !secret_exists && !role_created
}

/// Requeue policy when the reconciliation itself errored (status write
/// failure): fixed fast retry, no backoff growth. Write conflicts and
/// transient API conditions are expected and logged below error level.
pub fn error_policy(database: Arc<Database>, error: &Error, _ctx: Arc<Context>) -> Action {
    if error.is_conflict() || error.is_retryable() {
        warn!(
            "transient error for Database {}: {error}",
            database.name_any()
        );
    } else {
        error!(
            "reconciliation error for Database {}: {error}",
            database.name_any()
        );
    }
    Action::requeue(Duration::from_secs(constants::REQUEUE_NOT_READY_SECS))
}

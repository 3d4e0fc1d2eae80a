//! # Connection Resolution and Establishment
//!
//! Resolves a PostgresConnection descriptor into concrete host, port, and
//! credential parameters, then opens a single pinged connection bounded by
//! the connect timeout. No pooling: each reconciliation owns exactly one
//! handle and releases it before returning.

use crate::config::OperatorConfig;
use crate::constants;
use crate::crd::{PostgresConnection, PostgresConnectionSpec, SslMode};
use crate::error::Error;
use crate::k8s::secrets;
use kube::{Client, ResourceExt};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{Connection, PgConnection};
use std::time::Duration;
use tracing::debug;

/// Concrete parameters resolved from a PostgresConnection descriptor.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub ssl_mode: SslMode,
}

/// Derive the CNPG read-write service host for a cluster.
pub fn service_host(cluster_name: &str, cluster_namespace: &str, cluster_domain: &str) -> String {
    format!("{cluster_name}-rw.{cluster_namespace}.svc.{cluster_domain}")
}

/// Determine which secret holds the connection credentials.
///
/// An explicit `superUserSecret` wins; otherwise the CNPG convention applies:
/// `<cluster>-app` when `useAppSecret` is set, `<cluster>-superuser` when not.
/// Returns (name, namespace).
pub fn credentials_secret(
    spec: &PostgresConnectionSpec,
    resource_namespace: &str,
) -> (String, String) {
    if let Some(secret_ref) = &spec.super_user_secret {
        let namespace = secret_ref
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .unwrap_or(resource_namespace);
        return (secret_ref.name.clone(), namespace.to_string());
    }

    let name = if spec.use_app_secret {
        format!("{}-app", spec.cluster_name)
    } else {
        format!("{}-superuser", spec.cluster_name)
    };
    let namespace = spec
        .cluster_namespace
        .as_deref()
        .filter(|ns| !ns.is_empty())
        .unwrap_or(resource_namespace);
    (name, namespace.to_string())
}

/// Resolve a PostgresConnection into host/port/credential parameters.
///
/// Reads the credential secret from the cluster; no other side effects.
pub async fn resolve(
    client: &Client,
    connection: &PostgresConnection,
    config: &OperatorConfig,
) -> Result<ConnectionParams, Error> {
    let resource_namespace = connection.namespace().unwrap_or_else(|| "default".into());
    let spec = &connection.spec;

    let port = match spec.port {
        Some(port) if port != 0 => port,
        _ => constants::DEFAULT_POSTGRES_PORT,
    };

    let host = match spec.host.as_deref() {
        Some(host) if !host.is_empty() => host.to_string(),
        _ => {
            let cluster_namespace = spec
                .cluster_namespace
                .as_deref()
                .filter(|ns| !ns.is_empty())
                .unwrap_or(&resource_namespace);
            service_host(&spec.cluster_name, cluster_namespace, &config.cluster_domain)
        }
    };

    let (secret_name, secret_namespace) = credentials_secret(spec, &resource_namespace);
    let (username, password) =
        secrets::read_credentials(client, &secret_name, &secret_namespace).await?;

    Ok(ConnectionParams {
        host,
        port,
        username,
        password,
        ssl_mode: spec.ssl_mode,
    })
}

/// Open and ping a connection to the target server within `timeout`.
///
/// On timeout the in-flight attempt is dropped, which closes the socket, so
/// no handle leaks across retries.
pub async fn connect(params: &ConnectionParams, timeout: Duration) -> Result<PgConnection, Error> {
    let options = PgConnectOptions::new()
        .host(&params.host)
        .port(params.port)
        .username(&params.username)
        .password(&params.password)
        .database("postgres")
        .ssl_mode(pg_ssl_mode(params.ssl_mode))
        .application_name(constants::FIELD_MANAGER);

    debug!(
        host = %params.host,
        port = params.port,
        user = %params.username,
        ssl_mode = params.ssl_mode.as_str(),
        "opening postgres connection"
    );

    let attempt = async {
        let mut conn = PgConnection::connect_with(&options).await?;
        conn.ping().await?;
        Ok::<_, sqlx::Error>(conn)
    };

    match tokio::time::timeout(timeout, attempt).await {
        Ok(Ok(conn)) => Ok(conn),
        Ok(Err(e)) => Err(Error::Connect(format!(
            "{}:{}: {e}",
            params.host, params.port
        ))),
        Err(_) => Err(Error::Connect(format!(
            "{}:{}: connection attempt timed out after {}s",
            params.host,
            params.port,
            timeout.as_secs()
        ))),
    }
}

fn pg_ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Allow => PgSslMode::Allow,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
        SslMode::VerifyCa => PgSslMode::VerifyCa,
        SslMode::VerifyFull => PgSslMode::VerifyFull,
    }
}

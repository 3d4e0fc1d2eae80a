//! # Database Provisioning
//!
//! Idempotently ensures a named database exists with the declared owner and
//! encoding. An existing database is never altered.

use crate::crd::DatabaseSpec;
use crate::error::Error;
use crate::utils;
use sqlx::{Executor, PgConnection};
use tracing::{debug, info};

/// Build the CREATE DATABASE statement for a validated name/owner/encoding.
pub fn create_database_statement(name: &str, owner: &str, encoding: &str) -> String {
    format!("CREATE DATABASE {name} WITH OWNER {owner} ENCODING '{encoding}'")
}

/// Check whether a database of the given name exists in the catalog.
pub async fn database_exists(conn: &mut PgConnection, name: &str) -> Result<bool, Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| Error::Provision(format!("failed to check if database {name} exists: {e}")))
}

/// Ensure the declared database exists. Returns true whether the database
/// was just created or already present; existing owner/encoding are never
/// altered.
pub async fn ensure_database(conn: &mut PgConnection, spec: &DatabaseSpec) -> Result<bool, Error> {
    let name = spec.database_name.as_str();
    let owner = spec.owner();
    let encoding = spec.encoding();

    // Identifiers cannot be bound as statement parameters; re-check the
    // pattern the CRD schema enforces before interpolating into DDL.
    for identifier in [name, owner, encoding] {
        if !utils::is_valid_identifier(identifier) {
            return Err(Error::Provision(format!(
                "invalid identifier {identifier:?} in database declaration"
            )));
        }
    }

    if database_exists(conn, name).await? {
        debug!("database {name} already exists");
        return Ok(true);
    }

    conn.execute(create_database_statement(name, owner, encoding).as_str())
        .await
        .map_err(|e| Error::Provision(format!("failed to create database {name}: {e}")))?;

    info!("created database {name} (owner: {owner}, encoding: {encoding})");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_embeds_owner_and_encoding() {
        assert_eq!(
            create_database_statement("app", "postgres", "UTF8"),
            "CREATE DATABASE app WITH OWNER postgres ENCODING 'UTF8'"
        );
    }
}

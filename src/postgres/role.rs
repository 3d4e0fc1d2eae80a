//! # Role Provisioning
//!
//! Idempotently ensures roles exist and maps declared permission tokens onto
//! GRANT statements. Granting an already-held privilege is a no-op in
//! PostgreSQL and is not specially detected here. There is no transactional
//! guarantee across grants: a failure mid-list leaves earlier grants in place.

use crate::crd::DatabaseUser;
use crate::error::Error;
use crate::utils;
use sqlx::{Executor, PgConnection};
use tracing::{debug, info};

/// Build the CREATE ROLE statement for a validated role name.
pub fn create_role_statement(name: &str, password: &str) -> String {
    format!("CREATE ROLE {name} WITH LOGIN ENCRYPTED PASSWORD '{password}'")
}

/// Build the ALTER ROLE statement used to align an existing role's password
/// with a newly materialized credential secret.
pub fn alter_role_password_statement(name: &str, password: &str) -> String {
    format!("ALTER ROLE {name} WITH ENCRYPTED PASSWORD '{password}'")
}

/// Check whether a role of the given name exists in the catalog.
pub async fn role_exists(conn: &mut PgConnection, name: &str) -> Result<bool, Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM pg_roles WHERE rolname = $1)")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| Error::Provision(format!("failed to check if role {name} exists: {e}")))
}

/// Ensure a login role exists, creating it with the given password when
/// absent. Returns true when the role was created by this call.
pub async fn ensure_role(
    conn: &mut PgConnection,
    name: &str,
    password: &str,
) -> Result<bool, Error> {
    if !utils::is_valid_identifier(name) {
        return Err(Error::Provision(format!("invalid role name {name:?}")));
    }

    if role_exists(conn, name).await? {
        debug!("role {name} already exists");
        return Ok(false);
    }

    conn.execute(create_role_statement(name, password).as_str())
        .await
        .map_err(|e| Error::Provision(format!("failed to create role {name}: {e}")))?;

    info!("created role {name}");
    Ok(true)
}

/// Set the password of an existing role.
pub async fn set_role_password(
    conn: &mut PgConnection,
    name: &str,
    password: &str,
) -> Result<(), Error> {
    if !utils::is_valid_identifier(name) {
        return Err(Error::Provision(format!("invalid role name {name:?}")));
    }

    conn.execute(alter_role_password_statement(name, password).as_str())
        .await
        .map_err(|e| Error::Provision(format!("failed to set password for role {name}: {e}")))?;

    info!("updated password for role {name}");
    Ok(())
}

/// Issue one GRANT statement per declared permission, in declaration order.
///
/// Already-issued grants are not rolled back when a later statement fails.
pub async fn grant_permissions(
    conn: &mut PgConnection,
    database: &str,
    user: &DatabaseUser,
) -> Result<(), Error> {
    if !utils::is_valid_identifier(database) || !utils::is_valid_identifier(&user.name) {
        return Err(Error::Provision(format!(
            "invalid identifier in grant for role {:?} on database {database:?}",
            user.name
        )));
    }

    for permission in &user.permissions {
        let statement = permission.grant_statement(database, &user.name);
        conn.execute(statement.as_str()).await.map_err(|e| {
            Error::Provision(format!(
                "failed to grant {} to role {}: {e}",
                permission.as_str(),
                user.name
            ))
        })?;
        debug!("granted {} to role {}", permission.as_str(), user.name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_role_statement_enables_login() {
        assert_eq!(
            create_role_statement("reader", "s3cret"),
            "CREATE ROLE reader WITH LOGIN ENCRYPTED PASSWORD 's3cret'"
        );
    }

    #[test]
    fn alter_role_statement_sets_password() {
        assert_eq!(
            alter_role_password_statement("reader", "s3cret"),
            "ALTER ROLE reader WITH ENCRYPTED PASSWORD 's3cret'"
        );
    }
}

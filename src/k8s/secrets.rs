//! # Secret Handling
//!
//! Reads CNPG credential secrets and materializes per-role credential
//! secrets. Materialized secrets are owned by their Database resource, so
//! deleting the declaration garbage-collects the credentials. Creation is
//! at-most-once: an existing secret is never overwritten or rotated.

use crate::crd::{Database, DatabaseUser};
use crate::error::Error;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::api::{Api, PostParams};
use kube::{Client, Resource, ResourceExt};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Read `username` and `password` from a credential secret.
pub async fn read_credentials(
    client: &Client,
    name: &str,
    namespace: &str,
) -> Result<(String, String), Error> {
    let api: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let secret = api.get(name).await.map_err(|e| {
        Error::Resolution(format!(
            "failed to get credential secret {namespace}/{name}: {e}"
        ))
    })?;

    parse_credentials(&secret.data.unwrap_or_default(), name, namespace)
}

/// Extract `username` and `password` from a credential secret's data map.
///
/// CNPG secrets may also carry a `uri` key; connection URIs are not parsed
/// here, so a secret providing only a `uri` is rejected with a clear error,
/// as are missing, empty, and non-UTF-8 values.
pub fn parse_credentials(
    data: &BTreeMap<String, ByteString>,
    name: &str,
    namespace: &str,
) -> Result<(String, String), Error> {
    if data.contains_key("uri") && !data.contains_key("username") {
        return Err(Error::Resolution(format!(
            "secret {namespace}/{name} provides only a uri key; username/password keys are required"
        )));
    }

    let username = string_value(data, "username", name, namespace)?;
    let password = string_value(data, "password", name, namespace)?;
    if username.is_empty() || password.is_empty() {
        return Err(Error::Resolution(format!(
            "secret {namespace}/{name} is missing username or password"
        )));
    }

    Ok((username, password))
}

fn string_value(
    data: &BTreeMap<String, ByteString>,
    key: &str,
    name: &str,
    namespace: &str,
) -> Result<String, Error> {
    let bytes = data.get(key).ok_or_else(|| {
        Error::Resolution(format!("secret {namespace}/{name} is missing {key}"))
    })?;
    String::from_utf8(bytes.0.clone()).map_err(|_| {
        Error::Resolution(format!(
            "secret {namespace}/{name} has a non-UTF-8 {key} value"
        ))
    })
}

/// Effective secret name for a role: the explicit override, or
/// `<databaseName>-<roleName>`.
pub fn role_secret_name(database_name: &str, user: &DatabaseUser) -> String {
    match user.secret_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{database_name}-{}", user.name),
    }
}

/// Check whether a role's credential secret already exists.
pub async fn role_secret_exists(
    client: &Client,
    database: &Database,
    user: &DatabaseUser,
) -> Result<bool, Error> {
    let namespace = database.namespace().unwrap_or_else(|| "default".into());
    let name = role_secret_name(&database.spec.database_name, user);
    let api: Api<Secret> = Api::namespaced(client.clone(), &namespace);
    Ok(api.get_opt(&name).await?.is_some())
}

/// Materialize a credential secret for a role, owned by the Database
/// resource. Returns true when the secret was created by this call; an
/// already existing secret is left untouched and reported as false.
pub async fn create_role_secret(
    client: &Client,
    database: &Database,
    user: &DatabaseUser,
    password: &str,
) -> Result<bool, Error> {
    let namespace = database.namespace().unwrap_or_else(|| "default".into());
    let name = role_secret_name(&database.spec.database_name, user);

    let owner_ref = database.controller_owner_ref(&()).ok_or_else(|| {
        Error::Provision("Database resource is missing metadata for an owner reference".into())
    })?;

    let secret = Secret {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            namespace: Some(namespace.clone()),
            owner_references: Some(vec![owner_ref]),
            ..ObjectMeta::default()
        },
        type_: Some("Opaque".to_string()),
        string_data: Some(BTreeMap::from([
            ("username".to_string(), user.name.clone()),
            ("password".to_string(), password.to_string()),
        ])),
        ..Secret::default()
    };

    let api: Api<Secret> = Api::namespaced(client.clone(), &namespace);
    match api.create(&PostParams::default(), &secret).await {
        Ok(_) => {
            info!("created credential secret {namespace}/{name} for role {}", user.name);
            Ok(true)
        }
        Err(e) => {
            let err = Error::Kube(e);
            if err.is_conflict() {
                debug!("credential secret {namespace}/{name} already exists, leaving untouched");
                Ok(false)
            } else {
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(entries: &[(&str, &[u8])]) -> BTreeMap<String, ByteString> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), ByteString(v.to_vec())))
            .collect()
    }

    #[test]
    fn parses_username_and_password() {
        let data = data(&[("username", b"reader"), ("password", b"s3cret")]);
        let (username, password) = parse_credentials(&data, "pg1-superuser", "ns1").unwrap();
        assert_eq!(username, "reader");
        assert_eq!(password, "s3cret");
    }

    #[test]
    fn rejects_uri_only_secrets() {
        let data = data(&[("uri", b"postgres://reader:pw@pg1-rw:5432/app")]);
        let err = parse_credentials(&data, "pg1-superuser", "ns1").unwrap_err();
        assert!(err.to_string().contains("provides only a uri key"), "got: {err}");
    }

    #[test]
    fn rejects_missing_keys() {
        let data = data(&[("username", b"reader")]);
        let err = parse_credentials(&data, "pg1-superuser", "ns1").unwrap_err();
        assert!(
            err.to_string().contains("missing password"),
            "got: {err}"
        );
    }

    #[test]
    fn rejects_empty_values() {
        let data = data(&[("username", b"reader"), ("password", b"")]);
        let err = parse_credentials(&data, "pg1-superuser", "ns1").unwrap_err();
        assert!(
            err.to_string().contains("missing username or password"),
            "got: {err}"
        );
    }

    #[test]
    fn rejects_non_utf8_values() {
        let data = data(&[("username", b"reader"), ("password", &[0xff, 0xfe])]);
        let err = parse_credentials(&data, "pg1-superuser", "ns1").unwrap_err();
        assert!(
            err.to_string().contains("non-UTF-8 password"),
            "got: {err}"
        );
    }
}

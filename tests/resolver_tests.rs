//! # Connection Resolution Tests
//!
//! Verifies the deterministic derivation of host and credential secret
//! coordinates from a PostgresConnection descriptor.

use pg_operator::postgres::connection::{credentials_secret, service_host};
use pg_operator::{PostgresConnectionSpec, SecretReference, SslMode};

fn spec(cluster_name: &str) -> PostgresConnectionSpec {
    PostgresConnectionSpec {
        cluster_name: cluster_name.to_string(),
        cluster_namespace: None,
        super_user_secret: None,
        use_app_secret: false,
        host: None,
        port: None,
        ssl_mode: SslMode::Require,
    }
}

#[test]
fn host_derives_from_cluster_name_namespace_and_domain() {
    let host = service_host("pg1", "ns1", "cluster.local");
    assert_eq!(host, "pg1-rw.ns1.svc.cluster.local");
}

#[test]
fn host_honors_cluster_domain_override() {
    let host = service_host("pg1", "ns1", "internal.example");
    assert_eq!(host, "pg1-rw.ns1.svc.internal.example");
}

#[test]
fn default_secret_is_superuser() {
    let (name, namespace) = credentials_secret(&spec("pg1"), "ns1");
    assert_eq!(name, "pg1-superuser");
    assert_eq!(namespace, "ns1");
}

#[test]
fn app_secret_flag_selects_app_secret() {
    let mut spec = spec("pg1");
    spec.use_app_secret = true;
    let (name, namespace) = credentials_secret(&spec, "ns1");
    assert_eq!(name, "pg1-app");
    assert_eq!(namespace, "ns1");
}

#[test]
fn derived_secret_lives_in_cluster_namespace() {
    let mut spec = spec("pg1");
    spec.cluster_namespace = Some("databases".to_string());
    let (name, namespace) = credentials_secret(&spec, "ns1");
    assert_eq!(name, "pg1-superuser");
    assert_eq!(namespace, "databases");
}

#[test]
fn explicit_secret_reference_wins() {
    let mut spec = spec("pg1");
    spec.use_app_secret = true;
    spec.super_user_secret = Some(SecretReference {
        name: "custom-creds".to_string(),
        namespace: None,
    });
    let (name, namespace) = credentials_secret(&spec, "ns1");
    assert_eq!(name, "custom-creds");
    // explicit reference without a namespace falls back to the resource's
    assert_eq!(namespace, "ns1");
}

#[test]
fn explicit_secret_reference_namespace_is_respected() {
    let mut spec = spec("pg1");
    spec.super_user_secret = Some(SecretReference {
        name: "custom-creds".to_string(),
        namespace: Some("secrets".to_string()),
    });
    let (_, namespace) = credentials_secret(&spec, "ns1");
    assert_eq!(namespace, "secrets");
}

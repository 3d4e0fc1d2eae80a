//! Prints the PostgresConnection and Database CRD manifests to stdout.
//!
//! Usage: `cargo run --bin crdgen > config/crd/pg-operator.yaml`

use kube::CustomResourceExt;
use pg_operator::{Database, PostgresConnection};

fn main() {
    let connection_crd = serde_yaml::to_string(&PostgresConnection::crd())
        .expect("Failed to serialize PostgresConnection CRD");
    let database_crd =
        serde_yaml::to_string(&Database::crd()).expect("Failed to serialize Database CRD");

    print!("{connection_crd}");
    println!("---");
    print!("{database_crd}");
}

//! # pg-operator
//!
//! Entrypoint: installs the rustls crypto provider, initializes tracing,
//! builds the Kubernetes client, and runs the PostgresConnection and
//! Database controllers until shutdown.

use anyhow::Result;
use pg_operator::{controller, OperatorConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure rustls crypto provider FIRST, before any other operations
    // Required for rustls 0.23+ when no default provider is set via features
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pg_operator=info".into()),
        )
        .init();

    info!("Starting pg-operator v{}", env!("CARGO_PKG_VERSION"));

    let config = OperatorConfig::from_env();
    info!(
        "cluster domain: {}, connect timeout: {}s",
        config.cluster_domain,
        config.connect_timeout.as_secs()
    );

    let client = kube::Client::try_default().await?;
    controller::run(client, config).await
}

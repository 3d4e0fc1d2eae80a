//! # Operator Configuration
//!
//! Process-wide settings passed explicitly into the credential resolver and
//! connector so tests can override them per case instead of mutating
//! environment state.

use crate::constants;
use std::time::Duration;

/// Ambient configuration for connection resolution and establishment.
#[derive(Debug, Clone)]
pub struct OperatorConfig {
    /// DNS domain of the Kubernetes cluster, e.g. `cluster.local`.
    /// Used when deriving the `<cluster>-rw.<namespace>.svc.<domain>` host.
    pub cluster_domain: String,
    /// Upper bound for opening and pinging a PostgreSQL connection.
    pub connect_timeout: Duration,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            cluster_domain: constants::DEFAULT_CLUSTER_DOMAIN.to_string(),
            connect_timeout: Duration::from_secs(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl OperatorConfig {
    /// Build the configuration from the process environment.
    ///
    /// `KUBERNETES_CLUSTER_DOMAIN` overrides the `cluster.local` default,
    /// matching CNPG's own service discovery convention.
    pub fn from_env() -> Self {
        let cluster_domain = std::env::var(constants::CLUSTER_DOMAIN_ENV)
            .ok()
            .filter(|domain| !domain.is_empty())
            .unwrap_or_else(|| constants::DEFAULT_CLUSTER_DOMAIN.to_string());

        Self {
            cluster_domain,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_cluster_local_and_30s_timeout() {
        let config = OperatorConfig::default();
        assert_eq!(config.cluster_domain, "cluster.local");
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }
}

//! # Error Types
//!
//! Error taxonomy for the operator. Business-level failures against the
//! target database (`Resolution`, `Connect`, `Provision`,
//! `UnsupportedPermission`) are recorded in resource status and answered with
//! a bounded requeue; they never abort the process. Kubernetes API errors are
//! classified so the reconcilers can distinguish missing references and write
//! conflicts from genuine infrastructure failures.

use thiserror::Error;

/// Errors produced while reconciling PostgresConnection and Database resources.
#[derive(Debug, Error)]
pub enum Error {
    /// Kubernetes API error (get/list/create/status-update).
    #[error("kubernetes api error: {0}")]
    Kube(#[from] kube::Error),

    /// A connection descriptor could not be resolved into concrete
    /// host/port/credential parameters.
    #[error("failed to resolve connection credentials: {0}")]
    Resolution(String),

    /// The target PostgreSQL server could not be reached or pinged within
    /// the connect timeout.
    #[error("failed to connect to postgres: {0}")]
    Connect(String),

    /// A catalog lookup or DDL/grant statement against the target server failed.
    #[error("failed to provision: {0}")]
    Provision(String),

    /// A declared permission token is not part of the supported set.
    #[error("unsupported permission: {0}")]
    UnsupportedPermission(String),
}

impl Error {
    /// True when the underlying cause is a missing Kubernetes object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Kube(kube::Error::Api(ae)) if ae.code == 404)
    }

    /// True when a write raced another writer (optimistic concurrency).
    /// Conflicts are retried by requeue, never surfaced as fatal.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Kube(kube::Error::Api(ae)) if ae.code == 409)
    }

    /// True for transient API server conditions worth a plain retry:
    /// service unavailable, timeouts, and rate limiting.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Kube(kube::Error::Api(ae)) if matches!(ae.code, 429 | 500 | 503 | 504)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16) -> Error {
        Error::Kube(kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "test".to_string(),
            reason: "test".to_string(),
            code,
        }))
    }

    #[test]
    fn classifies_not_found() {
        assert!(api_error(404).is_not_found());
        assert!(!api_error(404).is_conflict());
        assert!(!Error::Connect("refused".into()).is_not_found());
    }

    #[test]
    fn classifies_conflict() {
        assert!(api_error(409).is_conflict());
        assert!(!api_error(409).is_retryable());
    }

    #[test]
    fn classifies_retryable() {
        assert!(api_error(429).is_retryable());
        assert!(api_error(503).is_retryable());
        assert!(!api_error(404).is_retryable());
        assert!(!Error::Provision("permission denied".into()).is_retryable());
    }
}

//! Error types for the compliance node utilities
//!
//! Provides structured error types for owner lookups, generated MachineConfig
//! enumeration, kubelet payload handling and the inspection CLI.

use std::num::ParseIntError;
use std::time::Duration;
use thiserror::Error;

/// Unified error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // Kubernetes Errors
    // =========================================================================
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("{kind} owner reference not found on {resource}")]
    OwnerNotFound { kind: String, resource: String },

    #[error("Couldn't get {kind}/{name}: {source}")]
    FetchFailed {
        kind: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("String-int conversion error for generated kubelet config {name}: {source}")]
    OrdinalParse {
        name: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Failed to unmarshal kubelet config: {0}")]
    PayloadDecode(#[source] serde_json::Error),

    #[error("Failed to marshal kubelet config: {0}")]
    PayloadEncode(#[source] serde_json::Error),

    #[error("Failed to parse rendered kubelet config: {0}")]
    RenderedParse(#[from] serde_yaml::Error),

    #[error("Unsupported file contents source: {0}")]
    UnsupportedPayload(String),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Action a reconciler should take when one of these errors surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Requeue with exponential backoff
    RequeueWithBackoff,
    /// Requeue after specific duration
    RequeueAfter(Duration),
    /// Don't requeue, wait for changes
    NoRequeue,
}

impl Error {
    /// Determine what action to take for this error
    pub fn action(&self) -> ErrorAction {
        match self {
            Error::Kube(_) | Error::FetchFailed { .. } if self.is_transient() => {
                ErrorAction::RequeueWithBackoff
            }

            // The owning KubeletConfig may be recreated by the user
            Error::FetchFailed { .. } => ErrorAction::RequeueAfter(Duration::from_secs(60)),

            // MachineConfigs are re-rendered shortly after a KubeletConfig changes
            Error::OwnerNotFound { .. } => ErrorAction::RequeueAfter(Duration::from_secs(30)),

            Error::InvalidArgument(_)
            | Error::OrdinalParse { .. }
            | Error::PayloadDecode(_)
            | Error::PayloadEncode(_)
            | Error::RenderedParse(_)
            | Error::UnsupportedPayload(_) => ErrorAction::NoRequeue,

            _ => ErrorAction::RequeueWithBackoff,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        !matches!(self.action(), ErrorAction::NoRequeue)
    }

    /// Check if this error is transient
    ///
    /// API responses other than 404 and 409, and every non-API client error
    /// (connection, TLS, service), are considered transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Kube(source) | Error::FetchFailed { source, .. } => match source {
                kube::Error::Api(response) => !matches!(response.code, 404 | 409),
                _ => true,
            },
            _ => false,
        }
    }

    /// Check if this error means the requested object does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::OwnerNotFound { .. } => true,
            Error::Kube(kube::Error::Api(response))
            | Error::FetchFailed {
                source: kube::Error::Api(response),
                ..
            } => response.code == 404,
            _ => false,
        }
    }
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use kube::error::ErrorResponse;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".into(),
            message: "test".into(),
            reason: "Test".into(),
            code,
        })
    }

    #[test]
    fn test_error_actions() {
        let err = Error::InvalidArgument("machine config is nil".into());
        assert_eq!(err.action(), ErrorAction::NoRequeue);

        let err = Error::OwnerNotFound {
            kind: "KubeletConfig".into(),
            resource: "99-worker-generated-kubelet".into(),
        };
        assert_eq!(
            err.action(),
            ErrorAction::RequeueAfter(Duration::from_secs(30))
        );

        let err = Error::FetchFailed {
            kind: "KubeletConfig".into(),
            name: "set-max-pods".into(),
            source: api_error(404),
        };
        assert_eq!(
            err.action(),
            ErrorAction::RequeueAfter(Duration::from_secs(60))
        );

        let err = Error::FetchFailed {
            kind: "KubeletConfig".into(),
            name: "set-max-pods".into(),
            source: api_error(503),
        };
        assert_eq!(err.action(), ErrorAction::RequeueWithBackoff);
    }

    #[test]
    fn test_error_retryable() {
        let transient = Error::Kube(api_error(500));
        assert!(transient.is_retryable());
        assert!(transient.is_transient());

        let parse_err = Error::UnsupportedPayload("https://example.com".into());
        assert!(!parse_err.is_retryable());
        assert!(!parse_err.is_transient());
    }

    #[test]
    fn test_error_not_found() {
        let err = Error::FetchFailed {
            kind: "KubeletConfig".into(),
            name: "gone".into(),
            source: api_error(404),
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());

        assert!(!Error::Kube(api_error(500)).is_not_found());
        assert!(!Error::InvalidArgument("x".into()).is_not_found());
    }
}

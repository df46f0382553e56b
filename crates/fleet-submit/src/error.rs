//! Cluster interaction error types.

use thiserror::Error;

pub type ClusterResult<T> = Result<T, ClusterError>;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to install CLI for {package}: {reason}")]
    InstallFailed { package: String, reason: String },

    #[error("failed to resolve {endpoint} endpoints of {package} service {service}: {reason}")]
    EndpointResolveFailed {
        package: String,
        service: String,
        endpoint: String,
        reason: String,
    },

    #[error("dispatcher {dispatcher} rejected submission: {reason}")]
    SubmitFailed { dispatcher: String, reason: String },

    #[error("malformed store endpoints: {0}")]
    MalformedStoreEndpoints(String),
}

use std::fmt;

use thiserror::Error;

use crate::consul::transport::TransportError;
use crate::consul::version::VersionError;

/// Which kind of desired-state element failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Policy,
    Role,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Policy => f.write_str("policies"),
            LinkKind::Role => f.write_str("roles"),
        }
    }
}

/// A single problem with the caller supplied configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("token.id must be provided and not empty")]
    MissingId,

    #[error("connection.scheme '{0}' is not supported, expected http or https")]
    UnsupportedScheme(String),

    #[error("connection.management_token is not a valid header value")]
    ManagementToken,

    #[error("{kind}[{index}]: {reason}")]
    Link {
        kind: LinkKind,
        index: usize,
        reason: String,
    },

    #[error("service_identities[{index}]: {reason}")]
    ServiceIdentity { index: usize, reason: String },

    #[error("node_identities[{index}]: {reason}")]
    NodeIdentity { index: usize, reason: String },
}

/// Every validation problem found in one pass over the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration error ({} total)", self.0.len())?;
        for err in &self.0 {
            write!(f, "; {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The agent answered with a 4xx or 5xx status.
    #[error("{status} {body}")]
    RemoteApi { status: u16, body: String },

    #[error("could not connect to consul agent at {host}:{port}, error was {source}")]
    Connectivity {
        host: String,
        port: u16,
        #[source]
        source: TransportError,
    },

    #[error("unsupported consul version: {0}")]
    Version(#[from] VersionError),

    #[error("invalid JSON document for {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// Central Error Type for the Adapter

use thiserror::Error;

use crate::domain::DomainError;
use crate::port::RunError;

/// Adapter-level error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// get/set used before a successful connect
    #[error("Not connected: call connect(profile) first")]
    NotConnected,

    #[error("Browser invocation failed: {0}")]
    Run(#[from] RunError),
}

impl AdapterError {
    /// True for the configuration error raised by connect
    pub fn is_unknown_server(&self) -> bool {
        matches!(self, AdapterError::Domain(DomainError::UnknownServer { .. }))
    }
}

/// Result type alias using AdapterError
pub type Result<T> = std::result::Result<T, AdapterError>;

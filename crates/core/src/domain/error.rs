// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Profile is unknown or one of its four fields is not defined
    #[error("Unknown illdb server {profile}")]
    UnknownServer { profile: String },
}

pub type Result<T> = std::result::Result<T, DomainError>;

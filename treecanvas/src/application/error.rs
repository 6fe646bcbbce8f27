//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid command '{line}': {source}")]
    Command {
        line: String,
        #[source]
        source: DomainError,
    },
}

impl ApplicationError {
    /// The domain error behind this error, if any.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ApplicationError::Domain(e) | ApplicationError::Command { source: e, .. } => Some(e),
            ApplicationError::Config { .. } => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

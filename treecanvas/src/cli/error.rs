//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Application(ApplicationError::Config { .. }) => crate::exitcode::CONFIG,
            CliError::Application(e) => match e.domain() {
                Some(DomainError::CapacityExceeded { .. }) => crate::exitcode::UNAVAILABLE,
                Some(DomainError::InvalidSeed(_)) => crate::exitcode::SOFTWARE,
                _ => crate::exitcode::DATAERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeId;

    #[test]
    fn given_domain_errors_when_mapping_exit_codes_then_follow_sysexits() {
        let not_found = CliError::from(ApplicationError::from(DomainError::NodeNotFound(NodeId(7))));
        let full = CliError::from(ApplicationError::from(DomainError::CapacityExceeded {
            capacity: 10,
        }));
        let config = CliError::from(ApplicationError::Config {
            message: "bad".into(),
        });

        assert_eq!(not_found.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(full.exit_code(), crate::exitcode::UNAVAILABLE);
        assert_eq!(config.exit_code(), crate::exitcode::CONFIG);
        assert_eq!(CliError::Usage("x".into()).exit_code(), crate::exitcode::USAGE);
    }
}

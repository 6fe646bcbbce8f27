//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::ids::NodeId;

/// Domain errors represent tree model violations.
/// All of them are recoverable: the model is left untouched when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("id space exhausted: all {capacity} node ids are in use")]
    CapacityExceeded { capacity: u32 },

    #[error("invalid seed tree: {0}")]
    InvalidSeed(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

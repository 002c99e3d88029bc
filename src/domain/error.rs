//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violated preconditions of tree operations.
///
/// Every operation checks its preconditions before the first mutation,
/// so receiving one of these means the tree is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("no such employee: {0}")]
    NoSuchEmployee(String),

    #[error("no such boss: {0}")]
    NoSuchBoss(String),

    #[error("{subordinate} is not a direct subordinate of {employee}")]
    NotADirectSubordinate {
        employee: String,
        subordinate: String,
    },

    #[error("cannot promote {0}: already at the top of the hierarchy")]
    CannotPromoteRoot(String),

    #[error("cannot fire {0}: nobody to report the team to")]
    CannotFireRoot(String),

    #[error("employee already exists: {0}")]
    DuplicateEmployee(String),

    #[error("invalid employee record: {message}")]
    InvalidRecord { name: String, message: String },

    #[error("roster contains no employees")]
    EmptyRoster,

    #[error("hierarchy corrupted: {0}")]
    Corrupted(String),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

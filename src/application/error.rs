//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("roster {}: {message}", path.display())]
    Roster { path: PathBuf, message: String },

    #[error("script {}: {message}", path.display())]
    Script { path: PathBuf, message: String },

    #[error("step {index} ({step}) failed: {source}")]
    StepFailed {
        index: usize,
        step: String,
        #[source]
        source: DomainError,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

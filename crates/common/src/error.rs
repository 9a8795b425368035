//! Error types for testdeck

use thiserror::Error;

use crate::types::CaseId;

/// Result type alias using testdeck Error
pub type Result<T> = std::result::Result<T, Error>;

/// testdeck error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: String, id: String },

    #[error("Resource already exists: {kind} with id {id}")]
    AlreadyExists { kind: String, id: String },

    /// Strict mode found a prerequisite that is not scheduled earlier.
    /// Message form: `<prerequisite> => <dependent>`.
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    /// Prerequisite chain loops back on itself.
    #[error("Cyclic dependency: {0}")]
    CyclicDependency(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl Error {
    /// Shorthand for a missing test case
    pub fn case_not_found(id: CaseId) -> Self {
        Error::NotFound {
            kind: "test case".to_string(),
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing test plan
    pub fn plan_not_found(id: &str) -> Self {
        Error::NotFound {
            kind: "test plan".to_string(),
            id: id.to_string(),
        }
    }

    /// True for failures caused by prerequisite ordering rather than lookup or I/O
    pub fn is_dependency_error(&self) -> bool {
        matches!(
            self,
            Error::MissingDependency(_) | Error::CyclicDependency(_)
        )
    }
}

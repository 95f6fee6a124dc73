//! Search error types

use thiserror::Error;

/// Errors surfaced by space construction and tree search
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Parameter already assigned: {0}")]
    AlreadyAssigned(String),

    #[error("Search space build failed: {0}")]
    SpaceBuild(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Unknown sample: {0}")]
    UnknownSample(u64),

    #[error("Tree consistency violated: {0}")]
    TreeConsistency(String),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

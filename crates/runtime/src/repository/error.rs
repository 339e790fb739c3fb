//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by storage collaborators.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} not found")]
    NotFound { entity: String },

    #[error("repository lock was poisoned")]
    LockPoisoned,

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

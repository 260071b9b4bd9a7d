mod forum_repository;
mod profile_repository;
mod quiz_repository;
mod shop_repository;

pub use forum_repository::*;
pub use profile_repository::*;
pub use quiz_repository::*;
pub use shop_repository::*;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),
    /// Unique constraint rejected the write
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

impl RepositoryError {
    /// Message suitable for inline display
    pub fn message(&self) -> &str {
        match self {
            RepositoryError::NotFound(m)
            | RepositoryError::AlreadyExists(m)
            | RepositoryError::Database(m)
            | RepositoryError::Network(m)
            | RepositoryError::Decode(m) => m,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::AlreadyExists(_))
    }
}

//! Error types for the user repository.
use thiserror::Error;

/// Represents errors that can occur within the user repository.
#[derive(Debug, Error)]
pub enum UserRepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

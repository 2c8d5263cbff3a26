//! Error types for the subject (post/reply) repository.
use thiserror::Error;

/// Represents errors that can occur within the subject repository.
///
/// `NotFound` is reserved for mutations that target a missing row; plain
/// reads report absence through `Option` instead.
#[derive(Debug, Error)]
pub enum SubjectRepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Subject not found: {0}")]
    NotFound(String),
}

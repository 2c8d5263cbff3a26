//! Error types for the vote ledger repository.
use thiserror::Error;

/// Represents errors that can occur within the vote ledger repository.
#[derive(Debug, Error)]
pub enum VoteRepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid stored vote value: {0}")]
    InvalidVoteValue(i16),

    #[error("Invalid stored subject kind: {0}")]
    InvalidSubjectKind(i16),
}

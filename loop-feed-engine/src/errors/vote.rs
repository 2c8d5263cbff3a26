//! Error types for the vote service.
use loop_feed_repository::errors::{SubjectRepositoryError, VoteRepositoryError};
use loop_feed_shared::types::SubjectId;
use thiserror::Error;

/// Represents errors that abort a `cast_vote` call before anything durable
/// changes.
///
/// Failures *after* the ledger write are deliberately not errors: the ledger
/// is the source of truth and must not be rolled back, so they surface as
/// [`VoteOutcome::LedgerOnly`](crate::vote::VoteOutcome) instead.
#[derive(Debug, Error)]
pub enum VoteError {
    /// The post or reply the vote targets no longer exists. Terminal for
    /// the call; the caller should drop its optimistic update.
    #[error("Subject not found: {0}")]
    SubjectNotFound(SubjectId),

    /// Reading the subject before the ledger write failed.
    #[error("Subject repository error: {0}")]
    Subjects(SubjectRepositoryError),

    /// The ledger read or write failed. Nothing was applied.
    #[error("Vote ledger error: {0}")]
    Ledger(#[from] VoteRepositoryError),
}

//! Error types for the thread assembler.
use loop_feed_repository::errors::{SubjectRepositoryError, VoteRepositoryError};
use loop_feed_shared::types::PostId;
use thiserror::Error;

/// Represents errors that can occur while assembling a thread.
///
/// Dangling parent references and author lookup failures are not errors:
/// the former demote the reply to a root, the latter fall back to the raw
/// author id.
#[derive(Debug, Error)]
pub enum ThreadError {
    /// The post does not exist. Terminal: the caller should navigate away.
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Subject repository error: {0}")]
    Subjects(#[from] SubjectRepositoryError),

    #[error("Vote ledger error: {0}")]
    Ledger(#[from] VoteRepositoryError),
}

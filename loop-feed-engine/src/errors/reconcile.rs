//! Error types for the reconciliation path.
use loop_feed_repository::errors::{SubjectRepositoryError, VoteRepositoryError};
use thiserror::Error;

/// Represents errors that can occur while recounting a subject's aggregate
/// from the ledger.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Vote ledger error: {0}")]
    Ledger(#[from] VoteRepositoryError),

    #[error("Subject repository error: {0}")]
    Subjects(#[from] SubjectRepositoryError),
}

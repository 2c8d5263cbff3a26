//! Error types for the loop feed service.
//! Defines startup failures for the binary and the request-level error that
//! maps engine errors onto HTTP status codes.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use loop_feed_engine::errors::{ReconcileError, ThreadError, VoteError};
use loop_feed_repository::errors::SubjectRepositoryError;
use thiserror::Error;

/// Represents errors that can occur while starting the service.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Represents errors surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum AppError {
    /// The vote value in the request body is not -1, 0, or 1.
    #[error("Invalid vote value: {0}")]
    InvalidVoteValue(i64),

    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error(transparent)]
    Thread(#[from] ThreadError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Repository error: {0}")]
    Subjects(#[from] SubjectRepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidVoteValue(_) => StatusCode::BAD_REQUEST,
            AppError::Vote(VoteError::SubjectNotFound(_))
            | AppError::Thread(ThreadError::PostNotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

//! Error types for the loop feed repositories.
//! Consolidates and re-exports the error enums of the vote, subject, and
//! user repositories.
mod subjects;
mod users;
mod votes;

pub use subjects::SubjectRepositoryError;
pub use users::UserRepositoryError;
pub use votes::VoteRepositoryError;

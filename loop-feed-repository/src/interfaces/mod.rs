//! This module defines and re-exports the interfaces for the loop feed
//! repositories. It serves as a central point for accessing traits related
//! to data interaction.
mod subjects;
mod users;
mod votes;

pub use subjects::SubjectRepository;
pub use users::UserRepository;
pub use votes::VoteRepository;

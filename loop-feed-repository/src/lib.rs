//! # Loop Feed Repository
//! This crate provides traits and implementations for interacting with the
//! feed data store. It includes definitions for errors, interfaces, a
//! PostgreSQL backend, and an in-memory backend used by tests and local
//! development.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::{SubjectRepositoryError, UserRepositoryError, VoteRepositoryError};
pub use interfaces::{SubjectRepository, UserRepository, VoteRepository};
pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

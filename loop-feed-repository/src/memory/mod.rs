//! In-memory implementation of the loop feed repositories.
//!
//! Backs the engine's unit and integration tests and local development runs
//! where no PostgreSQL instance is available. Counter updates take the same
//! delta-increment shape as the Postgres backend so the engine observes the
//! same semantics against either store.
mod repository;

pub use repository::MemoryRepository;

//! PostgreSQL implementation of the loop feed repositories.
//!
//! Provides a production PostgreSQL backend for the `VoteRepository`,
//! `SubjectRepository`, and `UserRepository` traits with connection pooling,
//! ledger upserts via `ON CONFLICT DO UPDATE`, and counter updates as
//! in-place `SET x = x + $n` increments.
//!
//! ## Database Tables
//!
//! - `posts`: posts with denormalized counters and trending score
//! - `replies`: threaded replies with denormalized counters
//! - `votes`: the vote ledger, one row per (subject, voter)
//! - `users`: profile fields and the aura counter
mod repository;

pub use repository::PostgresRepository;

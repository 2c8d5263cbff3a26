//! # Loop Feed Engine
//!
//! Core logic of the loop feed: the vote state machine, the decaying
//! trending score, the thread assembler, the optimistic vote-state cache,
//! and the ledger-to-aggregate reconciliation path. Storage is reached only
//! through the repository traits, so the engine runs unchanged against the
//! PostgreSQL and in-memory backends.
pub mod cache;
pub mod errors;
pub mod reconcile;
pub mod score;
pub mod thread;
pub mod vote;

pub use cache::VoteStateCache;
pub use errors::{ReconcileError, ThreadError, VoteError};
pub use reconcile::Reconciler;
pub use score::trending_score;
pub use thread::{ThreadAssembler, ThreadItem, ThreadNode};
pub use vote::{VoteOutcome, VoteService};

//! Error types for the loop feed engine.
//! Consolidates and re-exports the error enums of the vote, thread, and
//! reconciliation modules.
mod reconcile;
mod thread;
mod vote;

pub use reconcile::ReconcileError;
pub use thread::ThreadError;
pub use vote::VoteError;

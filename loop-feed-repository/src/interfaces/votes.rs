//! This module defines the `VoteRepository` trait, the interface to the vote
//! ledger: the per-(subject, voter) records that are the source of truth for
//! every voter's current stance.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use loop_feed_shared::types::{SubjectId, SubjectRef, VoteRecord, VoteValue};

use crate::errors::VoteRepositoryError;

/// A trait that defines the interface for the vote ledger.
///
/// A ledger entry exists only while the voter's stance is non-neutral:
/// retracting a vote deletes the entry. The entry for a given
/// (subject, voter) pair is only ever written by that voter, so there is no
/// cross-voter contention on individual records.
#[async_trait::async_trait]
pub trait VoteRepository: Send + Sync {
    /// Returns the voter's current ledger entry for a subject, or `None`
    /// when the voter is neutral.
    async fn get_vote(
        &self,
        subject: &SubjectRef,
        voter_id: &str,
    ) -> Result<Option<VoteRecord>, VoteRepositoryError>;

    /// Creates or replaces the voter's ledger entry for a subject.
    async fn upsert_vote(
        &self,
        subject: &SubjectRef,
        voter_id: &str,
        value: VoteValue,
        voted_at: DateTime<Utc>,
    ) -> Result<(), VoteRepositoryError>;

    /// Deletes the voter's ledger entry for a subject. Deleting an absent
    /// entry is a no-op, which keeps retraction idempotent.
    async fn delete_vote(
        &self,
        subject: &SubjectRef,
        voter_id: &str,
    ) -> Result<(), VoteRepositoryError>;

    /// Returns every ledger entry for one subject. Used by the
    /// reconciliation path to recount aggregates from the source of truth.
    async fn votes_for_subject(
        &self,
        subject: &SubjectRef,
    ) -> Result<Vec<VoteRecord>, VoteRepositoryError>;

    /// Returns one voter's stance on the post and on every reply under it,
    /// keyed by subject id. Fetched as a single scoped query so thread
    /// assembly does not issue a lookup per node.
    async fn votes_by_voter_on_post(
        &self,
        loop_id: &str,
        post_id: &str,
        voter_id: &str,
    ) -> Result<HashMap<SubjectId, VoteValue>, VoteRepositoryError>;
}

//! This module defines the `SubjectRepository` trait, the interface to posts
//! and replies together with their denormalized vote counters.
use loop_feed_shared::types::{NewPost, NewReply, Post, Reply, SubjectRef, VoteDelta, VoteTotals};

use crate::errors::SubjectRepositoryError;

/// A trait that defines the interface for posts, replies, and their
/// aggregate counters.
///
/// Counter mutations go through [`apply_vote_delta`](Self::apply_vote_delta)
/// as atomic in-place increments so concurrent voters on the same subject
/// never lose updates; the post-update totals are returned so callers can
/// recompute the trending score without a second read.
#[async_trait::async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Fetches a post by loop and id. `None` when it does not exist.
    async fn get_post(
        &self,
        loop_id: &str,
        post_id: &str,
    ) -> Result<Option<Post>, SubjectRepositoryError>;

    /// Fetches a reply by loop, post, and id. `None` when it does not exist.
    async fn get_reply(
        &self,
        loop_id: &str,
        post_id: &str,
        reply_id: &str,
    ) -> Result<Option<Reply>, SubjectRepositoryError>;

    /// Creates a post with zero counters and zero score.
    async fn create_post(&self, post: NewPost) -> Result<Post, SubjectRepositoryError>;

    /// Creates a reply with zero counters.
    async fn create_reply(&self, reply: NewReply) -> Result<Reply, SubjectRepositoryError>;

    /// Returns every reply under a post, flat, ordered by creation time
    /// ascending. Creation order is the tie-break for stable sibling
    /// ordering in the assembled thread.
    async fn list_replies(
        &self,
        loop_id: &str,
        post_id: &str,
    ) -> Result<Vec<Reply>, SubjectRepositoryError>;

    /// Applies counter deltas as atomic increments and returns the
    /// post-update totals. Fails with `NotFound` when the subject row is
    /// gone.
    async fn apply_vote_delta(
        &self,
        subject: &SubjectRef,
        delta: VoteDelta,
    ) -> Result<VoteTotals, SubjectRepositoryError>;

    /// Overwrites a subject's counters outright. Only the reconciliation
    /// path uses this; the vote path must stay on `apply_vote_delta`.
    async fn overwrite_totals(
        &self,
        subject: &SubjectRef,
        totals: VoteTotals,
    ) -> Result<(), SubjectRepositoryError>;

    /// Persists a recomputed trending score on a post.
    async fn set_post_score(
        &self,
        loop_id: &str,
        post_id: &str,
        score: f64,
    ) -> Result<(), SubjectRepositoryError>;

    /// Returns up to `limit` posts of a loop ordered by trending score
    /// descending, creation time descending as the tie-break.
    async fn trending_posts(
        &self,
        loop_id: &str,
        limit: i64,
    ) -> Result<Vec<Post>, SubjectRepositoryError>;
}

//! The vote service: applies a voter's intended stance to a subject while
//! keeping the ledger, the aggregate counters, the trending score, and the
//! author's aura consistent.
//!
//! The ledger is the source of truth. Every write after the ledger write is
//! an independent atomic operation (no cross-document transaction is
//! assumed), so a failure there leaves a recoverable gap instead of rolling
//! the ledger back; see [`VoteOutcome::LedgerOnly`] and the reconciliation
//! path in [`crate::reconcile`].
use std::sync::Arc;

use chrono::Utc;
use loop_feed_repository::errors::SubjectRepositoryError;
use loop_feed_repository::interfaces::{SubjectRepository, UserRepository, VoteRepository};
use loop_feed_shared::types::{SubjectRef, VoteDelta, VoteTotals, VoteValue, signum};
use tracing::warn;

use crate::errors::VoteError;
use crate::score::trending_score;

/// Result of a `cast_vote` call.
#[derive(Debug)]
pub enum VoteOutcome {
    /// The intended stance equals the stored one. Nothing was written;
    /// re-applying the same vote is a cheap success, not an error.
    Unchanged,
    /// Ledger and counters were updated. `score` carries the recomputed
    /// trending score for posts and is `None` for replies (which are not
    /// ranked) or when the score write failed (tolerated: the score is
    /// re-derived on the next vote).
    Applied {
        totals: VoteTotals,
        score: Option<f64>,
    },
    /// The ledger write landed but the counter increment did not. The
    /// ledger stays authoritative; the aggregate can be resynced through
    /// [`Reconciler::recount`](crate::reconcile::Reconciler::recount) or by
    /// the next successful vote.
    LedgerOnly { error: SubjectRepositoryError },
}

/// Applies vote transitions to subjects.
///
/// Holds the three repository seams as trait objects so the same service
/// runs against any backend.
pub struct VoteService {
    subjects: Arc<dyn SubjectRepository>,
    votes: Arc<dyn VoteRepository>,
    users: Arc<dyn UserRepository>,
}

impl VoteService {
    pub fn new(
        subjects: Arc<dyn SubjectRepository>,
        votes: Arc<dyn VoteRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            subjects,
            votes,
            users,
        }
    }

    /// Applies `intended` (`None` retracts to neutral) as `voter_id`'s
    /// stance on `subject`.
    ///
    /// Contract, in order:
    /// 1. the subject must exist (`SubjectNotFound` otherwise);
    /// 2. absence of a ledger entry reads as a neutral previous stance;
    /// 3. `intended == previous` is an idempotent no-op;
    /// 4. the ledger entry is upserted, or deleted on retraction;
    /// 5. counter deltas follow the indicator formula and are applied as
    ///    one atomic increment returning the post-update totals;
    /// 6. posts only: the trending score is recomputed from those totals;
    /// 7. posts only: `Δaura = intended − previous` is applied to the
    ///    author. Replies do not touch aura.
    pub async fn cast_vote(
        &self,
        subject: &SubjectRef,
        voter_id: &str,
        intended: Option<VoteValue>,
    ) -> Result<VoteOutcome, VoteError> {
        // Posts need their author and age later; replies only need to exist.
        let post_meta = match subject {
            SubjectRef::Post { loop_id, post_id } => {
                let post = self
                    .subjects
                    .get_post(loop_id, post_id)
                    .await
                    .map_err(VoteError::Subjects)?
                    .ok_or_else(|| VoteError::SubjectNotFound(post_id.clone()))?;
                Some((post.poster_id, post.created_at))
            }
            SubjectRef::Reply {
                loop_id,
                post_id,
                reply_id,
            } => {
                self.subjects
                    .get_reply(loop_id, post_id, reply_id)
                    .await
                    .map_err(VoteError::Subjects)?
                    .ok_or_else(|| VoteError::SubjectNotFound(reply_id.clone()))?;
                None
            }
        };

        let previous = self
            .votes
            .get_vote(subject, voter_id)
            .await?
            .map(|record| record.value);
        if previous == intended {
            return Ok(VoteOutcome::Unchanged);
        }

        let now = Utc::now();
        match intended {
            Some(value) => self.votes.upsert_vote(subject, voter_id, value, now).await?,
            None => self.votes.delete_vote(subject, voter_id).await?,
        }

        let delta = vote_delta(previous, intended);
        let totals = match self.subjects.apply_vote_delta(subject, delta).await {
            Ok(totals) => totals,
            Err(error) => {
                warn!(
                    subject_id = %subject.subject_id(),
                    %error,
                    "counter update failed after ledger write; ledger stays authoritative"
                );
                return Ok(VoteOutcome::LedgerOnly { error });
            }
        };

        let mut score = None;
        if let Some((poster_id, created_at)) = post_meta {
            let recomputed = trending_score(totals.upvotes, totals.downvotes, created_at, now);
            match self
                .subjects
                .set_post_score(subject.loop_id(), subject.post_id(), recomputed)
                .await
            {
                Ok(()) => score = Some(recomputed),
                Err(error) => {
                    warn!(
                        post_id = %subject.post_id(),
                        %error,
                        "score write failed; re-derived on the next vote"
                    );
                }
            }

            let aura_delta = signum(intended) - signum(previous);
            if aura_delta != 0 {
                if let Err(error) = self.users.adjust_aura(&poster_id, aura_delta).await {
                    warn!(author_id = %poster_id, %error, "aura update failed");
                }
            }
        }

        Ok(VoteOutcome::Applied { totals, score })
    }
}

/// Counter deltas for a vote transition, by the indicator formula:
/// `Δup = [intended == Up] − [previous == Up]`,
/// `Δdown = [intended == Down] − [previous == Down]`.
pub fn vote_delta(previous: Option<VoteValue>, intended: Option<VoteValue>) -> VoteDelta {
    let (upvotes, downvotes) = match (previous, intended) {
        (None, Some(VoteValue::Up)) => (1, 0),
        (None, Some(VoteValue::Down)) => (0, 1),
        (Some(VoteValue::Up), None) => (-1, 0),
        (Some(VoteValue::Down), None) => (0, -1),
        (Some(VoteValue::Up), Some(VoteValue::Down)) => (-1, 1),
        (Some(VoteValue::Down), Some(VoteValue::Up)) => (1, -1),
        (None, None)
        | (Some(VoteValue::Up), Some(VoteValue::Up))
        | (Some(VoteValue::Down), Some(VoteValue::Down)) => (0, 0),
    };
    VoteDelta { upvotes, downvotes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use loop_feed_repository::MemoryRepository;
    use loop_feed_shared::types::{NewPost, NewReply, Post, Reply, UserProfile};

    fn service(repo: Arc<MemoryRepository>) -> VoteService {
        VoteService::new(repo.clone(), repo.clone(), repo)
    }

    async fn seeded_post(repo: &MemoryRepository) -> Post {
        repo.seed_user(UserProfile {
            id: "author".to_string(),
            display_name: Some("Author".to_string()),
            username: None,
            aura_total: 0,
        })
        .await;
        repo.create_post(NewPost {
            loop_id: "cs".to_string(),
            loop_name: "#cs".to_string(),
            content: "post".to_string(),
            poster_id: "author".to_string(),
            anon: false,
        })
        .await
        .unwrap()
    }

    #[test]
    fn vote_delta_covers_the_full_transition_grid() {
        use VoteValue::{Down, Up};
        let cases = [
            (None, None, (0, 0)),
            (None, Some(Up), (1, 0)),
            (None, Some(Down), (0, 1)),
            (Some(Up), None, (-1, 0)),
            (Some(Up), Some(Up), (0, 0)),
            (Some(Up), Some(Down), (-1, 1)),
            (Some(Down), None, (0, -1)),
            (Some(Down), Some(Up), (1, -1)),
            (Some(Down), Some(Down), (0, 0)),
        ];
        for (previous, intended, (up, down)) in cases {
            let delta = vote_delta(previous, intended);
            assert_eq!(
                (delta.upvotes, delta.downvotes),
                (up, down),
                "previous={previous:?} intended={intended:?}"
            );
        }
    }

    #[test]
    fn vote_deltas_commute_across_voters() {
        // Any interleaving of per-voter transitions sums to the same totals.
        use VoteValue::{Down, Up};
        let transitions = [
            vote_delta(None, Some(Up)),
            vote_delta(None, Some(Down)),
            vote_delta(Some(Down), Some(Up)),
            vote_delta(Some(Up), None),
        ];
        let forward: (i64, i64) = transitions
            .iter()
            .fold((0, 0), |acc, d| (acc.0 + d.upvotes, acc.1 + d.downvotes));
        let backward: (i64, i64) = transitions
            .iter()
            .rev()
            .fold((0, 0), |acc, d| (acc.0 + d.upvotes, acc.1 + d.downvotes));
        assert_eq!(forward, backward);
    }

    #[tokio::test]
    async fn casting_the_same_vote_twice_is_a_noop() {
        let repo = Arc::new(MemoryRepository::new());
        let post = seeded_post(&repo).await;
        let subject = SubjectRef::post("cs", post.id.clone());
        let svc = service(repo.clone());

        let first = svc
            .cast_vote(&subject, "v1", Some(VoteValue::Up))
            .await
            .unwrap();
        assert!(matches!(
            first,
            VoteOutcome::Applied { totals, .. } if totals.upvotes == 1
        ));

        let second = svc
            .cast_vote(&subject, "v1", Some(VoteValue::Up))
            .await
            .unwrap();
        assert!(matches!(second, VoteOutcome::Unchanged));

        let stored = repo.get_post("cs", &post.id).await.unwrap().unwrap();
        assert_eq!(stored.totals.upvotes, 1);
    }

    #[tokio::test]
    async fn retraction_deletes_the_ledger_entry() {
        let repo = Arc::new(MemoryRepository::new());
        let post = seeded_post(&repo).await;
        let subject = SubjectRef::post("cs", post.id.clone());
        let svc = service(repo.clone());

        svc.cast_vote(&subject, "v1", Some(VoteValue::Down))
            .await
            .unwrap();
        assert!(repo.get_vote(&subject, "v1").await.unwrap().is_some());

        svc.cast_vote(&subject, "v1", None).await.unwrap();
        assert!(repo.get_vote(&subject, "v1").await.unwrap().is_none());

        let stored = repo.get_post("cs", &post.id).await.unwrap().unwrap();
        assert_eq!(stored.totals.downvotes, 0);
    }

    #[tokio::test]
    async fn voting_on_a_missing_subject_fails_terminally() {
        let repo = Arc::new(MemoryRepository::new());
        let svc = service(repo);
        let subject = SubjectRef::post("cs", "ghost");

        let result = svc.cast_vote(&subject, "v1", Some(VoteValue::Up)).await;
        assert!(matches!(result, Err(VoteError::SubjectNotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn post_vote_updates_score_and_author_aura() {
        let repo = Arc::new(MemoryRepository::new());
        let post = seeded_post(&repo).await;
        let subject = SubjectRef::post("cs", post.id.clone());
        let svc = service(repo.clone());

        let outcome = svc
            .cast_vote(&subject, "v1", Some(VoteValue::Up))
            .await
            .unwrap();
        match outcome {
            VoteOutcome::Applied { totals, score } => {
                assert_eq!(totals.upvotes, 1);
                let score = score.expect("posts get a recomputed score");
                assert!(score > 0.0);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let stored = repo.get_post("cs", &post.id).await.unwrap().unwrap();
        assert!(stored.score > 0.0);
        let author = repo.get_profile("author").await.unwrap().unwrap();
        assert_eq!(author.aura_total, 1);
    }

    #[tokio::test]
    async fn reply_vote_skips_score_and_aura() {
        let repo = Arc::new(MemoryRepository::new());
        let post = seeded_post(&repo).await;
        let reply = repo
            .create_reply(NewReply {
                loop_id: "cs".to_string(),
                post_id: post.id.clone(),
                replier_id: "author".to_string(),
                content: "reply".to_string(),
                anon: false,
                parent_id: None,
            })
            .await
            .unwrap();
        let subject = SubjectRef::reply("cs", post.id.clone(), reply.id.clone());
        let svc = service(repo.clone());

        let outcome = svc
            .cast_vote(&subject, "v1", Some(VoteValue::Up))
            .await
            .unwrap();
        match outcome {
            VoteOutcome::Applied { totals, score } => {
                assert_eq!(totals.upvotes, 1);
                assert!(score.is_none(), "replies are not ranked");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        // reply votes leave the author's aura untouched
        let author = repo.get_profile("author").await.unwrap().unwrap();
        assert_eq!(author.aura_total, 0);
    }

    /// Subject store that accepts reads but fails every counter increment,
    /// exercising the window after the ledger write.
    struct BrokenCounters {
        inner: Arc<MemoryRepository>,
    }

    #[async_trait]
    impl SubjectRepository for BrokenCounters {
        async fn get_post(
            &self,
            loop_id: &str,
            post_id: &str,
        ) -> Result<Option<Post>, SubjectRepositoryError> {
            self.inner.get_post(loop_id, post_id).await
        }
        async fn get_reply(
            &self,
            loop_id: &str,
            post_id: &str,
            reply_id: &str,
        ) -> Result<Option<Reply>, SubjectRepositoryError> {
            self.inner.get_reply(loop_id, post_id, reply_id).await
        }
        async fn create_post(&self, post: NewPost) -> Result<Post, SubjectRepositoryError> {
            self.inner.create_post(post).await
        }
        async fn create_reply(&self, reply: NewReply) -> Result<Reply, SubjectRepositoryError> {
            self.inner.create_reply(reply).await
        }
        async fn list_replies(
            &self,
            loop_id: &str,
            post_id: &str,
        ) -> Result<Vec<Reply>, SubjectRepositoryError> {
            self.inner.list_replies(loop_id, post_id).await
        }
        async fn apply_vote_delta(
            &self,
            subject: &SubjectRef,
            _delta: VoteDelta,
        ) -> Result<VoteTotals, SubjectRepositoryError> {
            Err(SubjectRepositoryError::NotFound(
                subject.subject_id().clone(),
            ))
        }
        async fn overwrite_totals(
            &self,
            subject: &SubjectRef,
            totals: VoteTotals,
        ) -> Result<(), SubjectRepositoryError> {
            self.inner.overwrite_totals(subject, totals).await
        }
        async fn set_post_score(
            &self,
            loop_id: &str,
            post_id: &str,
            score: f64,
        ) -> Result<(), SubjectRepositoryError> {
            self.inner.set_post_score(loop_id, post_id, score).await
        }
        async fn trending_posts(
            &self,
            loop_id: &str,
            limit: i64,
        ) -> Result<Vec<Post>, SubjectRepositoryError> {
            self.inner.trending_posts(loop_id, limit).await
        }
    }

    #[tokio::test]
    async fn counter_failure_after_ledger_write_reports_ledger_only() {
        let repo = Arc::new(MemoryRepository::new());
        let post = seeded_post(&repo).await;
        let subject = SubjectRef::post("cs", post.id.clone());
        let svc = VoteService::new(
            Arc::new(BrokenCounters {
                inner: repo.clone(),
            }),
            repo.clone(),
            repo.clone(),
        );

        let outcome = svc
            .cast_vote(&subject, "v1", Some(VoteValue::Up))
            .await
            .unwrap();
        assert!(matches!(outcome, VoteOutcome::LedgerOnly { .. }));

        // the ledger write was not rolled back
        let stored = repo.get_vote(&subject, "v1").await.unwrap().unwrap();
        assert_eq!(stored.value, VoteValue::Up);
    }
}

//! On-demand reconciliation of aggregate counters from the vote ledger.
//!
//! The counters on a subject are an eventually-consistent cache of the
//! ledger. A vote that committed its ledger write but lost its counter
//! increment leaves the two skewed until the next successful vote; this
//! module closes that gap explicitly by recounting. Nothing schedules it —
//! callers (an admin endpoint, a periodic job) decide when.
use std::sync::Arc;

use chrono::Utc;
use loop_feed_repository::interfaces::{SubjectRepository, VoteRepository};
use loop_feed_shared::types::{SubjectRef, VoteTotals, VoteValue};
use tracing::info;

use crate::errors::ReconcileError;
use crate::score::trending_score;

/// Recounts a subject's aggregate from its ledger entries.
pub struct Reconciler {
    subjects: Arc<dyn SubjectRepository>,
    votes: Arc<dyn VoteRepository>,
}

impl Reconciler {
    pub fn new(subjects: Arc<dyn SubjectRepository>, votes: Arc<dyn VoteRepository>) -> Self {
        Self { subjects, votes }
    }

    /// Scans every ledger entry for `subject`, overwrites the counters with
    /// the true totals, and recomputes the trending score for posts.
    /// Returns the recounted totals.
    pub async fn recount(&self, subject: &SubjectRef) -> Result<VoteTotals, ReconcileError> {
        let records = self.votes.votes_for_subject(subject).await?;

        let mut totals = VoteTotals::default();
        for record in &records {
            match record.value {
                VoteValue::Up => totals.upvotes += 1,
                VoteValue::Down => totals.downvotes += 1,
            }
        }

        self.subjects.overwrite_totals(subject, totals).await?;

        if let SubjectRef::Post { loop_id, post_id } = subject {
            if let Some(post) = self.subjects.get_post(loop_id, post_id).await? {
                let score = trending_score(
                    totals.upvotes,
                    totals.downvotes,
                    post.created_at,
                    Utc::now(),
                );
                self.subjects.set_post_score(loop_id, post_id, score).await?;
            }
        }

        info!(
            subject_id = %subject.subject_id(),
            upvotes = totals.upvotes,
            downvotes = totals.downvotes,
            "aggregate recounted from ledger"
        );
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use loop_feed_repository::MemoryRepository;
    use loop_feed_shared::types::{NewPost, UserProfile};

    #[tokio::test]
    async fn recount_resyncs_a_skewed_aggregate() {
        let repo = Arc::new(MemoryRepository::new());
        repo.seed_user(UserProfile {
            id: "author".to_string(),
            display_name: None,
            username: None,
            aura_total: 0,
        })
        .await;
        let post = repo
            .create_post(NewPost {
                loop_id: "cs".to_string(),
                loop_name: "#cs".to_string(),
                content: "post".to_string(),
                poster_id: "author".to_string(),
                anon: false,
            })
            .await
            .unwrap();
        let subject = SubjectRef::post("cs", post.id.clone());

        // ledger has three stances, counters were never incremented
        for (voter, value) in [
            ("v1", VoteValue::Up),
            ("v2", VoteValue::Up),
            ("v3", VoteValue::Down),
        ] {
            repo.upsert_vote(&subject, voter, value, Utc::now())
                .await
                .unwrap();
        }

        let reconciler = Reconciler::new(repo.clone(), repo.clone());
        let totals = reconciler.recount(&subject).await.unwrap();
        assert_eq!(totals.upvotes, 2);
        assert_eq!(totals.downvotes, 1);

        let stored = repo.get_post("cs", &post.id).await.unwrap().unwrap();
        assert_eq!(stored.totals, totals);
        assert!(stored.score > 0.0, "score recomputed from true totals");
    }

    #[tokio::test]
    async fn recount_with_empty_ledger_zeroes_the_counters() {
        let repo = Arc::new(MemoryRepository::new());
        let post = repo
            .create_post(NewPost {
                loop_id: "cs".to_string(),
                loop_name: "#cs".to_string(),
                content: "post".to_string(),
                poster_id: "author".to_string(),
                anon: false,
            })
            .await
            .unwrap();
        let subject = SubjectRef::post("cs", post.id.clone());

        // fake drift: counters claim votes the ledger does not have
        repo.overwrite_totals(
            &subject,
            VoteTotals {
                upvotes: 5,
                downvotes: 2,
            },
        )
        .await
        .unwrap();

        let reconciler = Reconciler::new(repo.clone(), repo.clone());
        let totals = reconciler.recount(&subject).await.unwrap();
        assert_eq!(totals, VoteTotals::default());
    }
}

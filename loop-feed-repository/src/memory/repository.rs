use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use loop_feed_shared::types::{
    NewPost, NewReply, Post, Reply, SubjectId, SubjectKind, SubjectRef, UserProfile, VoteDelta,
    VoteRecord, VoteTotals, VoteValue,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{SubjectRepositoryError, UserRepositoryError, VoteRepositoryError};
use crate::interfaces::{SubjectRepository, UserRepository, VoteRepository};

type PostKey = (String, String);
type ReplyKey = (String, String, String);
type VoteKey = (String, String, String, SubjectKind, String);

#[derive(Default)]
struct Inner {
    posts: HashMap<PostKey, Post>,
    replies: HashMap<ReplyKey, Reply>,
    votes: HashMap<VoteKey, VoteRecord>,
    users: HashMap<String, UserProfile>,
}

/// In-memory implementation of the loop feed repositories.
///
/// All state lives behind one `RwLock`, so every operation the traits call
/// atomic is atomic here as well.
#[derive(Default)]
pub struct MemoryRepository {
    inner: RwLock<Inner>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user record. Test and dev seeding helper.
    pub async fn seed_user(&self, profile: UserProfile) {
        self.inner
            .write()
            .await
            .users
            .insert(profile.id.clone(), profile);
    }

    /// Inserts a fully-formed post, counters and all. Test seeding helper;
    /// production code creates posts through `create_post`.
    pub async fn seed_post(&self, post: Post) {
        self.inner
            .write()
            .await
            .posts
            .insert((post.loop_id.clone(), post.id.clone()), post);
    }

    /// Inserts a fully-formed reply. Test seeding helper.
    pub async fn seed_reply(&self, reply: Reply) {
        self.inner.write().await.replies.insert(
            (
                reply.loop_id.clone(),
                reply.post_id.clone(),
                reply.id.clone(),
            ),
            reply,
        );
    }

    /// Removes a post, simulating a concurrent delete between a voter's
    /// read and write.
    pub async fn remove_post(&self, loop_id: &str, post_id: &str) {
        self.inner
            .write()
            .await
            .posts
            .remove(&(loop_id.to_string(), post_id.to_string()));
    }
}

fn vote_key(subject: &SubjectRef, voter_id: &str) -> VoteKey {
    (
        subject.loop_id().to_string(),
        subject.post_id().to_string(),
        subject.subject_id().clone(),
        subject.kind(),
        voter_id.to_string(),
    )
}

#[async_trait]
impl VoteRepository for MemoryRepository {
    async fn get_vote(
        &self,
        subject: &SubjectRef,
        voter_id: &str,
    ) -> Result<Option<VoteRecord>, VoteRepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.votes.get(&vote_key(subject, voter_id)).cloned())
    }

    async fn upsert_vote(
        &self,
        subject: &SubjectRef,
        voter_id: &str,
        value: VoteValue,
        voted_at: DateTime<Utc>,
    ) -> Result<(), VoteRepositoryError> {
        let record = VoteRecord {
            subject_id: subject.subject_id().clone(),
            subject_kind: subject.kind(),
            voter_id: voter_id.to_string(),
            value,
            voted_at,
        };
        self.inner
            .write()
            .await
            .votes
            .insert(vote_key(subject, voter_id), record);
        Ok(())
    }

    async fn delete_vote(
        &self,
        subject: &SubjectRef,
        voter_id: &str,
    ) -> Result<(), VoteRepositoryError> {
        self.inner
            .write()
            .await
            .votes
            .remove(&vote_key(subject, voter_id));
        Ok(())
    }

    async fn votes_for_subject(
        &self,
        subject: &SubjectRef,
    ) -> Result<Vec<VoteRecord>, VoteRepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .votes
            .iter()
            .filter(|((loop_id, post_id, subject_id, kind, _), _)| {
                loop_id == subject.loop_id()
                    && post_id == subject.post_id()
                    && subject_id == subject.subject_id()
                    && *kind == subject.kind()
            })
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn votes_by_voter_on_post(
        &self,
        loop_id: &str,
        post_id: &str,
        voter_id: &str,
    ) -> Result<HashMap<SubjectId, VoteValue>, VoteRepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .votes
            .iter()
            .filter(|((l, p, _, _, v), _)| l == loop_id && p == post_id && v == voter_id)
            .map(|((_, _, subject_id, _, _), record)| (subject_id.clone(), record.value))
            .collect())
    }
}

#[async_trait]
impl SubjectRepository for MemoryRepository {
    async fn get_post(
        &self,
        loop_id: &str,
        post_id: &str,
    ) -> Result<Option<Post>, SubjectRepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .get(&(loop_id.to_string(), post_id.to_string()))
            .cloned())
    }

    async fn get_reply(
        &self,
        loop_id: &str,
        post_id: &str,
        reply_id: &str,
    ) -> Result<Option<Reply>, SubjectRepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .replies
            .get(&(
                loop_id.to_string(),
                post_id.to_string(),
                reply_id.to_string(),
            ))
            .cloned())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, SubjectRepositoryError> {
        let created = Post {
            id: Uuid::new_v4().to_string(),
            loop_id: post.loop_id,
            loop_name: post.loop_name,
            content: post.content,
            poster_id: post.poster_id,
            anon: post.anon,
            totals: VoteTotals::default(),
            score: 0.0,
            created_at: Utc::now(),
        };
        self.inner.write().await.posts.insert(
            (created.loop_id.clone(), created.id.clone()),
            created.clone(),
        );
        Ok(created)
    }

    async fn create_reply(&self, reply: NewReply) -> Result<Reply, SubjectRepositoryError> {
        let created = Reply {
            id: Uuid::new_v4().to_string(),
            loop_id: reply.loop_id,
            post_id: reply.post_id,
            replier_id: reply.replier_id,
            content: reply.content,
            anon: reply.anon,
            parent_id: reply.parent_id,
            totals: VoteTotals::default(),
            created_at: Utc::now(),
        };
        self.inner.write().await.replies.insert(
            (
                created.loop_id.clone(),
                created.post_id.clone(),
                created.id.clone(),
            ),
            created.clone(),
        );
        Ok(created)
    }

    async fn list_replies(
        &self,
        loop_id: &str,
        post_id: &str,
    ) -> Result<Vec<Reply>, SubjectRepositoryError> {
        let inner = self.inner.read().await;
        let mut replies: Vec<Reply> = inner
            .replies
            .iter()
            .filter(|((l, p, _), _)| l == loop_id && p == post_id)
            .map(|(_, reply)| reply.clone())
            .collect();
        replies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(replies)
    }

    async fn apply_vote_delta(
        &self,
        subject: &SubjectRef,
        delta: VoteDelta,
    ) -> Result<VoteTotals, SubjectRepositoryError> {
        let mut inner = self.inner.write().await;
        let totals = match subject {
            SubjectRef::Post { loop_id, post_id } => {
                let post = inner
                    .posts
                    .get_mut(&(loop_id.clone(), post_id.clone()))
                    .ok_or_else(|| SubjectRepositoryError::NotFound(post_id.clone()))?;
                post.totals.upvotes += delta.upvotes;
                post.totals.downvotes += delta.downvotes;
                post.totals
            }
            SubjectRef::Reply {
                loop_id,
                post_id,
                reply_id,
            } => {
                let reply = inner
                    .replies
                    .get_mut(&(loop_id.clone(), post_id.clone(), reply_id.clone()))
                    .ok_or_else(|| SubjectRepositoryError::NotFound(reply_id.clone()))?;
                reply.totals.upvotes += delta.upvotes;
                reply.totals.downvotes += delta.downvotes;
                reply.totals
            }
        };
        Ok(totals)
    }

    async fn overwrite_totals(
        &self,
        subject: &SubjectRef,
        totals: VoteTotals,
    ) -> Result<(), SubjectRepositoryError> {
        let mut inner = self.inner.write().await;
        match subject {
            SubjectRef::Post { loop_id, post_id } => {
                let post = inner
                    .posts
                    .get_mut(&(loop_id.clone(), post_id.clone()))
                    .ok_or_else(|| SubjectRepositoryError::NotFound(post_id.clone()))?;
                post.totals = totals;
            }
            SubjectRef::Reply {
                loop_id,
                post_id,
                reply_id,
            } => {
                let reply = inner
                    .replies
                    .get_mut(&(loop_id.clone(), post_id.clone(), reply_id.clone()))
                    .ok_or_else(|| SubjectRepositoryError::NotFound(reply_id.clone()))?;
                reply.totals = totals;
            }
        }
        Ok(())
    }

    async fn set_post_score(
        &self,
        loop_id: &str,
        post_id: &str,
        score: f64,
    ) -> Result<(), SubjectRepositoryError> {
        let mut inner = self.inner.write().await;
        let post = inner
            .posts
            .get_mut(&(loop_id.to_string(), post_id.to_string()))
            .ok_or_else(|| SubjectRepositoryError::NotFound(post_id.to_string()))?;
        post.score = score;
        Ok(())
    }

    async fn trending_posts(
        &self,
        loop_id: &str,
        limit: i64,
    ) -> Result<Vec<Post>, SubjectRepositoryError> {
        let inner = self.inner.read().await;
        let mut posts: Vec<Post> = inner
            .posts
            .iter()
            .filter(|((l, _), _)| l == loop_id)
            .map(|(_, post)| post.clone())
            .collect();
        posts.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(b.created_at.cmp(&a.created_at))
        });
        posts.truncate(limit.max(0) as usize);
        Ok(posts)
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn get_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<UserProfile>, UserRepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(user_id).cloned())
    }

    async fn adjust_aura(&self, user_id: &str, delta: i64) -> Result<(), UserRepositoryError> {
        let mut inner = self.inner.write().await;
        if let Some(user) = inner.users.get_mut(user_id) {
            user.aura_total += delta;
        }
        Ok(())
    }
}

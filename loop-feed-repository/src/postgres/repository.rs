use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use loop_feed_shared::types::{
    NewPost, NewReply, Post, Reply, SubjectId, SubjectKind, SubjectRef, UserProfile, VoteDelta,
    VoteRecord, VoteTotals, VoteValue,
};
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::errors::{SubjectRepositoryError, UserRepositoryError, VoteRepositoryError};
use crate::interfaces::{SubjectRepository, UserRepository, VoteRepository};

/// PostgreSQL implementation of the loop feed repositories.
///
/// One pool-holding struct implements all three repository traits so a
/// single connection pool serves the vote ledger, the subjects, and the
/// user records.
pub struct PostgresRepository {
    pool: sqlx::PgPool,
}

impl PostgresRepository {
    /// Wraps an already-connected pool. Schema setup is the caller's
    /// responsibility (see `migrate`).
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url` and returns a ready repository.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = sqlx::PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Runs the embedded migrations against the pool.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn encode_kind(kind: SubjectKind) -> i16 {
    match kind {
        SubjectKind::Post => 0,
        SubjectKind::Reply => 1,
    }
}

fn decode_kind(kind: i16) -> Result<SubjectKind, VoteRepositoryError> {
    match kind {
        0 => Ok(SubjectKind::Post),
        1 => Ok(SubjectKind::Reply),
        other => Err(VoteRepositoryError::InvalidSubjectKind(other)),
    }
}

fn encode_value(value: VoteValue) -> i16 {
    match value {
        VoteValue::Up => 1,
        VoteValue::Down => -1,
    }
}

fn decode_value(value: i16) -> Result<VoteValue, VoteRepositoryError> {
    match value {
        1 => Ok(VoteValue::Up),
        -1 => Ok(VoteValue::Down),
        other => Err(VoteRepositoryError::InvalidVoteValue(other)),
    }
}

fn row_to_post(row: &PgRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        loop_id: row.try_get("loop_id")?,
        loop_name: row.try_get("loop_name")?,
        content: row.try_get("content")?,
        poster_id: row.try_get("poster_id")?,
        anon: row.try_get("anon")?,
        totals: VoteTotals {
            upvotes: row.try_get("upvotes")?,
            downvotes: row.try_get("downvotes")?,
        },
        score: row.try_get("score")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_reply(row: &PgRow) -> Result<Reply, sqlx::Error> {
    Ok(Reply {
        id: row.try_get("id")?,
        loop_id: row.try_get("loop_id")?,
        post_id: row.try_get("post_id")?,
        replier_id: row.try_get("replier_id")?,
        content: row.try_get("content")?,
        anon: row.try_get("anon")?,
        parent_id: row.try_get("parent_id")?,
        totals: VoteTotals {
            upvotes: row.try_get("upvotes")?,
            downvotes: row.try_get("downvotes")?,
        },
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_vote_record(row: &PgRow) -> Result<VoteRecord, VoteRepositoryError> {
    Ok(VoteRecord {
        subject_id: row.try_get::<String, _>("subject_id")?,
        subject_kind: decode_kind(row.try_get("subject_kind")?)?,
        voter_id: row.try_get("voter_id")?,
        value: decode_value(row.try_get("value")?)?,
        voted_at: row.try_get("voted_at")?,
    })
}

#[async_trait]
impl VoteRepository for PostgresRepository {
    async fn get_vote(
        &self,
        subject: &SubjectRef,
        voter_id: &str,
    ) -> Result<Option<VoteRecord>, VoteRepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT subject_id, subject_kind, voter_id, value, voted_at
            FROM votes
            WHERE loop_id = $1 AND post_id = $2 AND subject_id = $3
              AND subject_kind = $4 AND voter_id = $5
            "#,
        )
        .bind(subject.loop_id())
        .bind(subject.post_id())
        .bind(subject.subject_id())
        .bind(encode_kind(subject.kind()))
        .bind(voter_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_vote_record).transpose()
    }

    async fn upsert_vote(
        &self,
        subject: &SubjectRef,
        voter_id: &str,
        value: VoteValue,
        voted_at: DateTime<Utc>,
    ) -> Result<(), VoteRepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO votes (loop_id, post_id, subject_id, subject_kind, voter_id, value, voted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (loop_id, post_id, subject_id, subject_kind, voter_id)
            DO UPDATE SET
                value = EXCLUDED.value,
                voted_at = EXCLUDED.voted_at
            "#,
        )
        .bind(subject.loop_id())
        .bind(subject.post_id())
        .bind(subject.subject_id())
        .bind(encode_kind(subject.kind()))
        .bind(voter_id)
        .bind(encode_value(value))
        .bind(voted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_vote(
        &self,
        subject: &SubjectRef,
        voter_id: &str,
    ) -> Result<(), VoteRepositoryError> {
        sqlx::query(
            r#"
            DELETE FROM votes
            WHERE loop_id = $1 AND post_id = $2 AND subject_id = $3
              AND subject_kind = $4 AND voter_id = $5
            "#,
        )
        .bind(subject.loop_id())
        .bind(subject.post_id())
        .bind(subject.subject_id())
        .bind(encode_kind(subject.kind()))
        .bind(voter_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn votes_for_subject(
        &self,
        subject: &SubjectRef,
    ) -> Result<Vec<VoteRecord>, VoteRepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT subject_id, subject_kind, voter_id, value, voted_at
            FROM votes
            WHERE loop_id = $1 AND post_id = $2 AND subject_id = $3 AND subject_kind = $4
            "#,
        )
        .bind(subject.loop_id())
        .bind(subject.post_id())
        .bind(subject.subject_id())
        .bind(encode_kind(subject.kind()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_vote_record).collect()
    }

    async fn votes_by_voter_on_post(
        &self,
        loop_id: &str,
        post_id: &str,
        voter_id: &str,
    ) -> Result<HashMap<SubjectId, VoteValue>, VoteRepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT subject_id, value
            FROM votes
            WHERE loop_id = $1 AND post_id = $2 AND voter_id = $3
            "#,
        )
        .bind(loop_id)
        .bind(post_id)
        .bind(voter_id)
        .fetch_all(&self.pool)
        .await?;

        let mut stances = HashMap::with_capacity(rows.len());
        for row in &rows {
            let subject_id: String = row.try_get("subject_id")?;
            let value = decode_value(row.try_get("value")?)?;
            stances.insert(subject_id, value);
        }
        Ok(stances)
    }
}

#[async_trait]
impl SubjectRepository for PostgresRepository {
    async fn get_post(
        &self,
        loop_id: &str,
        post_id: &str,
    ) -> Result<Option<Post>, SubjectRepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, loop_id, loop_name, content, poster_id, anon,
                   upvotes, downvotes, score, created_at
            FROM posts
            WHERE loop_id = $1 AND id = $2
            "#,
        )
        .bind(loop_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_post).transpose()?)
    }

    async fn get_reply(
        &self,
        loop_id: &str,
        post_id: &str,
        reply_id: &str,
    ) -> Result<Option<Reply>, SubjectRepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, loop_id, post_id, replier_id, content, anon, parent_id,
                   upvotes, downvotes, created_at
            FROM replies
            WHERE loop_id = $1 AND post_id = $2 AND id = $3
            "#,
        )
        .bind(loop_id)
        .bind(post_id)
        .bind(reply_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_reply).transpose()?)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, SubjectRepositoryError> {
        let id = Uuid::new_v4().to_string();
        let row = sqlx::query(
            r#"
            INSERT INTO posts (id, loop_id, loop_name, content, poster_id, anon)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, loop_id, loop_name, content, poster_id, anon,
                      upvotes, downvotes, score, created_at
            "#,
        )
        .bind(&id)
        .bind(&post.loop_id)
        .bind(&post.loop_name)
        .bind(&post.content)
        .bind(&post.poster_id)
        .bind(post.anon)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_post(&row)?)
    }

    async fn create_reply(&self, reply: NewReply) -> Result<Reply, SubjectRepositoryError> {
        let id = Uuid::new_v4().to_string();
        let row = sqlx::query(
            r#"
            INSERT INTO replies (id, loop_id, post_id, replier_id, content, anon, parent_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, loop_id, post_id, replier_id, content, anon, parent_id,
                      upvotes, downvotes, created_at
            "#,
        )
        .bind(&id)
        .bind(&reply.loop_id)
        .bind(&reply.post_id)
        .bind(&reply.replier_id)
        .bind(&reply.content)
        .bind(reply.anon)
        .bind(&reply.parent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_reply(&row)?)
    }

    async fn list_replies(
        &self,
        loop_id: &str,
        post_id: &str,
    ) -> Result<Vec<Reply>, SubjectRepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, loop_id, post_id, replier_id, content, anon, parent_id,
                   upvotes, downvotes, created_at
            FROM replies
            WHERE loop_id = $1 AND post_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(loop_id)
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_reply).collect::<Result<_, _>>()?)
    }

    async fn apply_vote_delta(
        &self,
        subject: &SubjectRef,
        delta: VoteDelta,
    ) -> Result<VoteTotals, SubjectRepositoryError> {
        let row = match subject {
            SubjectRef::Post { loop_id, post_id } => {
                sqlx::query(
                    r#"
                    UPDATE posts
                    SET upvotes = upvotes + $1, downvotes = downvotes + $2
                    WHERE loop_id = $3 AND id = $4
                    RETURNING upvotes, downvotes
                    "#,
                )
                .bind(delta.upvotes)
                .bind(delta.downvotes)
                .bind(loop_id)
                .bind(post_id)
                .fetch_optional(&self.pool)
                .await?
            }
            SubjectRef::Reply {
                loop_id,
                post_id,
                reply_id,
            } => {
                sqlx::query(
                    r#"
                    UPDATE replies
                    SET upvotes = upvotes + $1, downvotes = downvotes + $2
                    WHERE loop_id = $3 AND post_id = $4 AND id = $5
                    RETURNING upvotes, downvotes
                    "#,
                )
                .bind(delta.upvotes)
                .bind(delta.downvotes)
                .bind(loop_id)
                .bind(post_id)
                .bind(reply_id)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        let row = row.ok_or_else(|| {
            SubjectRepositoryError::NotFound(subject.subject_id().clone())
        })?;
        Ok(VoteTotals {
            upvotes: row.try_get("upvotes")?,
            downvotes: row.try_get("downvotes")?,
        })
    }

    async fn overwrite_totals(
        &self,
        subject: &SubjectRef,
        totals: VoteTotals,
    ) -> Result<(), SubjectRepositoryError> {
        let result = match subject {
            SubjectRef::Post { loop_id, post_id } => {
                sqlx::query(
                    r#"
                    UPDATE posts SET upvotes = $1, downvotes = $2
                    WHERE loop_id = $3 AND id = $4
                    "#,
                )
                .bind(totals.upvotes)
                .bind(totals.downvotes)
                .bind(loop_id)
                .bind(post_id)
                .execute(&self.pool)
                .await?
            }
            SubjectRef::Reply {
                loop_id,
                post_id,
                reply_id,
            } => {
                sqlx::query(
                    r#"
                    UPDATE replies SET upvotes = $1, downvotes = $2
                    WHERE loop_id = $3 AND post_id = $4 AND id = $5
                    "#,
                )
                .bind(totals.upvotes)
                .bind(totals.downvotes)
                .bind(loop_id)
                .bind(post_id)
                .bind(reply_id)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(SubjectRepositoryError::NotFound(
                subject.subject_id().clone(),
            ));
        }
        Ok(())
    }

    async fn set_post_score(
        &self,
        loop_id: &str,
        post_id: &str,
        score: f64,
    ) -> Result<(), SubjectRepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE posts SET score = $1 WHERE loop_id = $2 AND id = $3
            "#,
        )
        .bind(score)
        .bind(loop_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SubjectRepositoryError::NotFound(post_id.to_string()));
        }
        Ok(())
    }

    async fn trending_posts(
        &self,
        loop_id: &str,
        limit: i64,
    ) -> Result<Vec<Post>, SubjectRepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, loop_id, loop_name, content, poster_id, anon,
                   upvotes, downvotes, score, created_at
            FROM posts
            WHERE loop_id = $1
            ORDER BY score DESC, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(loop_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_post).collect::<Result<_, _>>()?)
    }
}

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn get_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<UserProfile>, UserRepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, display_name, username, aura_total
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(UserProfile {
                id: row.try_get("id")?,
                display_name: row.try_get("display_name")?,
                username: row.try_get("username")?,
                aura_total: row.try_get("aura_total")?,
            })
        })
        .transpose()
        .map_err(UserRepositoryError::Database)
    }

    async fn adjust_aura(&self, user_id: &str, delta: i64) -> Result<(), UserRepositoryError> {
        sqlx::query(
            r#"
            UPDATE users SET aura_total = aura_total + $1 WHERE id = $2
            "#,
        )
        .bind(delta)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

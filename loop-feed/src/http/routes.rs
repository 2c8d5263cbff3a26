use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use loop_feed_engine::{ThreadItem, VoteOutcome};
use loop_feed_shared::types::{NewPost, NewReply, Post, SubjectRef, VoteValue};
use serde::{Deserialize, Serialize};

use crate::config::Dependencies;
use crate::errors::AppError;

#[derive(Deserialize)]
pub struct VoteRequest {
    pub voter_id: String,
    /// 1 = upvote, -1 = downvote, 0 = retract to neutral.
    pub value: i64,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VoteResponse {
    /// Re-application of the stance already held; nothing changed.
    Unchanged,
    Applied {
        upvotes: i64,
        downvotes: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
    },
    /// The ledger committed but the counters did not; they will be
    /// reconciled later. The caller's vote stands.
    LedgerOnly { detail: String },
}

impl From<VoteOutcome> for VoteResponse {
    fn from(outcome: VoteOutcome) -> Self {
        match outcome {
            VoteOutcome::Unchanged => VoteResponse::Unchanged,
            VoteOutcome::Applied { totals, score } => VoteResponse::Applied {
                upvotes: totals.upvotes,
                downvotes: totals.downvotes,
                score,
            },
            VoteOutcome::LedgerOnly { error } => VoteResponse::LedgerOnly {
                detail: error.to_string(),
            },
        }
    }
}

fn parse_value(value: i64) -> Result<Option<VoteValue>, AppError> {
    VoteValue::from_signum(value).map_err(AppError::InvalidVoteValue)
}

pub async fn vote_on_post(
    State(deps): State<Arc<Dependencies>>,
    Path((loop_id, post_id)): Path<(String, String)>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    let subject = SubjectRef::post(loop_id, post_id);
    let intended = parse_value(request.value)?;
    let outcome = deps
        .vote_service
        .cast_vote(&subject, &request.voter_id, intended)
        .await?;
    Ok(Json(outcome.into()))
}

pub async fn vote_on_reply(
    State(deps): State<Arc<Dependencies>>,
    Path((loop_id, post_id, reply_id)): Path<(String, String, String)>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    let subject = SubjectRef::reply(loop_id, post_id, reply_id);
    let intended = parse_value(request.value)?;
    let outcome = deps
        .vote_service
        .cast_vote(&subject, &request.voter_id, intended)
        .await?;
    Ok(Json(outcome.into()))
}

#[derive(Deserialize)]
pub struct ThreadQuery {
    #[serde(default)]
    pub caller_id: String,
}

pub async fn get_thread(
    State(deps): State<Arc<Dependencies>>,
    Path((loop_id, post_id)): Path<(String, String)>,
    Query(query): Query<ThreadQuery>,
) -> Result<Json<Vec<ThreadItem>>, AppError> {
    let items = deps
        .assembler
        .assemble(&loop_id, &post_id, &query.caller_id)
        .await?;
    Ok(Json(items))
}

#[derive(Deserialize)]
pub struct TrendingQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    25
}

pub async fn trending(
    State(deps): State<Arc<Dependencies>>,
    Path(loop_id): Path<String>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<Vec<Post>>, AppError> {
    // Postgres rejects negative LIMIT values, so clamp here rather than in
    // each backend.
    let limit = query.limit.max(0);
    let posts = deps.subjects.trending_posts(&loop_id, limit).await?;
    Ok(Json(posts))
}

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub loop_name: String,
    pub content: String,
    pub poster_id: String,
    #[serde(default)]
    pub anon: bool,
}

pub async fn create_post(
    State(deps): State<Arc<Dependencies>>,
    Path(loop_id): Path<String>,
    Json(request): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let post = deps
        .subjects
        .create_post(NewPost {
            loop_id,
            loop_name: request.loop_name,
            content: request.content,
            poster_id: request.poster_id,
            anon: request.anon,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[derive(Deserialize)]
pub struct CreateReplyRequest {
    pub replier_id: String,
    pub content: String,
    #[serde(default)]
    pub anon: bool,
    #[serde(default)]
    pub parent_id: Option<String>,
}

pub async fn create_reply(
    State(deps): State<Arc<Dependencies>>,
    Path((loop_id, post_id)): Path<(String, String)>,
    Json(request): Json<CreateReplyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reply = deps
        .subjects
        .create_reply(NewReply {
            loop_id,
            post_id,
            replier_id: request.replier_id,
            content: request.content,
            anon: request.anon,
            parent_id: request.parent_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

#[derive(Serialize)]
pub struct RecountResponse {
    pub upvotes: i64,
    pub downvotes: i64,
}

pub async fn recount_post(
    State(deps): State<Arc<Dependencies>>,
    Path((loop_id, post_id)): Path<(String, String)>,
) -> Result<Json<RecountResponse>, AppError> {
    let subject = SubjectRef::post(loop_id, post_id);
    let totals = deps.reconciler.recount(&subject).await?;
    Ok(Json(RecountResponse {
        upvotes: totals.upvotes,
        downvotes: totals.downvotes,
    }))
}

pub async fn recount_reply(
    State(deps): State<Arc<Dependencies>>,
    Path((loop_id, post_id, reply_id)): Path<(String, String, String)>,
) -> Result<Json<RecountResponse>, AppError> {
    let subject = SubjectRef::reply(loop_id, post_id, reply_id);
    let totals = deps.reconciler.recount(&subject).await?;
    Ok(Json(RecountResponse {
        upvotes: totals.upvotes,
        downvotes: totals.downvotes,
    }))
}

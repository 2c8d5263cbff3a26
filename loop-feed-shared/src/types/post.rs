use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{LoopId, PostId, UserId, VoteTotals};

/// Represents a content post inside a loop.
///
/// Carries its own denormalized vote counters and the derived trending
/// `score`. The score is recomputed on every vote event for the post, not on
/// a periodic sweep, so it is only as fresh as the last vote.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub loop_id: LoopId,
    pub loop_name: String,
    pub content: String,
    pub poster_id: UserId,
    pub anon: bool,
    #[serde(flatten)]
    pub totals: VoteTotals,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a post. Counters and score always start at zero.
#[derive(Clone, Debug, Deserialize)]
pub struct NewPost {
    pub loop_id: LoopId,
    pub loop_name: String,
    pub content: String,
    pub poster_id: UserId,
    #[serde(default)]
    pub anon: bool,
}

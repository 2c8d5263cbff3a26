use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{LoopId, PostId, ReplyId, UserId, VoteTotals};

/// Represents a threaded comment on a post.
///
/// `parent_id` of `None` means a top-level reply. A non-null `parent_id`
/// must name another reply on the same post; a dangling or foreign parent is
/// tolerated at read time by demoting the reply to a root. Replies carry
/// vote counters but no trending score (replies are not ranked).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Reply {
    pub id: ReplyId,
    pub loop_id: LoopId,
    pub post_id: PostId,
    pub replier_id: UserId,
    pub content: String,
    pub anon: bool,
    pub parent_id: Option<ReplyId>,
    #[serde(flatten)]
    pub totals: VoteTotals,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a reply. Counters always start at zero.
#[derive(Clone, Debug, Deserialize)]
pub struct NewReply {
    pub loop_id: LoopId,
    pub post_id: PostId,
    pub replier_id: UserId,
    pub content: String,
    #[serde(default)]
    pub anon: bool,
    #[serde(default)]
    pub parent_id: Option<ReplyId>,
}

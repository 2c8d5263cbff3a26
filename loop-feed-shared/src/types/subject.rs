use serde::{Deserialize, Serialize};

use crate::types::{LoopId, PostId, ReplyId, SubjectId};

/// Distinguishes the two votable subject kinds.
///
/// Reply votes skip the score recompute and the author aura update, so every
/// vote operation needs to know which kind it is acting on.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Post,
    Reply,
}

/// Fully-qualified reference to a votable subject.
///
/// The backing document store keys posts at `loops/{loop}/posts/{post}`
/// and replies at `loops/{loop}/posts/{post}/replies/{reply}`; a reference
/// carries every component of that path.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SubjectRef {
    Post {
        loop_id: LoopId,
        post_id: PostId,
    },
    Reply {
        loop_id: LoopId,
        post_id: PostId,
        reply_id: ReplyId,
    },
}

impl SubjectRef {
    pub fn post(loop_id: impl Into<LoopId>, post_id: impl Into<PostId>) -> Self {
        SubjectRef::Post {
            loop_id: loop_id.into(),
            post_id: post_id.into(),
        }
    }

    pub fn reply(
        loop_id: impl Into<LoopId>,
        post_id: impl Into<PostId>,
        reply_id: impl Into<ReplyId>,
    ) -> Self {
        SubjectRef::Reply {
            loop_id: loop_id.into(),
            post_id: post_id.into(),
            reply_id: reply_id.into(),
        }
    }

    pub fn kind(&self) -> SubjectKind {
        match self {
            SubjectRef::Post { .. } => SubjectKind::Post,
            SubjectRef::Reply { .. } => SubjectKind::Reply,
        }
    }

    pub fn loop_id(&self) -> &str {
        match self {
            SubjectRef::Post { loop_id, .. } | SubjectRef::Reply { loop_id, .. } => loop_id,
        }
    }

    /// Id of the post this subject belongs to (the post itself, or the
    /// parent post of a reply).
    pub fn post_id(&self) -> &str {
        match self {
            SubjectRef::Post { post_id, .. } | SubjectRef::Reply { post_id, .. } => post_id,
        }
    }

    /// Id of the subject document itself.
    pub fn subject_id(&self) -> &SubjectId {
        match self {
            SubjectRef::Post { post_id, .. } => post_id,
            SubjectRef::Reply { reply_id, .. } => reply_id,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{SubjectId, SubjectKind, UserId, VoteValue};

/// Represents a voter's current stance on one subject.
///
/// This is the ledger entry: the single source of truth for "did this voter
/// upvote or downvote this subject". At most one record exists per
/// (subject, voter) pair; retracting to neutral deletes the record rather
/// than storing a zero.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteRecord {
    pub subject_id: SubjectId,
    pub subject_kind: SubjectKind,
    pub voter_id: UserId,
    pub value: VoteValue,
    pub voted_at: DateTime<Utc>,
}

use serde::{Deserialize, Serialize};

/// Represents the aggregated vote counters of a subject.
///
/// These are the denormalized totals cached on each post and reply so reads
/// never scan the ledger. They are eventually consistent with the ledger;
/// the vote service mutates them only through atomic increments.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteTotals {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteTotals {
    /// Net vote count, the numerator of the trending score.
    pub fn net(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

use serde::{Deserialize, Serialize};

/// Represents the value of a stored vote.
///
/// A voter's neutral stance is encoded by the *absence* of a vote record,
/// never by a stored zero, so neutral has no variant here. Code that needs
/// the three-way stance works with `Option<VoteValue>`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    /// An upvote or positive endorsement.
    Up,
    /// A downvote or negative endorsement.
    Down,
}

impl VoteValue {
    /// Numeric value of the vote: +1 for `Up`, -1 for `Down`.
    pub fn signum(self) -> i64 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }

    /// Parses a wire-level vote value.
    ///
    /// `1` is an upvote, `-1` a downvote and `0` the neutral stance
    /// (retraction). Anything else is rejected.
    pub fn from_signum(value: i64) -> Result<Option<VoteValue>, i64> {
        match value {
            1 => Ok(Some(VoteValue::Up)),
            -1 => Ok(Some(VoteValue::Down)),
            0 => Ok(None),
            other => Err(other),
        }
    }
}

/// Numeric value of a stance, with neutral (`None`) mapping to 0.
pub fn signum(stance: Option<VoteValue>) -> i64 {
    stance.map_or(0, VoteValue::signum)
}

/// Represents the change a single vote transition applies to a subject's
/// aggregate counters.
///
/// Deltas are applied to the store as atomic increments, never as
/// read-modify-write, so concurrent voters on the same subject commute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoteDelta {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteDelta {
    /// Returns true when the transition leaves both counters untouched.
    pub fn is_zero(&self) -> bool {
        self.upvotes == 0 && self.downvotes == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signum_maps_stances() {
        assert_eq!(signum(Some(VoteValue::Up)), 1);
        assert_eq!(signum(Some(VoteValue::Down)), -1);
        assert_eq!(signum(None), 0);
    }

    #[test]
    fn from_signum_accepts_wire_values() {
        assert_eq!(VoteValue::from_signum(1), Ok(Some(VoteValue::Up)));
        assert_eq!(VoteValue::from_signum(-1), Ok(Some(VoteValue::Down)));
        assert_eq!(VoteValue::from_signum(0), Ok(None));
        assert_eq!(VoteValue::from_signum(2), Err(2));
        assert_eq!(VoteValue::from_signum(-7), Err(-7));
    }
}

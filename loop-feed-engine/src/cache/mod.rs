//! Optimistic vote-state cache for a single viewer session.
//!
//! The UI flips its vote indicators before the server call resolves. This
//! is that local map made explicit: a write-through cache of
//! subject → stance with three defined invalidation points — confirmation
//! keeps the optimistic value, failure rolls it back to the snapshot taken
//! at application time, and a full reassembly replaces the whole map.
//!
//! One instance belongs to one viewer, so the methods take `&mut self`;
//! there is no cross-caller sharing to synchronize.
use std::collections::HashMap;

use loop_feed_shared::types::{SubjectId, VoteValue};

use crate::thread::ThreadItem;

/// Snapshot handed back by [`VoteStateCache::apply`], fed to
/// [`VoteStateCache::rollback`] when the server call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingVote {
    previous: Option<VoteValue>,
}

/// Per-viewer optimistic map of subject → current stance.
#[derive(Debug, Default)]
pub struct VoteStateCache {
    stances: HashMap<SubjectId, Option<VoteValue>>,
}

impl VoteStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The viewer's cached stance on a subject; absent entries are neutral.
    pub fn stance(&self, subject_id: &str) -> Option<VoteValue> {
        self.stances.get(subject_id).copied().flatten()
    }

    /// The toggle rule the vote buttons implement: tapping the stance you
    /// already hold retracts it, anything else switches to it.
    pub fn toggled(&self, subject_id: &str, tapped: VoteValue) -> Option<VoteValue> {
        if self.stance(subject_id) == Some(tapped) {
            None
        } else {
            Some(tapped)
        }
    }

    /// Applies an optimistic stance and returns the snapshot needed to
    /// undo it.
    pub fn apply(&mut self, subject_id: &str, intended: Option<VoteValue>) -> PendingVote {
        let previous = self.stance(subject_id);
        self.stances.insert(subject_id.to_string(), intended);
        PendingVote { previous }
    }

    /// Confirms the optimistic value after the server accepted the vote.
    /// The cache already holds it, so this is a named no-op kept for the
    /// symmetry of the call sites.
    pub fn confirm(&mut self, _subject_id: &str) {}

    /// Restores the stance captured before an optimistic update whose
    /// server call failed.
    pub fn rollback(&mut self, subject_id: &str, pending: PendingVote) {
        self.stances.insert(subject_id.to_string(), pending.previous);
    }

    /// Replaces the whole map from a freshly assembled thread.
    pub fn reset_from_thread(&mut self, items: &[ThreadItem]) {
        self.stances.clear();
        for item in items {
            let subject_id = match &item.node {
                crate::thread::ThreadNode::Post(post) => post.id.clone(),
                crate::thread::ThreadNode::Reply(reply) => reply.id.clone(),
            };
            self.stances.insert(subject_id, item.caller_vote);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_retracts_a_held_stance_and_switches_otherwise() {
        let mut cache = VoteStateCache::new();
        assert_eq!(cache.toggled("p1", VoteValue::Up), Some(VoteValue::Up));

        cache.apply("p1", Some(VoteValue::Up));
        assert_eq!(cache.toggled("p1", VoteValue::Up), None);
        assert_eq!(cache.toggled("p1", VoteValue::Down), Some(VoteValue::Down));
    }

    #[test]
    fn rollback_restores_the_pre_optimistic_stance() {
        let mut cache = VoteStateCache::new();
        cache.apply("p1", Some(VoteValue::Down));

        let pending = cache.apply("p1", Some(VoteValue::Up));
        assert_eq!(cache.stance("p1"), Some(VoteValue::Up));

        cache.rollback("p1", pending);
        assert_eq!(cache.stance("p1"), Some(VoteValue::Down));
    }

    #[test]
    fn rollback_to_neutral_clears_the_stance() {
        let mut cache = VoteStateCache::new();
        let pending = cache.apply("p1", Some(VoteValue::Up));
        cache.rollback("p1", pending);
        assert_eq!(cache.stance("p1"), None);
    }

    #[test]
    fn reset_replaces_the_map_with_the_assembled_thread() {
        use crate::thread::{ThreadItem, ThreadNode};
        use chrono::Utc;
        use loop_feed_shared::types::{Reply, VoteTotals};

        let mut cache = VoteStateCache::new();
        cache.apply("stale", Some(VoteValue::Up));

        let reply = Reply {
            id: "r1".to_string(),
            loop_id: "cs".to_string(),
            post_id: "p1".to_string(),
            replier_id: "bob".to_string(),
            content: "reply".to_string(),
            anon: false,
            parent_id: None,
            totals: VoteTotals::default(),
            created_at: Utc::now(),
        };
        let items = vec![ThreadItem {
            depth: 0,
            caller_vote: Some(VoteValue::Down),
            author_name: "bob".to_string(),
            node: ThreadNode::Reply(reply),
        }];

        cache.reset_from_thread(&items);
        assert_eq!(cache.stance("r1"), Some(VoteValue::Down));
        assert_eq!(cache.stance("stale"), None);
    }
}

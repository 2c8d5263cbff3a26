//! The thread assembler: rebuilds a display-ready, depth-ordered sequence
//! from a post and its flat reply collection.
//!
//! The read path takes no locks and tolerates read skew between the ledger
//! and the counters; re-running the assembly from scratch is always safe,
//! and a refresh after a mutation is how callers reconcile. Dangling parent
//! references never fail the assembly: the reply is demoted to a root.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use loop_feed_shared::types::{Post, Reply, UserId, VoteValue};
use loop_feed_repository::interfaces::{SubjectRepository, UserRepository, VoteRepository};
use serde::Serialize;
use tracing::debug;

use crate::errors::ThreadError;

/// One entry of the flattened thread: the post first, then every reply in
/// depth-first order, each node before its children and siblings in
/// creation order.
#[derive(Debug, Serialize)]
pub struct ThreadItem {
    /// Indentation depth. The post and top-level replies sit at 0; each
    /// nesting level below a reply adds one.
    pub depth: usize,
    /// The caller's current stance on this node; `None` is neutral.
    pub caller_vote: Option<VoteValue>,
    /// Display name of the node's author (raw id when lookup fails).
    pub author_name: String,
    #[serde(flatten)]
    pub node: ThreadNode,
}

/// The post or reply carried by a thread item.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ThreadNode {
    Post(Post),
    Reply(Reply),
}

/// Assembles threads from the flat storage model.
pub struct ThreadAssembler {
    subjects: Arc<dyn SubjectRepository>,
    votes: Arc<dyn VoteRepository>,
    users: Arc<dyn UserRepository>,
}

impl ThreadAssembler {
    pub fn new(
        subjects: Arc<dyn SubjectRepository>,
        votes: Arc<dyn VoteRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            subjects,
            votes,
            users,
        }
    }

    /// Loads the post and its replies and returns the flattened, annotated
    /// thread for `caller_id`.
    ///
    /// A post with zero replies yields a one-element sequence. A missing
    /// post is terminal (`PostNotFound`).
    pub async fn assemble(
        &self,
        loop_id: &str,
        post_id: &str,
        caller_id: &str,
    ) -> Result<Vec<ThreadItem>, ThreadError> {
        let post = self
            .subjects
            .get_post(loop_id, post_id)
            .await?
            .ok_or_else(|| ThreadError::PostNotFound(post_id.to_string()))?;

        let replies = self.subjects.list_replies(loop_id, post_id).await?;
        let stances = self
            .votes
            .votes_by_voter_on_post(loop_id, post_id, caller_id)
            .await?;

        let mut names = NameCache::new(self.users.clone());
        let mut items = Vec::with_capacity(replies.len() + 1);

        let post_author = names.resolve(&post.poster_id).await;
        items.push(ThreadItem {
            depth: 0,
            caller_vote: stances.get(&post.id).copied(),
            author_name: post_author,
            node: ThreadNode::Post(post),
        });

        for (reply, depth) in flatten_replies(&replies) {
            let author_name = names.resolve(&reply.replier_id).await;
            items.push(ThreadItem {
                depth,
                caller_vote: stances.get(&reply.id).copied(),
                author_name,
                node: ThreadNode::Reply(reply.clone()),
            });
        }

        Ok(items)
    }
}

/// Builds the reply forest and flattens it depth-first.
///
/// Replies whose `parent_id` is null or names a nonexistent parent become
/// roots. Cycles cannot be reached from any root, so after the root walk
/// the earliest-created unvisited reply is demoted to a root and the walk
/// repeats until every reply is emitted exactly once.
fn flatten_replies(replies: &[Reply]) -> Vec<(&Reply, usize)> {
    let index: HashMap<&str, usize> = replies
        .iter()
        .enumerate()
        .map(|(position, reply)| (reply.id.as_str(), position))
        .collect();

    // children lists keep the input (creation) order
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); replies.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (position, reply) in replies.iter().enumerate() {
        match reply
            .parent_id
            .as_deref()
            .and_then(|parent| index.get(parent))
        {
            Some(&parent_position) if parent_position != position => {
                children[parent_position].push(position);
            }
            // self-parenting counts as dangling
            _ => roots.push(position),
        }
    }

    let mut ordered = Vec::with_capacity(replies.len());
    let mut visited: HashSet<usize> = HashSet::with_capacity(replies.len());
    let mut stack: Vec<(usize, usize)> = Vec::new();

    let mut seeds = roots;
    loop {
        for &root in &seeds {
            if visited.contains(&root) {
                continue;
            }
            stack.push((root, 0));
            while let Some((position, depth)) = stack.pop() {
                if !visited.insert(position) {
                    continue;
                }
                ordered.push((&replies[position], depth));
                // reverse so the earliest child is popped first
                for &child in children[position].iter().rev() {
                    if !visited.contains(&child) {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }

        // Anything left is part of a parent cycle; break it at the
        // earliest-created node and keep walking.
        match (0..replies.len()).find(|position| !visited.contains(position)) {
            Some(cycle_entry) => seeds = vec![cycle_entry],
            None => break,
        }
    }

    ordered
}

/// Resolves author display names at most once per unique id within one
/// assembly pass. Lookup failure is non-fatal and falls back to the raw id.
struct NameCache {
    users: Arc<dyn UserRepository>,
    resolved: HashMap<UserId, String>,
}

impl NameCache {
    fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            resolved: HashMap::new(),
        }
    }

    async fn resolve(&mut self, user_id: &str) -> String {
        if let Some(name) = self.resolved.get(user_id) {
            return name.clone();
        }
        let name = match self.users.get_profile(user_id).await {
            Ok(Some(profile)) => profile.visible_name().to_string(),
            Ok(None) => user_id.to_string(),
            Err(error) => {
                debug!(%user_id, %error, "author lookup failed, falling back to raw id");
                user_id.to_string()
            }
        };
        self.resolved.insert(user_id.to_string(), name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use loop_feed_repository::MemoryRepository;
    use loop_feed_shared::types::{UserProfile, VoteTotals};

    fn make_reply(id: &str, parent: Option<&str>, minute: i64) -> Reply {
        Reply {
            id: id.to_string(),
            loop_id: "cs".to_string(),
            post_id: "p1".to_string(),
            replier_id: format!("user-{id}"),
            content: format!("reply {id}"),
            anon: false,
            parent_id: parent.map(str::to_string),
            totals: VoteTotals::default(),
            created_at: Utc::now() + Duration::minutes(minute),
        }
    }

    fn make_post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            loop_id: "cs".to_string(),
            loop_name: "#cs".to_string(),
            content: "post".to_string(),
            poster_id: "author".to_string(),
            anon: false,
            totals: VoteTotals::default(),
            score: 0.0,
            created_at: Utc::now(),
        }
    }

    fn ids(flat: &[(&Reply, usize)]) -> Vec<(String, usize)> {
        flat.iter()
            .map(|(reply, depth)| (reply.id.clone(), *depth))
            .collect()
    }

    #[test]
    fn ghost_parent_demotes_reply_to_root() {
        // [{A, parent: null}, {B, parent: A}, {C, parent: "ghost"}]
        let replies = vec![
            make_reply("A", None, 0),
            make_reply("B", Some("A"), 1),
            make_reply("C", Some("ghost"), 2),
        ];
        let flat = flatten_replies(&replies);
        assert_eq!(
            ids(&flat),
            [
                ("A".to_string(), 0),
                ("B".to_string(), 1),
                ("C".to_string(), 0),
            ]
        );
    }

    #[test]
    fn siblings_keep_creation_order() {
        let replies = vec![
            make_reply("A", None, 0),
            make_reply("B", Some("A"), 1),
            make_reply("C", Some("A"), 2),
            make_reply("D", Some("B"), 3),
        ];
        let flat = flatten_replies(&replies);
        assert_eq!(
            ids(&flat),
            [
                ("A".to_string(), 0),
                ("B".to_string(), 1),
                ("D".to_string(), 2),
                ("C".to_string(), 1),
            ]
        );
    }

    #[test]
    fn self_parent_becomes_root() {
        let replies = vec![make_reply("A", Some("A"), 0)];
        let flat = flatten_replies(&replies);
        assert_eq!(ids(&flat), [("A".to_string(), 0)]);
    }

    #[test]
    fn parent_cycle_emits_every_node_once() {
        // A -> B -> A plus a child hanging off the cycle
        let replies = vec![
            make_reply("A", Some("B"), 0),
            make_reply("B", Some("A"), 1),
            make_reply("C", Some("B"), 2),
        ];
        let flat = flatten_replies(&replies);
        let emitted: Vec<String> = flat.iter().map(|(r, _)| r.id.clone()).collect();
        assert_eq!(flat.len(), 3, "every node exactly once");
        // the cycle breaks at the earliest-created node
        assert_eq!(emitted[0], "A");
        let unique: HashSet<&String> = emitted.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn empty_reply_list_flattens_to_nothing() {
        let flat = flatten_replies(&[]);
        assert!(flat.is_empty());
    }

    #[tokio::test]
    async fn assembles_post_replies_votes_and_names() {
        let repo = Arc::new(MemoryRepository::new());
        repo.seed_post(make_post("p1")).await;
        repo.seed_user(UserProfile {
            id: "author".to_string(),
            display_name: Some("Avery".to_string()),
            username: None,
            aura_total: 0,
        })
        .await;
        repo.seed_user(UserProfile {
            id: "user-A".to_string(),
            display_name: None,
            username: Some("a_handle".to_string()),
            aura_total: 0,
        })
        .await;
        repo.seed_reply(make_reply("A", None, 0)).await;
        repo.seed_reply(make_reply("B", Some("A"), 1)).await;

        let post_subject = loop_feed_shared::types::SubjectRef::post("cs", "p1");
        repo.upsert_vote(&post_subject, "caller", VoteValue::Up, Utc::now())
            .await
            .unwrap();
        let reply_subject = loop_feed_shared::types::SubjectRef::reply("cs", "p1", "B");
        repo.upsert_vote(&reply_subject, "caller", VoteValue::Down, Utc::now())
            .await
            .unwrap();

        let assembler = ThreadAssembler::new(repo.clone(), repo.clone(), repo.clone());
        let items = assembler.assemble("cs", "p1", "caller").await.unwrap();

        assert_eq!(items.len(), 3);
        assert!(matches!(items[0].node, ThreadNode::Post(_)));
        assert_eq!(items[0].caller_vote, Some(VoteValue::Up));
        assert_eq!(items[0].author_name, "Avery");

        assert!(matches!(&items[1].node, ThreadNode::Reply(r) if r.id == "A"));
        assert_eq!(items[1].caller_vote, None);
        assert_eq!(items[1].author_name, "a_handle");

        assert!(matches!(&items[2].node, ThreadNode::Reply(r) if r.id == "B"));
        assert_eq!(items[2].caller_vote, Some(VoteValue::Down));
        // no user record for user-B: raw id fallback
        assert_eq!(items[2].author_name, "user-B");
        assert_eq!(items[2].depth, 1);
    }

    #[tokio::test]
    async fn post_without_replies_yields_one_item() {
        let repo = Arc::new(MemoryRepository::new());
        repo.seed_post(make_post("p1")).await;

        let assembler = ThreadAssembler::new(repo.clone(), repo.clone(), repo.clone());
        let items = assembler.assemble("cs", "p1", "caller").await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn missing_post_is_terminal() {
        let repo = Arc::new(MemoryRepository::new());
        let assembler = ThreadAssembler::new(repo.clone(), repo.clone(), repo.clone());
        let result = assembler.assemble("cs", "ghost", "caller").await;
        assert!(matches!(result, Err(ThreadError::PostNotFound(id)) if id == "ghost"));
    }
}

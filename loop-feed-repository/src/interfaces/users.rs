//! This module defines the `UserRepository` trait, the interface to the user
//! records the feed core touches: display names for thread rendering and the
//! aura reputation counter.
use loop_feed_shared::types::UserProfile;

use crate::errors::UserRepositoryError;

/// A trait that defines the interface for user profile reads and aura
/// updates.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetches a user's profile. `None` when the user record is missing.
    async fn get_profile(&self, user_id: &str)
    -> Result<Option<UserProfile>, UserRepositoryError>;

    /// Applies a delta to the user's running aura total as an atomic
    /// increment. A missing user record is a no-op rather than an error:
    /// votes on posts by deleted authors must not fail the vote.
    async fn adjust_aura(&self, user_id: &str, delta: i64) -> Result<(), UserRepositoryError>;
}

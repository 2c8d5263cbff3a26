use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Represents the profile fields the feed core reads from a user record.
///
/// `aura_total` is the running reputation counter driven by net votes on the
/// user's posts. It accumulates across all of their posts and is mutated
/// only through atomic increments.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub aura_total: i64,
}

impl UserProfile {
    /// Name shown next to the user's content: display name first, then
    /// username, then the raw id as the last resort.
    pub fn visible_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or(&self.id)
    }
}

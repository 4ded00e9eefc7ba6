//! Ban Gate: runs before classification so a banned subject never reaches the counters.

use std::sync::Arc;

use stats_core::Chat;
use storage::StatsStore;
use tracing::debug;

use crate::error::Result;

/// Result of checking a sender and chat against the ban list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    UserBanned,
    GroupBanned,
}

#[derive(Clone)]
pub struct BanGate {
    store: Arc<dyn StatsStore>,
}

impl BanGate {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        Self { store }
    }

    /// True when `subject_id` (user or group) has a ban entry, or is a user whose profile carries
    /// the ban flag.
    pub async fn is_banned(&self, subject_id: i64) -> Result<bool> {
        if self.store.get_ban(subject_id).await?.is_some() {
            return Ok(true);
        }
        let flagged = self
            .store
            .get_user_profile(subject_id)
            .await?
            .map(|p| p.is_banned)
            .unwrap_or(false);
        Ok(flagged)
    }

    /// Checks the group first (private chats have none), then the sender.
    pub async fn check(&self, user_id: i64, chat: &Chat) -> Result<Verdict> {
        if !chat.is_private() && self.store.get_ban(chat.id).await?.is_some() {
            debug!(chat_id = chat.id, "Event from banned group");
            return Ok(Verdict::GroupBanned);
        }
        if self.is_banned(user_id).await? {
            debug!(user_id, chat_id = chat.id, "Event from banned user");
            return Ok(Verdict::UserBanned);
        }
        Ok(Verdict::Allowed)
    }
}

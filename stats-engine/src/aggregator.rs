//! Aggregation Engine: the only writer of counters.
//!
//! Each event is written as a profile upsert, then (for group chats) a per-group upsert, a group
//! upsert and a re-scan of the group's user counts. Every increment is a single atomic statement
//! in the store; there is no in-process locking.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use stats_core::{Chat, Message, User};
use storage::{BanEntry, GroupInfo, GroupStatIdentity, ProfileUpdate, StatDelta, StatsStore};
use tracing::{debug, info, instrument};

use crate::ban_gate::{BanGate, Verdict};
use crate::classifier::{classify, ClassifiedEvent};
use crate::error::Result;

pub const DEFAULT_ACTIVE_WINDOW_DAYS: i64 = 30;

/// What happened to an incoming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Recorded,
    /// Not text, sticker or media.
    Ignored,
    UserBanned,
    GroupBanned,
}

impl From<Verdict> for Outcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Allowed => Outcome::Recorded,
            Verdict::UserBanned => Outcome::UserBanned,
            Verdict::GroupBanned => Outcome::GroupBanned,
        }
    }
}

#[derive(Clone)]
pub struct Aggregator {
    store: Arc<dyn StatsStore>,
    gate: BanGate,
    active_window: Duration,
}

impl Aggregator {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        Self {
            gate: BanGate::new(Arc::clone(&store)),
            store,
            active_window: Duration::days(DEFAULT_ACTIVE_WINDOW_DAYS),
        }
    }

    /// Users whose profile changed within `days` count towards a group's `user_active`.
    pub fn with_active_window(mut self, days: i64) -> Self {
        self.active_window = Duration::try_days(days.max(0)).unwrap_or(Duration::MAX);
        self
    }

    pub fn gate(&self) -> &BanGate {
        &self.gate
    }

    /// Ban Gate, then classifier, then counters.
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn record_message(&self, message: &Message) -> Result<Outcome> {
        let verdict = self.gate.check(message.user.id, &message.chat).await?;
        if verdict != Verdict::Allowed {
            return Ok(verdict.into());
        }

        let Some(event) = classify(message) else {
            debug!("Ignoring uninteresting message");
            return Ok(Outcome::Ignored);
        };

        self.write_event(&message.user, &message.chat, &event).await?;
        Ok(Outcome::Recorded)
    }

    /// Applies an already classified event. A no-op when either party is banned.
    pub async fn apply_event(
        &self,
        user: &User,
        chat: &Chat,
        event: &ClassifiedEvent,
    ) -> Result<Outcome> {
        let verdict = self.gate.check(user.id, chat).await?;
        if verdict != Verdict::Allowed {
            return Ok(verdict.into());
        }
        self.write_event(user, chat, event).await?;
        Ok(Outcome::Recorded)
    }

    /// Counts one edit. Message, word, sticker and media counters are left alone.
    #[instrument(skip(self, user, chat), fields(user_id = user.id, chat_id = chat.id))]
    pub async fn apply_edit(&self, user: &User, chat: &Chat) -> Result<Outcome> {
        self.apply_signal(user, chat, StatDelta::edit()).await
    }

    /// Counts one deletion. Never decrements the message counters.
    #[instrument(skip(self, user, chat), fields(user_id = user.id, chat_id = chat.id))]
    pub async fn apply_delete(&self, user: &User, chat: &Chat) -> Result<Outcome> {
        self.apply_signal(user, chat, StatDelta::delete()).await
    }

    async fn apply_signal(&self, user: &User, chat: &Chat, delta: StatDelta) -> Result<Outcome> {
        let verdict = self.gate.check(user.id, chat).await?;
        if verdict != Verdict::Allowed {
            return Ok(verdict.into());
        }
        self.write(user, chat, None, delta).await?;
        Ok(Outcome::Recorded)
    }

    async fn write_event(&self, user: &User, chat: &Chat, event: &ClassifiedEvent) -> Result<()> {
        self.write(user, chat, Some(event.activity), event.delta()).await
    }

    async fn write(
        &self,
        user: &User,
        chat: &Chat,
        activity: Option<&str>,
        delta: StatDelta,
    ) -> Result<()> {
        let profile = ProfileUpdate {
            user_id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            last_activity: activity.map(str::to_string),
        };
        self.store.upsert_user_profile(&profile, &delta).await?;

        if chat.is_private() {
            return Ok(());
        }

        let identity = GroupStatIdentity {
            user_id: user.id,
            group_id: chat.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            group_title: chat.title.clone(),
            group_username: chat.username.clone(),
        };
        self.store.upsert_user_group_stat(&identity, &delta).await?;

        let info = GroupInfo {
            group_id: chat.id,
            chat_type: chat.kind.as_str().to_string(),
            title: chat.title.clone(),
            username: chat.username.clone(),
        };
        self.store.upsert_group(&info, &delta).await?;
        let active_since = Utc::now()
            .checked_sub_signed(self.active_window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.store
            .refresh_group_user_counts(chat.id, active_since)
            .await?;

        debug!(user_id = user.id, group_id = chat.id, ?delta, "Counters updated");
        Ok(())
    }

    // --- moderation ---

    pub async fn ban_user(&self, user_id: i64, reason: Option<String>) -> Result<()> {
        self.store.set_user_banned(user_id, true).await?;
        self.store.add_ban(&BanEntry::user(user_id, reason)).await?;
        info!(user_id, "User banned");
        Ok(())
    }

    /// Returns whether the user was banned before.
    pub async fn unban_user(&self, user_id: i64) -> Result<bool> {
        let flagged = match self.store.get_user_profile(user_id).await? {
            Some(profile) if profile.is_banned => {
                self.store.set_user_banned(user_id, false).await?;
                true
            }
            _ => false,
        };
        let listed = self.store.remove_ban(user_id).await?;
        info!(user_id, "User unbanned");
        Ok(flagged || listed)
    }

    pub async fn ban_group(&self, group_id: i64, reason: Option<String>) -> Result<()> {
        self.store.add_ban(&BanEntry::group(group_id, reason)).await?;
        info!(group_id, "Group banned");
        Ok(())
    }

    /// Returns whether the group was banned before.
    pub async fn unban_group(&self, group_id: i64) -> Result<bool> {
        let removed = self.store.remove_ban(group_id).await?;
        info!(group_id, "Group unbanned");
        Ok(removed)
    }
}

//! Feeds every update into the Aggregation Engine before any command runs.

use std::sync::Arc;

use async_trait::async_trait;
use stats_core::{Bot, Handler, Message, MessageKind, Result};
use stats_engine::{Aggregator, Outcome};
use tracing::{debug, error, info, instrument};

use super::store_error;

pub const BANNED_NOTICE: &str =
    "❌ You have been removed from this group because your account has been banned.";

/// Counts new messages and edits in before().
///
/// Returns `false` (stopping the chain) for edits, which never trigger commands, and for
/// senders or groups the Ban Gate rejects. A banned user writing in a group is removed once,
/// best effort: a failed removal is logged and not retried.
pub struct StatsTracker {
    aggregator: Aggregator,
    bot: Arc<dyn Bot>,
}

impl StatsTracker {
    pub fn new(aggregator: Aggregator, bot: Arc<dyn Bot>) -> Self {
        Self { aggregator, bot }
    }

    async fn remove_banned_user(&self, message: &Message) {
        let user_id = message.user.id;
        let chat_id = message.chat.id;
        if message.chat.is_private() {
            return;
        }
        if let Err(e) = self.bot.ban_chat_member(&message.chat, user_id).await {
            error!(error = %e, user_id, chat_id, "Failed to kick banned user");
            return;
        }
        info!(user_id, chat_id, "Kicked banned user");
        if let Err(e) = self.bot.reply_to(message, BANNED_NOTICE).await {
            error!(error = %e, user_id, chat_id, "Failed to send ban notice");
        }
    }
}

#[async_trait]
impl Handler for StatsTracker {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn before(&self, message: &Message) -> Result<bool> {
        if message.kind == MessageKind::Edited {
            let outcome = self
                .aggregator
                .apply_edit(&message.user, &message.chat)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to record edit");
                    store_error(e)
                })?;
            debug!(?outcome, "Edit processed");
            return Ok(false);
        }

        let outcome = self.aggregator.record_message(message).await.map_err(|e| {
            error!(error = %e, "Failed to record message");
            store_error(e)
        })?;

        match outcome {
            Outcome::Recorded | Outcome::Ignored => Ok(true),
            Outcome::UserBanned => {
                self.remove_banned_user(message).await;
                Ok(false)
            }
            Outcome::GroupBanned => Ok(false),
        }
    }
}

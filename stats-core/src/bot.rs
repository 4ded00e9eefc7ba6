//! Bot abstraction for replying, editing and moderating.
//!
//! [`Bot`] is transport-agnostic; `stats-bot` implements it over teloxide and tests use a
//! recording mock.

use crate::error::{Result, StatsError};
use crate::types::{Chat, Message};
use async_trait::async_trait;

/// Outbound operations the command and tracker handlers need. Text is sent with HTML parse mode.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    /// Edits an already-sent message. `message_id` is transport-specific (Telegram numeric string).
    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()>;
    /// Sends a message and returns its id for a later `edit_message`.
    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String>;
    /// Sends a message with a single inline button that opens the Mini-App at `url`.
    async fn send_web_app_button(
        &self,
        chat: &Chat,
        text: &str,
        button_text: &str,
        url: &str,
    ) -> Result<()>;
    /// Removes `user_id` from the group and prevents them from rejoining.
    async fn ban_chat_member(&self, chat: &Chat, user_id: i64) -> Result<()>;
}

/// Parses a message id string into an i32. Used by edit_message.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| StatsError::Bot(format!("Invalid message_id for edit: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_id_valid() {
        assert_eq!(parse_message_id("123").unwrap(), 123);
        assert_eq!(parse_message_id("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_message_id_invalid() {
        assert!(parse_message_id("").is_err());
        assert!(parse_message_id("abc").is_err());
        assert!(parse_message_id("12.3").is_err());
    }
}

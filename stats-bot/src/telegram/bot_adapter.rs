//! Wraps teloxide::Bot and implements [`stats_core::Bot`]. Tests substitute a recording mock.

use async_trait::async_trait;
use stats_core::{parse_message_id, Bot as CoreBot, Chat, Message, Result, StatsError};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode, UserId, WebAppInfo,
};

/// Thin wrapper around teloxide::Bot. Every text goes out with HTML parse mode.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

fn bot_error(e: teloxide::RequestError) -> StatsError {
    StatsError::Bot(e.to_string())
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        let id = parse_message_id(message_id)?;
        self.bot
            .edit_message_text(ChatId(chat.id), MessageId(id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        let sent = self
            .bot
            .send_message(ChatId(chat.id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(bot_error)?;
        Ok(sent.id.0.to_string())
    }

    async fn send_web_app_button(
        &self,
        chat: &Chat,
        text: &str,
        button_text: &str,
        url: &str,
    ) -> Result<()> {
        let url = url::Url::parse(url)
            .map_err(|e| StatsError::Bot(format!("Invalid web app URL {}: {}", url, e)))?;
        let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::web_app(
            button_text,
            WebAppInfo { url },
        )]]);
        self.bot
            .send_message(ChatId(chat.id), text)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard)
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn ban_chat_member(&self, chat: &Chat, user_id: i64) -> Result<()> {
        self.bot
            .ban_chat_member(ChatId(chat.id), UserId(user_id as u64))
            .await
            .map_err(bot_error)?;
        Ok(())
    }
}

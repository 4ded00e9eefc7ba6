//! Mock implementation of [`stats_core::Bot`] for integration tests.
//!
//! Every outbound call is sent as a [`BotCall`] to a channel the test holds, so tests can assert
//! on replies, edits and kicks without hitting Telegram.

use async_trait::async_trait;
use stats_core::{Bot, Chat, Message, Result, StatsError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCall {
    Send { chat_id: i64, text: String },
    Reply { chat_id: i64, text: String },
    Edit { chat_id: i64, message_id: String, text: String },
    WebAppButton { chat_id: i64, text: String, button: String, url: String },
    Ban { chat_id: i64, user_id: i64 },
}

impl BotCall {
    pub fn text(&self) -> Option<&str> {
        match self {
            BotCall::Send { text, .. }
            | BotCall::Reply { text, .. }
            | BotCall::Edit { text, .. }
            | BotCall::WebAppButton { text, .. } => Some(text),
            BotCall::Ban { .. } => None,
        }
    }
}

pub struct MockBot {
    /// Fixed id returned by `send_message_and_return_id`.
    placeholder_id: String,
    calls: mpsc::UnboundedSender<BotCall>,
    /// When set, `ban_chat_member` fails like a bot without admin rights.
    fail_bans: AtomicBool,
}

impl MockBot {
    /// Creates a MockBot and returns the receiver for its calls. Placeholder id is `"1"`.
    pub fn with_receiver() -> (Arc<Self>, mpsc::UnboundedReceiver<BotCall>) {
        let (calls, rx) = mpsc::unbounded_channel();
        let bot = Arc::new(Self {
            placeholder_id: "1".to_string(),
            calls,
            fail_bans: AtomicBool::new(false),
        });
        (bot, rx)
    }

    pub fn fail_bans(&self) {
        self.fail_bans.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: BotCall) {
        let _ = self.calls.send(call);
    }
}

/// Everything recorded so far.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<BotCall>) -> Vec<BotCall> {
    let mut calls = Vec::new();
    while let Ok(call) = rx.try_recv() {
        calls.push(call);
    }
    calls
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.record(BotCall::Send {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.record(BotCall::Reply {
            chat_id: message.chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        self.record(BotCall::Edit {
            chat_id: chat.id,
            message_id: message_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        self.record(BotCall::Send {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(self.placeholder_id.clone())
    }

    async fn send_web_app_button(
        &self,
        chat: &Chat,
        text: &str,
        button_text: &str,
        url: &str,
    ) -> Result<()> {
        self.record(BotCall::WebAppButton {
            chat_id: chat.id,
            text: text.to_string(),
            button: button_text.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }

    async fn ban_chat_member(&self, chat: &Chat, user_id: i64) -> Result<()> {
        if self.fail_bans.load(Ordering::SeqCst) {
            return Err(StatsError::Bot("not enough rights to ban".to_string()));
        }
        self.record(BotCall::Ban {
            chat_id: chat.id,
            user_id,
        });
        Ok(())
    }
}

#![allow(dead_code)]

pub mod mock_bot;

use chrono::Utc;
use stats_bot::{build_handler_chain, BotConfig, HandlerChain, StatsServices};
use stats_core::{Attachment, Chat, ChatKind, Message, MessageKind, User};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use mock_bot::{BotCall, MockBot};

pub const GROUP_ID: i64 = -1001;
pub const BOT_USERNAME: &str = "group_stats_bot";

pub struct Harness {
    pub chain: HandlerChain,
    pub services: StatsServices,
    pub bot: Arc<MockBot>,
    pub calls: mpsc::UnboundedReceiver<BotCall>,
}

/// In-memory store, mock transport and the production chain.
pub async fn harness(webapp_url: Option<&str>) -> Harness {
    let store = storage::connect("sqlite::memory:").await.unwrap();
    let services = StatsServices::new(store, &BotConfig::default());
    let (bot, calls) = MockBot::with_receiver();
    let chain = build_handler_chain(
        bot.clone(),
        &services,
        webapp_url.map(str::to_string),
        Arc::new(RwLock::new(Some(BOT_USERNAME.to_string()))),
    );
    Harness {
        chain,
        services,
        bot,
        calls,
    }
}

pub fn user(id: i64, first_name: &str) -> User {
    User {
        id,
        username: None,
        first_name: first_name.to_string(),
        last_name: None,
    }
}

pub fn group() -> Chat {
    Chat {
        id: GROUP_ID,
        kind: ChatKind::Supergroup,
        title: Some("Rustaceans".to_string()),
        username: None,
    }
}

pub fn message(user: &User, chat: &Chat, content: &str, attachment: Option<Attachment>) -> Message {
    Message {
        id: "100".to_string(),
        user: user.clone(),
        chat: chat.clone(),
        content: content.to_string(),
        attachment,
        kind: MessageKind::New,
        created_at: Utc::now(),
    }
}

pub fn edited(user: &User, chat: &Chat, content: &str) -> Message {
    Message {
        kind: MessageKind::Edited,
        ..message(user, chat, content, None)
    }
}

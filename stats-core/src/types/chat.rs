//! Chat identity type for core messages.

use serde::{Deserialize, Serialize};

/// Kind of chat a message arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatKind::Private => "private",
            ChatKind::Group => "group",
            ChatKind::Supergroup => "supergroup",
            ChatKind::Channel => "channel",
        }
    }
}

/// Chat identity plus the cosmetic fields stored next to group counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub kind: ChatKind,
    pub title: Option<String>,
    pub username: Option<String>,
}

impl Chat {
    /// A one-to-one chat with the bot.
    pub fn private(id: i64) -> Self {
        Self {
            id,
            kind: ChatKind::Private,
            title: None,
            username: None,
        }
    }

    pub fn is_private(&self) -> bool {
        self.kind == ChatKind::Private
    }
}

//! Message types for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

/// Whether the update is a new message or an edit of an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    New,
    Edited,
}

/// Non-text payload carried by a message. At most one per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attachment {
    Sticker,
    Photo,
    Video,
    Document,
    Audio,
    Voice,
    VideoNote,
    /// Anything else (location, poll, contact, service message, ...).
    Other,
}

impl Attachment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attachment::Sticker => "sticker",
            Attachment::Photo => "photo",
            Attachment::Video => "video",
            Attachment::Document => "document",
            Attachment::Audio => "audio",
            Attachment::Voice => "voice",
            Attachment::VideoNote => "video_note",
            Attachment::Other => "other",
        }
    }
}

/// A chat event with sender, chat, text (or caption) and attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    /// Text of the message, or the caption of a media message. Empty when neither exists.
    pub content: String,
    pub attachment: Option<Attachment>,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

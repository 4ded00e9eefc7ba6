use stats_core::{
    Attachment, Chat, ChatKind, Message, MessageKind, ToCoreMessage, ToCoreUser, User,
};

/// Telegram user to core user.
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: self.0.first_name.clone(),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Telegram message (new or edited) to core message. Text falls back to the media caption.
pub struct TelegramMessageWrapper<'a> {
    message: &'a teloxide::types::Message,
    kind: MessageKind,
}

impl<'a> TelegramMessageWrapper<'a> {
    pub fn new(message: &'a teloxide::types::Message) -> Self {
        Self {
            message,
            kind: MessageKind::New,
        }
    }

    pub fn edited(message: &'a teloxide::types::Message) -> Self {
        Self {
            message,
            kind: MessageKind::Edited,
        }
    }

    fn chat(&self) -> Chat {
        let chat = &self.message.chat;
        let kind = if chat.is_private() {
            ChatKind::Private
        } else if chat.is_supergroup() {
            ChatKind::Supergroup
        } else if chat.is_group() {
            ChatKind::Group
        } else {
            ChatKind::Channel
        };
        Chat {
            id: chat.id.0,
            kind,
            title: chat.title().map(str::to_string),
            username: chat.username().map(str::to_string),
        }
    }

    fn attachment(&self) -> Option<Attachment> {
        let m = self.message;
        if m.sticker().is_some() {
            Some(Attachment::Sticker)
        } else if m.photo().is_some() {
            Some(Attachment::Photo)
        } else if m.video().is_some() {
            Some(Attachment::Video)
        } else if m.document().is_some() || m.animation().is_some() {
            Some(Attachment::Document)
        } else if m.audio().is_some() {
            Some(Attachment::Audio)
        } else if m.voice().is_some() {
            Some(Attachment::Voice)
        } else if m.video_note().is_some() {
            Some(Attachment::VideoNote)
        } else if m.text().is_some() {
            None
        } else {
            Some(Attachment::Other)
        }
    }
}

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let m = self.message;
        Message {
            id: m.id.0.to_string(),
            user: m
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: String::new(),
                    last_name: None,
                }),
            chat: self.chat(),
            content: m.text().or_else(|| m.caption()).unwrap_or("").to_string(),
            attachment: self.attachment(),
            kind: self.kind,
            created_at: m.date,
        }
    }
}

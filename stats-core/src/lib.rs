//! # stats-core
//!
//! Transport-agnostic building blocks for the group statistics bot: [`Bot`], [`Handler`],
//! chat/user/message types, error types and tracing initialization. Telegram specifics live
//! in `stats-bot`; counters live in `storage`.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{parse_message_id, Bot};
pub use error::{Result, StatsError};
pub use logger::init_tracing;
pub use types::{
    Attachment, Chat, ChatKind, Handler, HandlerResponse, Message, MessageKind, ToCoreMessage,
    ToCoreUser, User,
};

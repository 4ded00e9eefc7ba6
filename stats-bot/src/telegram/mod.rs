//! Telegram layer: teloxide types to core types, the [`stats_core::Bot`] implementation and the
//! update dispatcher (polling or webhook).

mod adapters;
mod bot_adapter;
mod dispatcher;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use dispatcher::{run_polling, run_webhook};

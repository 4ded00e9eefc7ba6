//! # stats-bot
//!
//! Wires `storage`, `stats-engine` and `web-api` to Telegram. Config comes from `config.yml` plus
//! env; updates run through a [`HandlerChain`] of logging, tracking and command handlers.

pub mod chain;
pub mod cli;
pub mod config;
pub mod handlers;
pub mod maintenance;
pub mod runner;
pub mod telegram;

pub use chain::HandlerChain;
pub use cli::{load_config, Cli, Commands};
pub use config::BotConfig;
pub use handlers::{Command, CommandHandler, LoggingHandler, StatsTracker};
pub use runner::{build_handler_chain, run_bot, StatsServices};
pub use telegram::{TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper};

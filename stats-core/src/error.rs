//! Error type shared by handlers and the [`Bot`](crate::Bot) transport.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    /// Store failure surfaced through a handler. Carries the rendered engine error.
    #[error("Database error: {0}")]
    Database(String),

    #[error("Bot error: {0}")]
    Bot(String),
}

/// Result type for handlers and the bot transport.
pub type Result<T> = std::result::Result<T, StatsError>;

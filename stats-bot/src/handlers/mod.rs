//! Chat handlers, in chain order: logging, tracking, commands.

mod commands;
mod logging;
mod tracker;

pub use commands::{format_leaderboard, format_user_stats, Command, CommandHandler, GENERIC_FAILURE};
pub use logging::LoggingHandler;
pub use tracker::{StatsTracker, BANNED_NOTICE};

use stats_core::StatsError;
use stats_engine::EngineError;

fn store_error(e: EngineError) -> StatsError {
    StatsError::Database(e.to_string())
}

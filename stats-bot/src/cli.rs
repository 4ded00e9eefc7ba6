//! CLI parser and config loading.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "stats-bot")]
#[command(about = "Telegram group statistics bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// YAML config file. Defaults to `config.yml`, which may be absent.
    #[arg(short, long, global = true, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot and the Mini-App API.
    Run,
    /// Create the schema and exit.
    Migrate,
    /// GET /health on the configured server; exits non-zero unless it answers 200.
    Healthcheck,
    /// Ban a user (or a group with --group) from being counted.
    Ban {
        #[arg(allow_hyphen_values = true)]
        id: i64,
        #[arg(long)]
        group: bool,
        #[arg(short, long)]
        reason: Option<String>,
    },
    /// Lift a ban.
    Unban {
        #[arg(allow_hyphen_values = true)]
        id: i64,
        #[arg(long)]
        group: bool,
    },
}

/// Loads [`BotConfig`] from `path` (or `config.yml`) and applies env overrides.
pub fn load_config(path: Option<&Path>) -> Result<BotConfig> {
    BotConfig::load(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_config() {
        let cli = Cli::parse_from(["stats-bot", "--config", "custom.yml", "run"]);
        assert_eq!(cli.config.as_deref(), Some(Path::new("custom.yml")));
        assert!(matches!(cli.command, Commands::Run));
    }

    #[test]
    fn test_parse_ban_group_with_reason() {
        let cli = Cli::parse_from(["stats-bot", "ban", "--group", "--reason", "spam", "-100"]);
        match cli.command {
            Commands::Ban { id, group, reason } => {
                assert_eq!(id, -100);
                assert!(group);
                assert_eq!(reason.as_deref(), Some("spam"));
            }
            _ => panic!("expected ban"),
        }
    }

    #[test]
    fn test_parse_unban_user() {
        let cli = Cli::parse_from(["stats-bot", "unban", "42"]);
        match cli.command {
            Commands::Unban { id, group } => {
                assert_eq!(id, 42);
                assert!(!group);
            }
            _ => panic!("expected unban"),
        }
    }
}

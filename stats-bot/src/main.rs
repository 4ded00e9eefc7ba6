//! Binary for the group statistics bot.

use anyhow::Result;
use clap::Parser;
use stats_bot::{load_config, maintenance, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run => run_bot(config).await,
        Commands::Migrate => maintenance::migrate(&config).await,
        Commands::Healthcheck => maintenance::healthcheck(&config).await,
        Commands::Ban { id, group, reason } => maintenance::ban(&config, id, group, reason).await,
        Commands::Unban { id, group } => maintenance::unban(&config, id, group).await,
    }
}

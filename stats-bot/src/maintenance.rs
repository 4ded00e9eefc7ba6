//! One-shot CLI actions that share the bot's config but not its transport.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use stats_engine::Aggregator;

use crate::config::BotConfig;

async fn aggregator(config: &BotConfig) -> Result<Aggregator> {
    let store = storage::connect(&config.database_url()?)
        .await
        .context("Failed to open the stats store")?;
    Ok(Aggregator::new(store).with_active_window(config.active_window_days))
}

/// Creates the schema (connecting already migrates) and exits.
pub async fn migrate(config: &BotConfig) -> Result<()> {
    let url = config.database_url()?;
    storage::connect(&url).await.context("Migration failed")?;
    println!("Schema is up to date ({:?})", storage::backend_for_url(&url));
    Ok(())
}

/// GET `/health` on the configured server; anything but 200 is an error (non-zero exit).
pub async fn healthcheck(config: &BotConfig) -> Result<()> {
    let url = health_url(&config.server.host, config.server.port);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?;
    if response.status() != reqwest::StatusCode::OK {
        bail!("GET {} returned {}", url, response.status());
    }
    println!("OK");
    Ok(())
}

/// Wildcard bind addresses are probed on loopback.
fn health_url(host: &str, port: u16) -> String {
    let host = match host {
        "0.0.0.0" | "::" | "[::]" => "127.0.0.1",
        other => other,
    };
    format!("http://{}:{}/health", host, port)
}

pub async fn ban(config: &BotConfig, id: i64, group: bool, reason: Option<String>) -> Result<()> {
    let aggregator = aggregator(config).await?;
    if group {
        aggregator.ban_group(id, reason).await?;
        println!("Group {} banned", id);
    } else {
        aggregator.ban_user(id, reason).await?;
        println!("User {} banned", id);
    }
    Ok(())
}

pub async fn unban(config: &BotConfig, id: i64, group: bool) -> Result<()> {
    let aggregator = aggregator(config).await?;
    let subject = if group { "Group" } else { "User" };
    let removed = if group {
        aggregator.unban_group(id).await?
    } else {
        aggregator.unban_user(id).await?
    };
    if removed {
        println!("{} {} unbanned", subject, id);
    } else {
        println!("{} {} was not banned", subject, id);
    }
    Ok(())
}

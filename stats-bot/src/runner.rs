//! Startup wiring: store, engine, handler chain, HTTP surface and the Telegram transport.

use std::sync::Arc;

use anyhow::{Context, Result};
use stats_core::{init_tracing, Bot};
use stats_engine::{Aggregator, StatsQuery};
use storage::StatsStore;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use web_api::{create_router, serve, AppState};
use teloxide::prelude::Requester;

use crate::chain::HandlerChain;
use crate::config::{BotConfig, BotMode};
use crate::handlers::{CommandHandler, LoggingHandler, StatsTracker};
use crate::telegram::{run_polling, run_webhook, TelegramBotAdapter};

/// Engine halves built from one store, configured from [`BotConfig`].
#[derive(Clone)]
pub struct StatsServices {
    pub aggregator: Aggregator,
    pub query: StatsQuery,
}

impl StatsServices {
    pub fn new(store: Arc<dyn StatsStore>, config: &BotConfig) -> Self {
        Self {
            aggregator: Aggregator::new(Arc::clone(&store))
                .with_active_window(config.active_window_days),
            query: StatsQuery::new(store).with_page_size(config.page_size),
        }
    }
}

/// logging → tracker → commands. `bot` is the transport (a mock in tests).
pub fn build_handler_chain(
    bot: Arc<dyn Bot>,
    services: &StatsServices,
    webapp_url: Option<String>,
    bot_username: Arc<RwLock<Option<String>>>,
) -> HandlerChain {
    let tracker = StatsTracker::new(services.aggregator.clone(), Arc::clone(&bot));
    let commands = CommandHandler::new(bot, services.aggregator.clone(), services.query.clone())
        .with_webapp_url(webapp_url)
        .with_bot_username(bot_username);

    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(tracker))
        .add_handler(Arc::new(commands))
}

/// Main entry: validate config, init logging, connect the store, then run the API and the
/// Telegram transport until either stops.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    let database_url = config.database_url()?;
    info!(
        mode = ?config.mode(),
        webapp_configured = config.webapp_configured(),
        "Initializing bot"
    );

    let store = storage::connect(&database_url)
        .await
        .context("Failed to open the stats store")?;
    info!(backend = ?store.backend(), "Stats store ready");
    let services = StatsServices::new(store, &config);

    let teloxide_bot = teloxide::Bot::new(config.bot_token());
    let state = AppState::new(config.api_config(), services.query.clone());
    match teloxide_bot.get_me().await {
        Ok(me) => {
            if let Some(username) = &me.user.username {
                state.set_bot_username(username.clone()).await;
                info!(username = %username, "Bot username set");
            }
        }
        Err(e) => warn!(error = %e, "get_me failed; /cmd@bot mentions will not match"),
    }

    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let chain = build_handler_chain(
        bot,
        &services,
        config.webapp_url().map(str::to_string),
        Arc::clone(&state.bot_username),
    );
    let router = create_router(state);
    let address = config.bind_address();

    info!("Bot started successfully");

    match config.mode() {
        BotMode::Polling => {
            tokio::select! {
                served = serve(&address, router) => served.context("API server stopped")?,
                polled = run_polling(teloxide_bot, chain) => polled?,
            }
        }
        BotMode::Webhook => {
            let webhook_url = config.bot.webhook.url.as_deref().unwrap_or_default();
            run_webhook(teloxide_bot, chain, webhook_url, &address, router).await?;
        }
    }

    info!("Bot stopped");
    Ok(())
}

//! Update dispatcher: new and edited messages are converted to core messages and run through the
//! [`HandlerChain`] in their own task, so a slow store call never blocks the update stream.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use stats_core::ToCoreMessage;
use teloxide::dispatching::{DefaultKey, Dispatcher, UpdateFilterExt};
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::{webhooks, Polling};
use tracing::{debug, error, info, instrument};
use url::Url;

use super::adapters::TelegramMessageWrapper;
use crate::chain::HandlerChain;

fn spawn_chain(chain: HandlerChain, wrapper: TelegramMessageWrapper<'_>) {
    let core_msg = wrapper.to_core();
    tokio::spawn(async move {
        if let Err(e) = chain.handle(&core_msg).await {
            error!(
                error = %e,
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                "Handler chain failed"
            );
        }
    });
}

async fn on_message(msg: teloxide::types::Message, chain: HandlerChain) -> ResponseResult<()> {
    if msg.from.is_none() {
        debug!(chat_id = msg.chat.id.0, "Skipping message without sender");
        return Ok(());
    }
    spawn_chain(chain, TelegramMessageWrapper::new(&msg));
    Ok(())
}

async fn on_edited_message(
    msg: teloxide::types::Message,
    chain: HandlerChain,
) -> ResponseResult<()> {
    if msg.from.is_none() {
        return Ok(());
    }
    spawn_chain(chain, TelegramMessageWrapper::edited(&msg));
    Ok(())
}

fn build_dispatcher(
    bot: teloxide::Bot,
    chain: HandlerChain,
) -> Dispatcher<teloxide::Bot, teloxide::RequestError, DefaultKey> {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_edited_message().endpoint(on_edited_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![chain])
        .default_handler(|upd| async move {
            debug!(update = ?upd.id, "Unhandled update");
        })
        .enable_ctrlc_handler()
        .build()
}

/// Long polling. Pending updates from while the bot was down are dropped.
#[instrument(skip(bot, chain))]
pub async fn run_polling(bot: teloxide::Bot, chain: HandlerChain) -> Result<()> {
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();
    info!("Starting in polling mode");
    build_dispatcher(bot, chain)
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;
    Ok(())
}

/// Webhook mode: registers `webhook_url` with Telegram and serves it on the same listener as
/// `api_router`.
#[instrument(skip(bot, chain, api_router))]
pub async fn run_webhook(
    bot: teloxide::Bot,
    chain: HandlerChain,
    webhook_url: &str,
    bind_address: &str,
    api_router: axum::Router,
) -> Result<()> {
    let url = Url::parse(webhook_url).with_context(|| format!("Invalid webhook URL {}", webhook_url))?;
    let address: SocketAddr = tokio::net::lookup_host(bind_address)
        .await?
        .next()
        .with_context(|| format!("Cannot resolve {}", bind_address))?;

    let options = webhooks::Options::new(address, url);
    let (listener, stop_flag, webhook_router) = webhooks::axum_to_router(bot.clone(), options)
        .await
        .context("Failed to set webhook")?;
    let router = webhook_router.merge(api_router);

    let tcp = tokio::net::TcpListener::bind(address).await?;
    info!(%address, url = %webhook_url, "Starting in webhook mode");
    let server = async move { axum::serve(tcp, router).with_graceful_shutdown(stop_flag).await };

    let mut dispatcher = build_dispatcher(bot, chain);
    let dispatch = dispatcher.dispatch_with_listener(
        listener,
        LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
    );

    let (served, ()) = tokio::join!(server, dispatch);
    served?;
    Ok(())
}

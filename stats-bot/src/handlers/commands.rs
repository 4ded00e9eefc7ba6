//! Chat commands. Each one reads through the Query Layer (or, for `/deletelast`, writes through
//! the Aggregation Engine) and replies with HTML.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use stats_core::{Bot, Handler, HandlerResponse, Message, Result, User};
use stats_engine::{Aggregator, EngineError, StatsQuery};
use storage::{AggregatedUserStat, UserGroupStat};
use teloxide::utils::command::BotCommands;
use teloxide::utils::html::escape;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

const WELCOME: &str = "Welcome! I'm a statistics bot. Add me to a group, and I'll start tracking user activity. Use /stats to view the stats web app!";
const NO_ACTIVITY: &str = "No activity recorded yet. Start chatting to see your stats here!";
const WEBAPP_NOT_CONFIGURED: &str =
    "⚠️ The web app is not configured yet. Please ask the bot administrator to set it up.";
const GROUPS_ONLY: &str = "This command only works in groups.";
const LEADERBOARD_LIMIT: i64 = 10;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Introduce the bot")]
    Start,
    #[command(description = "Measure the bot's round trip")]
    Ping,
    #[command(description = "Show your statistics")]
    Stats,
    #[command(description = "Show the most active users")]
    Leaderboard,
    #[command(description = "Open the stats web app")]
    Web,
    #[command(description = "Simulate deleting your last message")]
    DeleteLast,
}

/// What a command produced: a reply that was sent, or nothing (handled silently).
enum Handled {
    Replied(String),
    Silent,
}

/// Parses `/command[@bot]` messages and answers them. Anything else passes through.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    aggregator: Aggregator,
    query: StatsQuery,
    webapp_url: Option<String>,
    bot_username: Arc<RwLock<Option<String>>>,
}

impl CommandHandler {
    pub fn new(bot: Arc<dyn Bot>, aggregator: Aggregator, query: StatsQuery) -> Self {
        Self {
            bot,
            aggregator,
            query,
            webapp_url: None,
            bot_username: Arc::new(RwLock::new(None)),
        }
    }

    /// Mini-App URL for the "Open Web App" buttons; `None` hides them.
    pub fn with_webapp_url(mut self, url: Option<String>) -> Self {
        self.webapp_url = url;
        self
    }

    /// Shared cell filled with the bot's username after `get_me`, used to accept `/cmd@bot`.
    pub fn with_bot_username(mut self, bot_username: Arc<RwLock<Option<String>>>) -> Self {
        self.bot_username = bot_username;
        self
    }

    async fn parse(&self, message: &Message) -> Option<Command> {
        if message.attachment.is_some() || !message.content.starts_with('/') {
            return None;
        }
        let username = self.bot_username.read().await.clone().unwrap_or_default();
        Command::parse(&message.content, &username).ok()
    }

    async fn run(&self, command: &Command, message: &Message) -> Result<Handled> {
        let replied = match command {
            Command::Start => self.reply(message, WELCOME).await?,
            Command::Ping => self.ping(message).await?,
            Command::Stats => match self.query.get_aggregated_user_stat(message.user.id).await {
                Ok(stat) => {
                    let text = format_user_stats(&message.user, stat.as_ref());
                    self.reply_with_webapp(message, text, "🌐 Open Web App").await?
                }
                Err(e) => self.fail(message, e).await?,
            },
            Command::Leaderboard => self.leaderboard(message).await?,
            Command::Web => {
                if !message.chat.is_private() {
                    return Ok(Handled::Silent);
                }
                match &self.webapp_url {
                    Some(url) => {
                        let text = "🌐 Access the web app stats";
                        self.bot
                            .send_web_app_button(&message.chat, text, "📊 Open Web App", url)
                            .await?;
                        text.to_string()
                    }
                    None => self.reply(message, WEBAPP_NOT_CONFIGURED).await?,
                }
            }
            Command::DeleteLast => {
                if message.chat.is_private() {
                    self.reply(message, GROUPS_ONLY).await?
                } else {
                    match self.aggregator.apply_delete(&message.user, &message.chat).await {
                        Ok(_) => {
                            let text = format!(
                                "🗑️ Simulated a message deletion for user {}.",
                                escape(&message.user.first_name)
                            );
                            self.reply(message, &text).await?
                        }
                        Err(e) => self.fail(message, e).await?,
                    }
                }
            }
        };
        Ok(Handled::Replied(replied))
    }

    async fn reply(&self, message: &Message, text: &str) -> Result<String> {
        self.bot.reply_to(message, text).await?;
        Ok(text.to_string())
    }

    /// Adds the Mini-App button in private chats when one is configured.
    async fn reply_with_webapp(
        &self,
        message: &Message,
        text: String,
        button: &str,
    ) -> Result<String> {
        match &self.webapp_url {
            Some(url) if message.chat.is_private() => {
                self.bot
                    .send_web_app_button(&message.chat, &text, button, url)
                    .await?;
                Ok(text)
            }
            _ => self.reply(message, &text).await,
        }
    }

    /// Sends "Pong!", then edits in how long the send took.
    async fn ping(&self, message: &Message) -> Result<String> {
        let started = Instant::now();
        let sent_id = self
            .bot
            .send_message_and_return_id(&message.chat, "Pong!")
            .await?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let text = format!("Pong!\n<code>{:.2}</code> ms", elapsed_ms);
        self.bot.edit_message(&message.chat, &sent_id, &text).await?;
        Ok(text)
    }

    /// Group chats get that group's top users, private chats the global ranking.
    async fn leaderboard(&self, message: &Message) -> Result<String> {
        let chat = &message.chat;
        let text = if chat.is_private() {
            match self.query.get_top_users(LEADERBOARD_LIMIT, 0).await {
                Ok(users) => format_leaderboard("Top users", users.iter().map(top_row)),
                Err(e) => return self.fail(message, e).await,
            }
        } else {
            match self.query.get_group_top_users(chat.id, LEADERBOARD_LIMIT).await {
                Ok(rows) => {
                    let group = chat.title.as_deref().unwrap_or("this group");
                    format_leaderboard(&format!("Top users in {}", group), rows.iter().map(group_row))
                }
                Err(e) => return self.fail(message, e).await,
            }
        };
        self.reply(message, &text).await
    }

    /// Store failures stay in the log; the chat only sees the generic text.
    async fn fail(&self, message: &Message, e: EngineError) -> Result<String> {
        error!(
            error = %e,
            user_id = message.user.id,
            chat_id = message.chat.id,
            "Command failed"
        );
        self.reply(message, GENERIC_FAILURE).await
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(command) = self.parse(message).await else {
            return Ok(HandlerResponse::Continue);
        };
        info!(?command, "Command received");
        match self.run(&command, message).await? {
            Handled::Replied(text) => Ok(HandlerResponse::Reply(text)),
            Handled::Silent => Ok(HandlerResponse::Stop),
        }
    }
}

fn display_name(first_name: &str, last_name: Option<&str>) -> String {
    match last_name {
        Some(last) if !last.is_empty() => format!("{} {}", first_name, last),
        _ => first_name.to_string(),
    }
}

fn top_row(stat: &AggregatedUserStat) -> (String, i64, i64) {
    (
        display_name(&stat.first_name, stat.last_name.as_deref()),
        stat.message_count,
        stat.word_count,
    )
}

fn group_row(row: &UserGroupStat) -> (String, i64, i64) {
    (
        display_name(&row.first_name, row.last_name.as_deref()),
        row.message_count,
        row.word_count,
    )
}

/// `/stats` body for `user`; `stat` is `None` when nothing was counted yet.
pub fn format_user_stats(user: &User, stat: Option<&AggregatedUserStat>) -> String {
    let Some(stat) = stat else {
        return format!("📊 <b>Your Statistics</b>\n\n{}", NO_ACTIVITY);
    };
    format!(
        "📊 <b>Your Statistics</b>\n\n\
         👤 Name: {}\n\
         💬 Messages: {}\n\
         📝 Words: {}\n\
         📈 Avg. words/msg: {}\n\
         🖼️ Media: {}\n\
         😊 Stickers: {}\n\
         ✏️ Edits: {}\n\
         👥 Groups: {}",
        escape(&user.full_name()),
        stat.message_count,
        stat.word_count,
        stat.average_words,
        stat.media_count,
        stat.sticker_count,
        stat.edited_message_count,
        stat.group_count,
    )
}

/// Numbered `name: messages, words` lines under a bold title.
pub fn format_leaderboard<I>(title: &str, rows: I) -> String
where
    I: IntoIterator<Item = (String, i64, i64)>,
{
    let mut text = format!("🏆 <b>{}</b>\n", escape(title));
    let mut empty = true;
    for (rank, (name, messages, words)) in rows.into_iter().enumerate() {
        empty = false;
        text.push_str(&format!(
            "\n{}. {}: {} messages, {} words",
            rank + 1,
            escape(&name),
            messages,
            words
        ));
    }
    if empty {
        text.push_str("\nNo activity recorded yet.");
    }
    text
}

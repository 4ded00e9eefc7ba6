//! BotConfig: the parsed `config.yml` with env overrides applied. Use [`BotConfig::load`].

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use stats_engine::{DEFAULT_ACTIVE_WINDOW_DAYS, DEFAULT_PAGE_SIZE};
use url::Url;
use web_api::{ApiConfig, DEFAULT_TIMEZONE};

use super::sections::{BotMode, BotSection, DatabaseKind, DatabaseSection, ServerSection, WebAppSection};

pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

const TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN";
const WEBAPP_PLACEHOLDER: &str = "YOUR_WEB_APP_URL";
const ACTIVE_WINDOW_RANGE: std::ops::RangeInclusive<i64> = 1..=36500;

/// Everything the bot needs at startup. Built once and passed to constructors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub bot: BotSection,
    pub webapp: WebAppSection,
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub owner: Option<i64>,
    pub admins: Vec<i64>,
    pub timezone: String,
    pub log_file: String,
    pub page_size: i64,
    pub active_window_days: i64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot: BotSection::default(),
            webapp: WebAppSection::default(),
            server: ServerSection::default(),
            database: DatabaseSection::default(),
            owner: None,
            admins: Vec::new(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            log_file: "logs/stats-bot.log".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            active_window_days: DEFAULT_ACTIVE_WINDOW_DAYS,
        }
    }
}

impl BotConfig {
    /// Reads `path`, or `config.yml` when `path` is `None`, then applies env overrides.
    ///
    /// An explicit path that does not exist is an error; a missing default file just means
    /// "defaults plus env". Call [`validate`](Self::validate) before starting the bot.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parses YAML without env overrides. An empty document yields the defaults.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// `BOT_TOKEN`, `DATABASE_URL`, `LOG_FILE`, `WEBAPP_URL` and `SERVER_PORT` win over the file.
    pub fn apply_env(&mut self) {
        if let Some(token) = non_empty_var("BOT_TOKEN") {
            self.bot.token = token;
        }
        if let Some(url) = non_empty_var("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(log_file) = non_empty_var("LOG_FILE") {
            self.log_file = log_file;
        }
        if let Some(url) = non_empty_var("WEBAPP_URL") {
            self.webapp.url = Some(url);
        }
        if let Some(port) = non_empty_var("SERVER_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Fails fast on anything that would only break after startup.
    pub fn validate(&self) -> Result<()> {
        if self.bot.token.trim().is_empty() || self.bot.token == TOKEN_PLACEHOLDER {
            bail!("Bot token is not configured (bot.token or BOT_TOKEN)");
        }
        if self.bot.mode == BotMode::Webhook {
            let url = self.bot.webhook.url.as_deref().unwrap_or("");
            match Url::parse(url) {
                Ok(parsed) if parsed.scheme() == "https" || parsed.scheme() == "http" => {}
                _ => bail!("bot.webhook.url must be a valid URL when bot.mode is webhook: {:?}", url),
            }
        }
        if self.database.url.is_none()
            && self.database.kind == DatabaseKind::Mariadb
            && self.database.database.as_deref().unwrap_or("").is_empty()
        {
            bail!("database.database is required for the mariadb backend");
        }
        if self.page_size < 1 {
            bail!("page_size must be at least 1, got {}", self.page_size);
        }
        if !ACTIVE_WINDOW_RANGE.contains(&self.active_window_days) {
            bail!(
                "active_window_days must be between {} and {}, got {}",
                ACTIVE_WINDOW_RANGE.start(),
                ACTIVE_WINDOW_RANGE.end(),
                self.active_window_days
            );
        }
        Ok(())
    }

    pub fn bot_token(&self) -> &str {
        &self.bot.token
    }

    pub fn mode(&self) -> BotMode {
        self.bot.mode
    }

    pub fn log_file(&self) -> &str {
        &self.log_file
    }

    /// The Mini-App URL, only when it is set, not the placeholder and an http(s) URL.
    pub fn webapp_url(&self) -> Option<&str> {
        self.webapp
            .url
            .as_deref()
            .filter(|url| *url != WEBAPP_PLACEHOLDER && url.starts_with("http"))
    }

    pub fn webapp_configured(&self) -> bool {
        self.webapp_url().is_some()
    }

    /// sqlx URL for [`storage::connect`]: `database.url` if set, otherwise built from the
    /// backend fields.
    pub fn database_url(&self) -> Result<String> {
        if let Some(url) = &self.database.url {
            return Ok(url.clone());
        }
        let db = &self.database;
        match db.kind {
            DatabaseKind::Sqlite => Ok(format!("sqlite:{}", db.filename)),
            DatabaseKind::Mariadb => {
                let mut url = Url::parse(&format!("mysql://{}:{}", db.host, db.port))
                    .with_context(|| format!("Invalid database host {:?}", db.host))?;
                if let Some(username) = db.username.as_deref().filter(|u| !u.is_empty()) {
                    url.set_username(username)
                        .map_err(|_| anyhow::anyhow!("Cannot set database username"))?;
                }
                if let Some(password) = db.password.as_deref().filter(|p| !p.is_empty()) {
                    url.set_password(Some(password))
                        .map_err(|_| anyhow::anyhow!("Cannot set database password"))?;
                }
                url.set_path(db.database.as_deref().unwrap_or(""));
                Ok(url.to_string())
            }
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Settings for the HTTP surface.
    pub fn api_config(&self) -> ApiConfig {
        let config = ApiConfig::new(&self.server.host, self.server.port, &self.bot.token)
            .with_admins(self.owner, self.admins.clone())
            .with_timezone(&self.timezone);
        match &self.server.static_dir {
            Some(dir) => config.with_static_dir(dir),
            None => config,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

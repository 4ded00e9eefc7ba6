//! Serde sections of `config.yml`. Every field has a default so a partial file (or none) loads.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookSection {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BotSection {
    pub token: String,
    pub mode: BotMode,
    pub webhook: WebhookSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebAppSection {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Mini-App files served for `/` and unmatched paths.
    pub static_dir: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8101,
            static_dir: Some("stats-bot/webapp".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[default]
    Sqlite,
    #[serde(alias = "mysql")]
    Mariadb,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    #[serde(rename = "type")]
    pub kind: DatabaseKind,
    /// SQLite file.
    pub filename: String,
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    /// Full sqlx URL; wins over every other field when set.
    pub url: Option<String>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            kind: DatabaseKind::Sqlite,
            filename: "db/stats.sqlite".to_string(),
            host: "localhost".to_string(),
            port: 3306,
            username: None,
            password: None,
            database: None,
            url: None,
        }
    }
}

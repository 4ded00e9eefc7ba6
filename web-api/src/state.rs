//! Application state shared across handlers.

use std::sync::Arc;

use stats_engine::StatsQuery;
use tokio::sync::RwLock;

use crate::config::ApiConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub query: StatsQuery,
    /// Filled in once the bot has fetched its own profile.
    pub bot_username: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(config: ApiConfig, query: StatsQuery) -> Self {
        Self {
            config: Arc::new(config),
            query,
            bot_username: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_bot_username(&self, username: impl Into<String>) {
        *self.bot_username.write().await = Some(username.into());
    }

    pub async fn bot_username(&self) -> Option<String> {
        self.bot_username.read().await.clone()
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.config.is_admin(user_id)
    }
}

//! API configuration.

use std::path::PathBuf;

pub const DEFAULT_TIMEZONE: &str = "Asia/Jakarta";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Bot token; the Mini-App signature key is derived from it.
    pub bot_token: String,
    pub owner_id: Option<i64>,
    pub admin_ids: Vec<i64>,
    /// Directory holding `index.html`, `style.css` and `script.js`.
    pub static_dir: Option<PathBuf>,
    /// IANA zone the Mini-App formats timestamps in.
    pub timezone: String,
}

impl ApiConfig {
    pub fn new(host: impl Into<String>, port: u16, bot_token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            bot_token: bot_token.into(),
            owner_id: None,
            admin_ids: Vec::new(),
            static_dir: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }

    pub fn with_admins(mut self, owner_id: Option<i64>, admin_ids: Vec<i64>) -> Self {
        self.owner_id = owner_id;
        self.admin_ids = admin_ids;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Owner or listed admin.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.owner_id == Some(user_id) || self.admin_ids.contains(&user_id)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("localhost", 8101, "")
    }
}

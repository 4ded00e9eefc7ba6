//! Group-independent user row (`user_profiles` table).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::average::average_words;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Sticky moderation flag; upserts never clear it.
    pub is_banned: bool,
    pub message_count: i64,
    pub word_count: i64,
    pub sticker_count: i64,
    pub media_count: i64,
    pub edited_message_count: i64,
    pub deleted_count: i64,
    /// Kind of the last counted message: `text`, `sticker`, `photo`, ...
    pub last_activity: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn average_words(&self) -> i64 {
        average_words(self.word_count, self.message_count)
    }
}

/// Name fields refreshed on every upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Left unchanged in the store when `None`.
    pub last_activity: Option<String>,
}

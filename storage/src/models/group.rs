//! Group-level aggregate (`chat_groups` table) and the lightweight group listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::average::average_words;

/// Counters for one group. `users` and `user_active` are snapshots recomputed from
/// `user_group_stats` after every write, not live values.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupAggregate {
    pub group_id: i64,
    pub chat_type: String,
    pub title: Option<String>,
    pub username: Option<String>,
    pub users: i64,
    pub user_active: i64,
    pub message_count: i64,
    pub edited_message_count: i64,
    pub word_count: i64,
    pub sticker_count: i64,
    pub media_count: i64,
    pub deleted_count: i64,
    #[sqlx(skip)]
    pub average_words: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupAggregate {
    pub fn with_average(mut self) -> Self {
        self.average_words = average_words(self.word_count, self.message_count);
        self
    }
}

/// Group identity written alongside counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub group_id: i64,
    pub chat_type: String,
    pub title: Option<String>,
    pub username: Option<String>,
}

/// Group id and display title for switchers and `groupsForUser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: i64,
    pub title: String,
}

impl GroupSummary {
    /// Falls back to `"Group {id}"` when the title is unknown or blank.
    pub fn new(id: i64, title: Option<String>) -> Self {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Group {}", id));
        Self { id, title }
    }
}

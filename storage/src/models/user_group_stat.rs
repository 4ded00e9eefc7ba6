//! Per-(user, group) counters and their cross-group aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::average::average_words;

/// One row of `user_group_stats`. `average_words` is derived after loading.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserGroupStat {
    pub user_id: i64,
    pub group_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub group_title: Option<String>,
    pub group_username: Option<String>,
    pub message_count: i64,
    pub word_count: i64,
    pub sticker_count: i64,
    pub media_count: i64,
    pub edited_message_count: i64,
    pub deleted_count: i64,
    #[sqlx(skip)]
    pub average_words: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserGroupStat {
    /// Fills `average_words` from the loaded counters.
    pub fn with_average(mut self) -> Self {
        self.average_words = average_words(self.word_count, self.message_count);
        self
    }
}

/// A user's counters summed over every group they have a row in.
///
/// `average_words` is derived from the summed totals, never averaged from per-group averages.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AggregatedUserStat {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub message_count: i64,
    pub word_count: i64,
    pub sticker_count: i64,
    pub media_count: i64,
    pub edited_message_count: i64,
    pub deleted_count: i64,
    pub group_count: i64,
    #[sqlx(skip)]
    pub average_words: i64,
}

impl AggregatedUserStat {
    pub fn with_average(mut self) -> Self {
        self.average_words = average_words(self.word_count, self.message_count);
        self
    }
}

/// Key plus the cosmetic fields refreshed (last write wins) on each upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStatIdentity {
    pub user_id: i64,
    pub group_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub group_title: Option<String>,
    pub group_username: Option<String>,
}

//! MySQL / MariaDB adapter for [`StatsStore`].
//!
//! Same tables as the SQLite adapter; increments use `ON DUPLICATE KEY UPDATE c = c + VALUES(c)`
//! and sums are cast back to `SIGNED` because MySQL returns `DECIMAL` for `SUM`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{
    AggregatedUserStat, BanEntry, GroupAggregate, GroupInfo, GroupStatIdentity, GroupSummary,
    ProfileUpdate, StatDelta, UserGroupStat, UserProfile,
};
use crate::mysql_pool::MySqlPoolManager;
use crate::store::{Backend, StatsStore};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS user_profiles (
        user_id BIGINT NOT NULL PRIMARY KEY,
        username VARCHAR(255) NULL,
        first_name VARCHAR(255) NOT NULL,
        last_name VARCHAR(255) NULL,
        is_banned BOOLEAN NOT NULL DEFAULT FALSE,
        message_count BIGINT NOT NULL DEFAULT 0,
        word_count BIGINT NOT NULL DEFAULT 0,
        sticker_count BIGINT NOT NULL DEFAULT 0,
        media_count BIGINT NOT NULL DEFAULT 0,
        edited_message_count BIGINT NOT NULL DEFAULT 0,
        deleted_count BIGINT NOT NULL DEFAULT 0,
        last_activity VARCHAR(32) NULL,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL
    ) CHARACTER SET utf8mb4
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_group_stats (
        user_id BIGINT NOT NULL,
        group_id BIGINT NOT NULL,
        username VARCHAR(255) NULL,
        first_name VARCHAR(255) NOT NULL,
        last_name VARCHAR(255) NULL,
        group_title VARCHAR(255) NULL,
        group_username VARCHAR(255) NULL,
        message_count BIGINT NOT NULL DEFAULT 0,
        word_count BIGINT NOT NULL DEFAULT 0,
        sticker_count BIGINT NOT NULL DEFAULT 0,
        media_count BIGINT NOT NULL DEFAULT 0,
        edited_message_count BIGINT NOT NULL DEFAULT 0,
        deleted_count BIGINT NOT NULL DEFAULT 0,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL,
        PRIMARY KEY (user_id, group_id),
        INDEX idx_user_group_stats_group_id (group_id)
    ) CHARACTER SET utf8mb4
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chat_groups (
        group_id BIGINT NOT NULL PRIMARY KEY,
        chat_type VARCHAR(16) NOT NULL,
        title VARCHAR(255) NULL,
        username VARCHAR(255) NULL,
        users BIGINT NOT NULL DEFAULT 0,
        user_active BIGINT NOT NULL DEFAULT 0,
        message_count BIGINT NOT NULL DEFAULT 0,
        edited_message_count BIGINT NOT NULL DEFAULT 0,
        word_count BIGINT NOT NULL DEFAULT 0,
        sticker_count BIGINT NOT NULL DEFAULT 0,
        media_count BIGINT NOT NULL DEFAULT 0,
        deleted_count BIGINT NOT NULL DEFAULT 0,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL
    ) CHARACTER SET utf8mb4
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS banned (
        subject_id BIGINT NOT NULL PRIMARY KEY,
        subject_type VARCHAR(16) NOT NULL,
        spammer BOOLEAN NOT NULL DEFAULT FALSE,
        reason TEXT NULL
    ) CHARACTER SET utf8mb4
    "#,
];

const AGGREGATED_SELECT: &str = r#"
    SELECT
        t.user_id,
        COALESCE(p.username, t.username) AS username,
        COALESCE(NULLIF(p.first_name, ''), t.first_name) AS first_name,
        COALESCE(p.last_name, t.last_name) AS last_name,
        t.message_count,
        t.word_count,
        t.sticker_count,
        t.media_count,
        t.edited_message_count,
        t.deleted_count,
        t.group_count
    FROM (
        SELECT
            user_id,
            MAX(username) AS username,
            MAX(first_name) AS first_name,
            MAX(last_name) AS last_name,
            CAST(SUM(message_count) AS SIGNED) AS message_count,
            CAST(SUM(word_count) AS SIGNED) AS word_count,
            CAST(SUM(sticker_count) AS SIGNED) AS sticker_count,
            CAST(SUM(media_count) AS SIGNED) AS media_count,
            CAST(SUM(edited_message_count) AS SIGNED) AS edited_message_count,
            CAST(SUM(deleted_count) AS SIGNED) AS deleted_count,
            COUNT(*) AS group_count
        FROM user_group_stats
        {filter}
        GROUP BY user_id
    ) t
    LEFT JOIN user_profiles p ON p.user_id = t.user_id
"#;

/// MySQL-backed counter store.
#[derive(Clone)]
pub struct MySqlStatsStore {
    pool_manager: MySqlPoolManager,
}

impl MySqlStatsStore {
    /// Connects and creates the schema.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool_manager = MySqlPoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.migrate().await?;
        Ok(store)
    }

    fn aggregated_sql(filter: &str) -> String {
        AGGREGATED_SELECT.replace("{filter}", filter)
    }
}

#[async_trait]
impl StatsStore for MySqlStatsStore {
    fn backend(&self) -> Backend {
        Backend::MySql
    }

    async fn migrate(&self) -> Result<()> {
        info!("Creating database tables if not exist");
        let pool = self.pool_manager.pool();
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("Database tables created successfully");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self.pool_manager.pool()).await?;
        Ok(())
    }

    async fn get_user_profile(&self, user_id: i64) -> Result<Option<UserProfile>> {
        let profile =
            sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(self.pool_manager.pool())
                .await?;
        Ok(profile)
    }

    async fn upsert_user_profile(&self, profile: &ProfileUpdate, delta: &StatDelta) -> Result<()> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO user_profiles (
                user_id, username, first_name, last_name, is_banned,
                message_count, word_count, sticker_count, media_count,
                edited_message_count, deleted_count, last_activity, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, FALSE, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                username = VALUES(username),
                first_name = VALUES(first_name),
                last_name = VALUES(last_name),
                message_count = message_count + VALUES(message_count),
                word_count = word_count + VALUES(word_count),
                sticker_count = sticker_count + VALUES(sticker_count),
                media_count = media_count + VALUES(media_count),
                edited_message_count = edited_message_count + VALUES(edited_message_count),
                deleted_count = deleted_count + VALUES(deleted_count),
                last_activity = COALESCE(VALUES(last_activity), last_activity),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(delta.messages)
        .bind(delta.words)
        .bind(delta.stickers)
        .bind(delta.media)
        .bind(delta.edited)
        .bind(delta.deleted)
        .bind(&profile.last_activity)
        .bind(now)
        .bind(now)
        .execute(self.pool_manager.pool())
        .await?;

        debug!(user_id = profile.user_id, ?delta, "Upserted user profile");
        Ok(())
    }

    async fn set_user_banned(&self, user_id: i64, banned: bool) -> Result<()> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, first_name, is_banned, created_at, updated_at)
            VALUES (?, '', ?, ?, ?)
            ON DUPLICATE KEY UPDATE is_banned = VALUES(is_banned)
            "#,
        )
        .bind(user_id)
        .bind(banned)
        .bind(now)
        .bind(now)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    async fn get_ban(&self, subject_id: i64) -> Result<Option<BanEntry>> {
        let entry = sqlx::query_as::<_, BanEntry>(
            "SELECT subject_id, subject_type, spammer, reason FROM banned WHERE subject_id = ?",
        )
        .bind(subject_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(entry)
    }

    async fn add_ban(&self, entry: &BanEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO banned (subject_id, subject_type, spammer, reason)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                subject_type = VALUES(subject_type),
                spammer = VALUES(spammer),
                reason = VALUES(reason)
            "#,
        )
        .bind(entry.subject_id)
        .bind(entry.subject_type.as_str())
        .bind(entry.spammer)
        .bind(&entry.reason)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    async fn remove_ban(&self, subject_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM banned WHERE subject_id = ?")
            .bind(subject_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_user_group_stat(
        &self,
        identity: &GroupStatIdentity,
        delta: &StatDelta,
    ) -> Result<()> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO user_group_stats (
                user_id, group_id, username, first_name, last_name, group_title, group_username,
                message_count, word_count, sticker_count, media_count,
                edited_message_count, deleted_count, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                username = VALUES(username),
                first_name = VALUES(first_name),
                last_name = VALUES(last_name),
                group_title = COALESCE(VALUES(group_title), group_title),
                group_username = VALUES(group_username),
                message_count = message_count + VALUES(message_count),
                word_count = word_count + VALUES(word_count),
                sticker_count = sticker_count + VALUES(sticker_count),
                media_count = media_count + VALUES(media_count),
                edited_message_count = edited_message_count + VALUES(edited_message_count),
                deleted_count = deleted_count + VALUES(deleted_count),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(identity.user_id)
        .bind(identity.group_id)
        .bind(&identity.username)
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(&identity.group_title)
        .bind(&identity.group_username)
        .bind(delta.messages)
        .bind(delta.words)
        .bind(delta.stickers)
        .bind(delta.media)
        .bind(delta.edited)
        .bind(delta.deleted)
        .bind(now)
        .bind(now)
        .execute(self.pool_manager.pool())
        .await?;

        debug!(
            user_id = identity.user_id,
            group_id = identity.group_id,
            ?delta,
            "Upserted user group stat"
        );
        Ok(())
    }

    async fn upsert_group(&self, info: &GroupInfo, delta: &StatDelta) -> Result<()> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO chat_groups (
                group_id, chat_type, title, username,
                message_count, edited_message_count, word_count, sticker_count, media_count,
                deleted_count, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                chat_type = VALUES(chat_type),
                title = COALESCE(VALUES(title), title),
                username = VALUES(username),
                message_count = message_count + VALUES(message_count),
                edited_message_count = edited_message_count + VALUES(edited_message_count),
                word_count = word_count + VALUES(word_count),
                sticker_count = sticker_count + VALUES(sticker_count),
                media_count = media_count + VALUES(media_count),
                deleted_count = deleted_count + VALUES(deleted_count),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(info.group_id)
        .bind(&info.chat_type)
        .bind(&info.title)
        .bind(&info.username)
        .bind(delta.messages)
        .bind(delta.edited)
        .bind(delta.words)
        .bind(delta.stickers)
        .bind(delta.media)
        .bind(delta.deleted)
        .bind(now)
        .bind(now)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    async fn refresh_group_user_counts(
        &self,
        group_id: i64,
        active_since: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE chat_groups SET
                users = (
                    SELECT COUNT(DISTINCT user_id) FROM user_group_stats WHERE group_id = ?
                ),
                user_active = (
                    SELECT COUNT(DISTINCT s.user_id)
                    FROM user_group_stats s
                    JOIN user_profiles p ON p.user_id = s.user_id
                    WHERE s.group_id = ? AND p.updated_at >= ?
                )
            WHERE group_id = ?
            "#,
        )
        .bind(group_id)
        .bind(group_id)
        .bind(active_since)
        .bind(group_id)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    async fn get_user_group_stat(
        &self,
        user_id: i64,
        group_id: i64,
    ) -> Result<Option<UserGroupStat>> {
        let stat = sqlx::query_as::<_, UserGroupStat>(
            "SELECT * FROM user_group_stats WHERE user_id = ? AND group_id = ?",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(stat.map(UserGroupStat::with_average))
    }

    async fn get_aggregated_user_stat(&self, user_id: i64) -> Result<Option<AggregatedUserStat>> {
        let sql = Self::aggregated_sql("WHERE user_id = ?");
        let stat = sqlx::query_as::<_, AggregatedUserStat>(&sql)
            .bind(user_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(stat.map(AggregatedUserStat::with_average))
    }

    async fn get_top_users(&self, limit: i64, offset: i64) -> Result<Vec<AggregatedUserStat>> {
        let sql = format!(
            "{} ORDER BY t.message_count DESC, t.user_id ASC LIMIT ? OFFSET ?",
            Self::aggregated_sql("")
        );
        let users = sqlx::query_as::<_, AggregatedUserStat>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool_manager.pool())
            .await?;
        Ok(users.into_iter().map(AggregatedUserStat::with_average).collect())
    }

    async fn count_users(&self) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(DISTINCT user_id) FROM user_group_stats")
                .fetch_one(self.pool_manager.pool())
                .await?;
        Ok(count)
    }

    async fn get_group_top_users(&self, group_id: i64, limit: i64) -> Result<Vec<UserGroupStat>> {
        let users = sqlx::query_as::<_, UserGroupStat>(
            r#"
            SELECT * FROM user_group_stats
            WHERE group_id = ?
            ORDER BY message_count DESC, user_id ASC
            LIMIT ?
            "#,
        )
        .bind(group_id)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(users.into_iter().map(UserGroupStat::with_average).collect())
    }

    async fn get_group(&self, group_id: i64) -> Result<Option<GroupAggregate>> {
        let group =
            sqlx::query_as::<_, GroupAggregate>("SELECT * FROM chat_groups WHERE group_id = ?")
                .bind(group_id)
                .fetch_optional(self.pool_manager.pool())
                .await?;
        Ok(group.map(GroupAggregate::with_average))
    }

    async fn list_groups(&self, limit: i64, offset: i64) -> Result<Vec<GroupAggregate>> {
        let groups = sqlx::query_as::<_, GroupAggregate>(
            "SELECT * FROM chat_groups ORDER BY message_count DESC, group_id ASC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(groups.into_iter().map(GroupAggregate::with_average).collect())
    }

    async fn count_groups(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_groups")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count)
    }

    async fn get_groups_for_user(&self, user_id: i64) -> Result<Vec<GroupSummary>> {
        let rows: Vec<(i64, Option<String>)> = sqlx::query_as(
            r#"
            SELECT s.group_id, COALESCE(g.title, s.group_title)
            FROM user_group_stats s
            LEFT JOIN chat_groups g ON g.group_id = s.group_id
            WHERE s.user_id = ?
            ORDER BY s.message_count DESC, s.group_id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, title)| GroupSummary::new(id, title))
            .collect())
    }

    async fn get_known_groups(&self) -> Result<Vec<GroupSummary>> {
        let rows: Vec<(i64, Option<String>)> = sqlx::query_as(
            r#"
            SELECT s.group_id, MAX(COALESCE(g.title, s.group_title))
            FROM user_group_stats s
            LEFT JOIN chat_groups g ON g.group_id = s.group_id
            GROUP BY s.group_id
            ORDER BY s.group_id ASC
            "#,
        )
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, title)| GroupSummary::new(id, title))
            .collect())
    }
}

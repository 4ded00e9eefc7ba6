//! The storage port: every backend implements [`StatsStore`] and call sites never branch on
//! which one they talk to.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    AggregatedUserStat, BanEntry, GroupAggregate, GroupInfo, GroupStatIdentity, GroupSummary,
    ProfileUpdate, StatDelta, UserGroupStat, UserProfile,
};

/// Which adapter is behind a [`StatsStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    MySql,
}

/// Counter store. Every write that takes a [`StatDelta`] applies it as a single
/// `INSERT ... ON CONFLICT/DUPLICATE KEY UPDATE column = column + delta` statement, so two
/// concurrent writers on the same key never lose an increment.
#[async_trait]
pub trait StatsStore: Send + Sync {
    fn backend(&self) -> Backend;

    /// Creates tables and indexes if they do not exist.
    async fn migrate(&self) -> Result<()>;

    /// Cheap round trip used by health checks.
    async fn ping(&self) -> Result<()>;

    // --- profiles and bans ---

    async fn get_user_profile(&self, user_id: i64) -> Result<Option<UserProfile>>;

    /// Inserts the profile with `delta` as initial counters, or refreshes names/`updated_at` and
    /// adds `delta`. Never touches `is_banned`.
    async fn upsert_user_profile(&self, profile: &ProfileUpdate, delta: &StatDelta) -> Result<()>;

    /// Sets the sticky ban flag, creating a bare profile if none exists.
    async fn set_user_banned(&self, user_id: i64, banned: bool) -> Result<()>;

    async fn get_ban(&self, subject_id: i64) -> Result<Option<BanEntry>>;

    /// Inserts or replaces the entry for `entry.subject_id`.
    async fn add_ban(&self, entry: &BanEntry) -> Result<()>;

    /// Returns whether an entry was removed.
    async fn remove_ban(&self, subject_id: i64) -> Result<bool>;

    // --- counters ---

    async fn upsert_user_group_stat(
        &self,
        identity: &GroupStatIdentity,
        delta: &StatDelta,
    ) -> Result<()>;

    async fn upsert_group(&self, info: &GroupInfo, delta: &StatDelta) -> Result<()>;

    /// Recomputes `users` (distinct users with a row in the group) and `user_active` (those whose
    /// profile was updated at or after `active_since`) by re-scanning the detail table.
    async fn refresh_group_user_counts(
        &self,
        group_id: i64,
        active_since: DateTime<Utc>,
    ) -> Result<()>;

    // --- reads ---

    async fn get_user_group_stat(&self, user_id: i64, group_id: i64)
        -> Result<Option<UserGroupStat>>;

    /// Sums every group row of the user; `None` if the user has no group rows.
    async fn get_aggregated_user_stat(&self, user_id: i64) -> Result<Option<AggregatedUserStat>>;

    /// Users summed across groups, by total messages desc then user id asc.
    async fn get_top_users(&self, limit: i64, offset: i64) -> Result<Vec<AggregatedUserStat>>;

    /// Distinct users that have at least one group row.
    async fn count_users(&self) -> Result<i64>;

    /// Rows of one group, by messages desc then user id asc.
    async fn get_group_top_users(&self, group_id: i64, limit: i64) -> Result<Vec<UserGroupStat>>;

    async fn get_group(&self, group_id: i64) -> Result<Option<GroupAggregate>>;

    /// Groups by messages desc then group id asc.
    async fn list_groups(&self, limit: i64, offset: i64) -> Result<Vec<GroupAggregate>>;

    async fn count_groups(&self) -> Result<i64>;

    /// Groups the user has counters in, busiest first.
    async fn get_groups_for_user(&self, user_id: i64) -> Result<Vec<GroupSummary>>;

    /// Every distinct group that appears in the detail table, by id.
    async fn get_known_groups(&self) -> Result<Vec<GroupSummary>>;
}

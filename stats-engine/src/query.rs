//! Query Layer: read-only views over the counters.
//!
//! Pages are 1-indexed at this boundary and translated to `offset = (page - 1) * limit`.

use std::sync::Arc;

use serde::Serialize;
use storage::{AggregatedUserStat, GroupAggregate, GroupSummary, StatsStore, UserGroupStat};
use tracing::debug;

use crate::error::Result;

pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: i64,
    pub current_page: i64,
}

/// Offset of a 1-indexed page; pages below 1 are treated as page 1. Saturates instead of
/// overflowing, so an absurd page number just reads past the end.
pub fn page_offset(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(limit.max(0))
}

/// `ceil(total / limit)`, zero when there is nothing to show.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[derive(Clone)]
pub struct StatsQuery {
    store: Arc<dyn StatsStore>,
    page_size: i64,
}

impl StatsQuery {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Round trip to the store.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await?;
        Ok(())
    }

    pub async fn get_user_stat(&self, user_id: i64, group_id: i64) -> Result<Option<UserGroupStat>> {
        Ok(self.store.get_user_group_stat(user_id, group_id).await?)
    }

    /// Sums across groups, then derives the average from the sums.
    pub async fn get_aggregated_user_stat(&self, user_id: i64) -> Result<Option<AggregatedUserStat>> {
        Ok(self.store.get_aggregated_user_stat(user_id).await?)
    }

    /// By total messages desc, user id asc.
    pub async fn get_top_users(&self, limit: i64, offset: i64) -> Result<Vec<AggregatedUserStat>> {
        Ok(self.store.get_top_users(limit, offset.max(0)).await?)
    }

    pub async fn get_top_users_page(&self, page: i64) -> Result<Page<AggregatedUserStat>> {
        let current_page = page.max(1);
        let items = self
            .get_top_users(self.page_size, page_offset(current_page, self.page_size))
            .await?;
        let total = self.store.count_users().await?;
        Ok(Page {
            items,
            total_pages: total_pages(total, self.page_size),
            current_page,
        })
    }

    pub async fn get_group_top_users(&self, group_id: i64, limit: i64) -> Result<Vec<UserGroupStat>> {
        Ok(self.store.get_group_top_users(group_id, limit).await?)
    }

    /// Every group seen in the detail table, for an admin's group switcher.
    pub async fn get_groups(&self, admin_id: i64) -> Result<Vec<GroupSummary>> {
        debug!(admin_id, "Listing known groups");
        Ok(self.store.get_known_groups().await?)
    }

    /// Groups by messages desc, id asc.
    pub async fn get_top_groups(&self, page: i64) -> Result<Page<GroupAggregate>> {
        let current_page = page.max(1);
        let items = self
            .store
            .list_groups(self.page_size, page_offset(current_page, self.page_size))
            .await?;
        let total = self.store.count_groups().await?;
        Ok(Page {
            items,
            total_pages: total_pages(total, self.page_size),
            current_page,
        })
    }

    pub async fn get_group(&self, group_id: i64) -> Result<Option<GroupAggregate>> {
        Ok(self.store.get_group(group_id).await?)
    }

    pub async fn get_groups_for_user(&self, user_id: i64) -> Result<Vec<GroupSummary>> {
        Ok(self.store.get_groups_for_user(user_id).await?)
    }

    /// Whether the user has counters in the group.
    pub async fn is_member(&self, user_id: i64, group_id: i64) -> Result<bool> {
        Ok(self.get_user_stat(user_id, group_id).await?.is_some())
    }
}

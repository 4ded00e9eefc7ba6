//! Request and response DTOs. JSON keys are camelCase; stat rows keep their column names.

use serde::{Deserialize, Serialize};
use storage::{AggregatedUserStat, GroupAggregate, GroupSummary, UserGroupStat};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicInfoResponse {
    pub bot_username: Option<String>,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub stats: Option<AggregatedUserStat>,
    pub is_admin: bool,
    pub groups_for_user: Vec<GroupSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    pub group: GroupAggregate,
    pub users: Vec<UserGroupStat>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersPageResponse {
    pub users: Vec<AggregatedUserStat>,
    pub total_pages: i64,
    pub current_page: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupsPageResponse {
    pub groups: Vec<GroupAggregate>,
    pub total_pages: i64,
    pub current_page: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KnownGroupsResponse {
    pub groups: Vec<GroupSummary>,
}

//! Per-user and per-group stats for any verified Mini-App user.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::auth::WebAppAuth;
use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::{GroupStatsResponse, StatsResponse};

const GROUP_LEADERBOARD_SIZE: i64 = 10;

/// GET /api/stats - The caller's aggregated stats.
pub async fn my_stats(
    State(state): State<AppState>,
    auth: WebAppAuth,
) -> Result<Json<StatsResponse>> {
    let user_id = auth.user_id()?;
    debug!(user_id, "Mini-App stats request");

    let stats = state.query.get_aggregated_user_stat(user_id).await?;
    let groups_for_user = state.query.get_groups_for_user(user_id).await?;

    Ok(Json(StatsResponse {
        stats,
        is_admin: state.is_admin(user_id),
        groups_for_user,
    }))
}

/// GET /api/stats/:group_id - Group leaderboard; members of the group and admins only.
pub async fn group_stats(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    auth: WebAppAuth,
) -> Result<Json<GroupStatsResponse>> {
    let user_id = auth.user_id()?;
    if !state.is_admin(user_id) && !state.query.is_member(user_id, group_id).await? {
        return Err(ApiError::Forbidden("Unauthorized"));
    }

    let group = state
        .query
        .get_group(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("group {}", group_id)))?;
    let users = state
        .query
        .get_group_top_users(group_id, GROUP_LEADERBOARD_SIZE)
        .await?;

    Ok(Json(GroupStatsResponse { group, users }))
}

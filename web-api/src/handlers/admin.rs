//! Admin-only listings.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::auth::WebAppAuth;
use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::{GroupsPageResponse, KnownGroupsResponse, PageQuery, UsersPageResponse};

fn require_admin(state: &AppState, auth: &WebAppAuth) -> Result<i64> {
    let user_id = auth.user_id()?;
    if !state.is_admin(user_id) {
        return Err(ApiError::Forbidden("Unauthorized"));
    }
    Ok(user_id)
}

/// GET /api/users, /api/top-users - Users by total messages.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    auth: WebAppAuth,
) -> Result<Json<UsersPageResponse>> {
    require_admin(&state, &auth)?;
    let page = state.query.get_top_users_page(query.page()).await?;
    Ok(Json(UsersPageResponse {
        users: page.items,
        total_pages: page.total_pages,
        current_page: page.current_page,
    }))
}

/// GET /api/groups - Groups by total messages.
pub async fn list_groups(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    auth: WebAppAuth,
) -> Result<Json<GroupsPageResponse>> {
    require_admin(&state, &auth)?;
    let page = state.query.get_top_groups(query.page()).await?;
    Ok(Json(GroupsPageResponse {
        groups: page.items,
        total_pages: page.total_pages,
        current_page: page.current_page,
    }))
}

/// GET /api/known-groups - Every group ever seen, for the admin group switcher.
pub async fn known_groups(
    State(state): State<AppState>,
    auth: WebAppAuth,
) -> Result<Json<KnownGroupsResponse>> {
    let admin_id = require_admin(&state, &auth)?;
    let groups = state.query.get_groups(admin_id).await?;
    Ok(Json(KnownGroupsResponse { groups }))
}

//! Unauthenticated endpoints for the "open from Telegram" fallback view.

use axum::{extract::State, Json};

use crate::state::AppState;
use crate::types::PublicInfoResponse;

/// GET /public/info
pub async fn public_info(State(state): State<AppState>) -> Json<PublicInfoResponse> {
    Json(PublicInfoResponse {
        bot_username: state.bot_username().await,
        timezone: state.config.timezone.clone(),
    })
}

//! Presence listing handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::OnlineUsersResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/presence/online
pub async fn online_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Json<OnlineUsersResponse> {
    let users = state.realtime.presence.online_users().await;
    Json(OnlineUsersResponse {
        count: users.len(),
        users,
    })
}

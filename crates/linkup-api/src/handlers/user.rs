//! Account profile and social-graph handlers.
//!
//! Each successful mutation is published to the realtime engine so
//! connected clients see `userFollowed`, `userBlocked` and friends.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::response::{MessageResponse, ProfileResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let account = state.graph.get_account(&id).await?;
    let viewer = state.directory.find(&auth.identity).await?;

    let (is_following, is_blocked) = viewer
        .map(|v| (v.is_following(&account.id), v.has_blocked(&account.id)))
        .unwrap_or_default();

    Ok(Json(ProfileResponse {
        account,
        is_following,
        is_blocked,
    }))
}

/// POST /api/users/{id}/follow
pub async fn follow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let event = state.graph.follow(&auth, &id).await?;
    state.realtime.events.publish(&event).await;
    Ok(Json(MessageResponse::new("Followed successfully")))
}

/// POST /api/users/{id}/unfollow
pub async fn unfollow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let event = state.graph.unfollow(&auth, &id).await?;
    state.realtime.events.publish(&event).await;
    Ok(Json(MessageResponse::new("Unfollowed successfully")))
}

/// POST /api/users/{id}/block
pub async fn block(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let event = state.graph.block(&auth, &id).await?;
    state.realtime.events.publish(&event).await;
    Ok(Json(MessageResponse::new("Blocked successfully")))
}

/// POST /api/users/{id}/unblock
pub async fn unblock(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let event = state.graph.unblock(&auth, &id).await?;
    state.realtime.events.publish(&event).await;
    Ok(Json(MessageResponse::new("Unblocked successfully")))
}

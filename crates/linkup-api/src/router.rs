//! Route definitions for the Linkup HTTP API.
//!
//! Social-graph, presence and health routes are mounted under `/api`;
//! the persistent connection lives at `/ws`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(user_routes())
        .merge(presence_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Profile lookup and follow / block relations
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/{id}", get(handlers::user::get_user))
        .route("/users/{id}/follow", post(handlers::user::follow))
        .route("/users/{id}/unfollow", post(handlers::user::unfollow))
        .route("/users/{id}/block", post(handlers::user::block))
        .route("/users/{id}/unblock", post(handlers::user::unblock))
}

/// Presence endpoints
fn presence_routes() -> Router<AppState> {
    Router::new().route("/presence/online", get(handlers::presence::online_users))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use linkup_api::router::build_router;
use linkup_core::types::Identity;
use linkup_service::account::AccountDirectory;

use common::{test_state, token_for};

async fn call(app: &Router, method: &str, uri: &str, as_user: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = as_user {
        builder = builder.header("authorization", format!("Bearer {}", token_for(user)));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let (state, _) = test_state();
    let app = build_router(state);

    let (status, body) = call(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn detailed_health_exposes_engine_counters() {
    let (state, _) = test_state();
    let app = build_router(state);

    let (status, body) = call(&app, "GET", "/api/health/detailed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ws_connections"], 0);
    assert_eq!(body["online_users"], 0);
    assert_eq!(body["metrics"]["connections_total"], 0);
}

#[tokio::test]
async fn follow_requires_bearer_token() {
    let (state, _) = test_state();
    let app = build_router(state);

    let (status, body) = call(&app, "POST", "/api/users/bob/follow", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let (state, _) = test_state();
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/bob/follow")
                .header("authorization", "Bearer not.a.jwt")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn follow_then_unfollow_updates_both_accounts() {
    let (state, directory) = test_state();
    let app = build_router(state);

    let (status, body) = call(&app, "POST", "/api/users/bob/follow", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Followed successfully"}));

    let bob = directory
        .find(&Identity::new("bob"))
        .await
        .expect("find")
        .expect("bob");
    assert!(bob.followers.contains(&Identity::new("alice")));

    let (status, profile) = call(&app, "GET", "/api/users/bob", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["_id"], "bob");
    assert_eq!(profile["isFollowing"], true);
    assert_eq!(profile["isBlocked"], false);

    let (status, _) = call(&app, "POST", "/api/users/bob/unfollow", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);

    let alice = directory
        .find(&Identity::new("alice"))
        .await
        .expect("find")
        .expect("alice");
    assert!(alice.following.is_empty());
}

#[tokio::test]
async fn graph_rules_map_to_status_codes() {
    let (state, _) = test_state();
    let app = build_router(state);

    let (status, body) = call(&app, "POST", "/api/users/alice/follow", Some("alice")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot follow yourself");

    let (status, body) = call(&app, "POST", "/api/users/nobody/follow", Some("alice")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, body) = call(&app, "POST", "/api/users/bob/follow", Some("carol")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Cannot follow a user who has blocked you");
}

#[tokio::test]
async fn block_and_unblock() {
    let (state, directory) = test_state();
    let app = build_router(state);

    call(&app, "POST", "/api/users/bob/follow", Some("alice")).await;

    let (status, body) = call(&app, "POST", "/api/users/bob/block", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Blocked successfully");

    let alice = directory
        .find(&Identity::new("alice"))
        .await
        .expect("find")
        .expect("alice");
    assert!(alice.has_blocked(&Identity::new("bob")));
    assert!(!alice.is_following(&Identity::new("bob")));

    let (status, profile) = call(&app, "GET", "/api/users/bob", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["isBlocked"], true);

    let (status, body) = call(&app, "POST", "/api/users/bob/unblock", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Unblocked successfully");
}

#[tokio::test]
async fn online_listing_starts_empty() {
    let (state, _) = test_state();
    let app = build_router(state);

    let (status, body) = call(&app, "GET", "/api/presence/online", Some("alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"users": [], "count": 0}));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (state, _) = test_state();
    let app = build_router(state);

    let (status, _) = call(&app, "GET", "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

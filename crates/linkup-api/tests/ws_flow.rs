mod common;

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use linkup_api::AppState;
use linkup_api::app::serve;
use linkup_api::router::build_router;

use common::{test_config, test_state, test_state_with, token_for};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(serve(listener, state, std::future::pending()));
    addr
}

async fn connect(addr: SocketAddr, token: Option<&str>) -> Client {
    let url = match token {
        Some(token) => format!("ws://{addr}/ws?token={token}"),
        None => format!("ws://{addr}/ws"),
    };
    let (ws, _) = connect_async(url).await.expect("connect");
    ws
}

/// Connects as `id` and registers with `addUser`.
async fn join(addr: SocketAddr, id: &str) -> Client {
    let mut ws = connect(addr, Some(&token_for(id))).await;
    send(&mut ws, json!({"event": "addUser", "data": id})).await;
    ws
}

async fn send(ws: &mut Client, value: Value) {
    ws.send(Message::text(value.to_string())).await.expect("send");
}

async fn recv(ws: &mut Client) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("transport error");
        match msg {
            Message::Text(text) => return serde_json::from_str(text.as_str()).expect("json"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

async fn assert_silent(ws: &mut Client) {
    let next = timeout(Duration::from_millis(200), ws.next()).await;
    assert!(next.is_err(), "expected no frame, got {next:?}");
}

async fn expect_closed(ws: &mut Client) {
    loop {
        match timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for close")
        {
            Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
            Some(Ok(_)) => continue,
        }
    }
}

fn online(ids: &[&str]) -> Value {
    json!({"event": "getOnlineUsers", "data": ids})
}

#[tokio::test]
async fn call_then_callee_goes_offline() {
    let (state, _) = test_state();
    let addr = spawn_server(state).await;

    let mut a = join(addr, "alice").await;
    assert_eq!(recv(&mut a).await, online(&["alice"]));

    let mut b = join(addr, "bob").await;
    assert_eq!(recv(&mut a).await, online(&["alice", "bob"]));
    assert_eq!(recv(&mut b).await, online(&["alice", "bob"]));

    send(
        &mut a,
        json!({"event": "callUser", "data": {"to": "bob", "from": "alice", "offer": {"sdp": "o1"}}}),
    )
    .await;
    assert_eq!(
        recv(&mut b).await,
        json!({"event": "callUser", "data": {"from": "alice", "offer": {"sdp": "o1"}}})
    );
    assert_silent(&mut a).await;

    b.close(None).await.expect("close");
    assert_eq!(recv(&mut a).await, online(&["alice"]));

    send(
        &mut a,
        json!({"event": "callUser", "data": {"to": "bob", "from": "alice", "offer": {"sdp": "o2"}}}),
    )
    .await;
    assert_eq!(
        recv(&mut a).await,
        json!({"event": "callError", "data": {"message": "User is offline"}})
    );
}

#[tokio::test]
async fn answer_candidates_and_hangup_are_relayed() {
    let (state, _) = test_state();
    let addr = spawn_server(state).await;

    let mut a = join(addr, "alice").await;
    recv(&mut a).await;
    let mut b = join(addr, "bob").await;
    recv(&mut a).await;
    recv(&mut b).await;

    send(
        &mut b,
        json!({"event": "answerCall", "data": {"to": "alice", "answer": {"sdp": "a1"}}}),
    )
    .await;
    assert_eq!(
        recv(&mut a).await,
        json!({"event": "callAccepted", "data": {"answer": {"sdp": "a1"}}})
    );

    send(
        &mut a,
        json!({"event": "iceCandidate", "data": {"to": "bob", "candidate": {"c": 1}}}),
    )
    .await;
    assert_eq!(
        recv(&mut b).await,
        json!({"event": "iceCandidate", "data": {"candidate": {"c": 1}}})
    );

    send(&mut b, json!({"event": "endCall", "data": {"to": "alice"}})).await;
    assert_eq!(recv(&mut a).await, json!({"event": "callEnded"}));

    send(&mut a, json!({"event": "rejectCall", "data": {"to": "bob"}})).await;
    assert_eq!(recv(&mut b).await, json!({"event": "callRejected"}));
}

#[tokio::test]
async fn spoofed_caller_is_refused() {
    let (state, _) = test_state();
    let addr = spawn_server(state).await;

    let mut a = join(addr, "alice").await;
    recv(&mut a).await;
    let mut b = join(addr, "bob").await;
    recv(&mut a).await;
    recv(&mut b).await;

    send(
        &mut a,
        json!({"event": "callUser", "data": {"to": "bob", "from": "bob", "offer": {}}}),
    )
    .await;
    assert_eq!(
        recv(&mut a).await,
        json!({"event": "callError", "data": {"message": "Unauthorized caller"}})
    );
    assert_silent(&mut b).await;
}

#[tokio::test]
async fn blocked_and_unknown_callees() {
    let (state, _) = test_state();
    let addr = spawn_server(state).await;

    let mut c = join(addr, "carol").await;
    recv(&mut c).await;

    send(
        &mut c,
        json!({"event": "callUser", "data": {"to": "bob", "from": "carol", "offer": {}}}),
    )
    .await;
    assert_eq!(
        recv(&mut c).await,
        json!({"event": "callError", "data": {"message": "You are blocked by this user"}})
    );

    send(
        &mut c,
        json!({"event": "callUser", "data": {"to": "ghost", "from": "carol", "offer": {}}}),
    )
    .await;
    assert_eq!(
        recv(&mut c).await,
        json!({"event": "callError", "data": {"message": "User not found"}})
    );
}

#[tokio::test]
async fn missing_token_gets_auth_error_then_close() {
    let (state, _) = test_state();
    let addr = spawn_server(state).await;

    let mut ws = connect(addr, None).await;
    assert_eq!(
        recv(&mut ws).await,
        json!({"event": "authError", "data": {"message": "Authentication required"}})
    );
    expect_closed(&mut ws).await;
}

#[tokio::test]
async fn invalid_token_gets_auth_error_then_close() {
    let (state, _) = test_state();
    let addr = spawn_server(state.clone()).await;

    let mut ws = connect(addr, Some("garbage")).await;
    assert_eq!(
        recv(&mut ws).await,
        json!({"event": "authError", "data": {"message": "Invalid or expired token"}})
    );
    expect_closed(&mut ws).await;
    assert_eq!(state.realtime.presence.online_count().await, 0);
}

#[tokio::test]
async fn malformed_frames_keep_the_connection_open() {
    let (state, _) = test_state();
    let addr = spawn_server(state).await;

    let mut a = join(addr, "alice").await;
    recv(&mut a).await;

    a.send(Message::text("not json")).await.expect("send");
    send(&mut a, json!({"event": "danceParty", "data": 1})).await;
    assert_silent(&mut a).await;

    send(
        &mut a,
        json!({"event": "callUser", "data": {"to": "bob", "from": "alice", "offer": {}}}),
    )
    .await;
    assert_eq!(
        recv(&mut a).await,
        json!({"event": "callError", "data": {"message": "User is offline"}})
    );
}

#[tokio::test]
async fn follow_over_http_reaches_connected_clients() {
    let (state, _) = test_state();
    let addr = spawn_server(state.clone()).await;

    let mut b = join(addr, "bob").await;
    recv(&mut b).await;

    let response = build_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/bob/follow")
                .header("authorization", format!("Bearer {}", token_for("alice")))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert!(response.status().is_success());

    assert_eq!(
        recv(&mut b).await,
        json!({"event": "userFollowed", "data": {"followerId": "alice", "userId": "bob"}})
    );
    assert_eq!(
        recv(&mut b).await,
        json!({"event": "notification", "data": {
            "type": "follow",
            "message": "Alice followed you",
            "fromUserId": "alice"
        }})
    );
}

#[tokio::test]
async fn engine_shutdown_closes_live_connections() {
    let (state, _) = test_state();
    let addr = spawn_server(state.clone()).await;

    let mut a = join(addr, "alice").await;
    recv(&mut a).await;

    state.realtime.shutdown().await.expect("shutdown");
    expect_closed(&mut a).await;

    timeout(Duration::from_secs(2), async {
        while state.realtime.presence.online_count().await > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("presence cleared");
}

#[tokio::test]
async fn silent_client_is_dropped_after_heartbeat_timeout() {
    let mut config = test_config();
    config.realtime.ping_interval_seconds = 1;
    config.realtime.ping_timeout_seconds = 1;
    let (state, _) = test_state_with(config);
    let addr = spawn_server(state.clone()).await;

    // Never read, so the client never answers a ping.
    let _silent = join(addr, "alice").await;

    timeout(Duration::from_secs(2), async {
        while state.realtime.presence.online_count().await == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("alice registered");

    timeout(Duration::from_secs(5), async {
        while state.realtime.presence.online_count().await > 0
            || state.realtime.connections.connection_count() > 0
        {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("heartbeat timeout removed the connection");
}

//! WebSocket upgrade handler.
//!
//! The socket task owns the transport only: frames go in and out, pings are
//! scheduled here, and every protocol decision is made by the connection
//! session.

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use linkup_realtime::Handshake;

use crate::state::AppState;

/// Query parameters for the WebSocket handshake.
#[derive(Debug, Default, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token. Absence is reported in-band with `authError`.
    pub token: Option<String>,
}

/// GET /ws?token={jwt}
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(state, query.token, socket))
}

/// Drives an upgraded socket until any disconnect path fires.
async fn handle_socket(state: AppState, token: Option<String>, socket: WebSocket) {
    let engine = state.realtime.clone();
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (mut session, mut outbound) = match engine.connections.handshake(token).await {
        Handshake::Accepted { session, outbound } => (session, outbound),
        Handshake::Rejected { frames } => {
            for frame in frames {
                if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                    return;
                }
            }
            let _ = ws_tx.send(Message::Close(None)).await;
            return;
        }
    };

    let conn_id = session.id();
    info!(conn_id = %conn_id, "WebSocket connection established");

    let heartbeat = engine.heartbeat();
    let mut ping = tokio::time::interval(heartbeat.ping_interval);
    // The first tick completes immediately.
    ping.tick().await;
    let mut shutdown = engine.shutdown_receiver();

    loop {
        tokio::select! {
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Text(text))) => session.handle_text(text.as_str()).await,
                Some(Ok(Message::Pong(_))) => session.handle().record_pong().await,
                Some(Ok(Message::Close(_))) | None => {
                    debug!(conn_id = %conn_id, "Client closed connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket transport error");
                    break;
                }
            },
            frame = outbound.recv() => match frame {
                Some(frame) => {
                    if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            _ = ping.tick() => {
                let handle = session.handle();
                if !handle.is_alive() || heartbeat.is_expired(handle).await {
                    info!(conn_id = %conn_id, "WebSocket connection timed out");
                    break;
                }
                if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
            _ = shutdown.recv() => {
                debug!(conn_id = %conn_id, "Closing connection for shutdown");
                break;
            }
        }
    }

    session.close().await;
    let _ = ws_tx.send(Message::Close(None)).await;

    info!(conn_id = %conn_id, "WebSocket connection closed");
}

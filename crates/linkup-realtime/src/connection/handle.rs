//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use linkup_core::types::Identity;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A handle to a single authenticated WebSocket connection.
///
/// Holds the sender for pushing encoded frames to the client's writer,
/// plus the identity bound at handshake.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Identity verified at handshake; never re-checked
    pub identity: Identity,
    /// Sender for outbound frames
    sender: mpsc::Sender<String>,
    /// Last pong received
    last_pong: RwLock<DateTime<Utc>>,
    /// Whether the connection is still alive
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(identity: Identity, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            sender,
            last_pong: RwLock::new(Utc::now()),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue an encoded frame for this connection.
    ///
    /// Never waits: a full queue drops the frame, a closed queue marks the
    /// connection dead.
    pub fn send(&self, frame: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Record a pong response
    pub async fn record_pong(&self) {
        *self.last_pong.write().await = Utc::now();
    }

    /// Timestamp of the last pong (or of the connect).
    pub async fn last_pong(&self) -> DateTime<Utc> {
        *self.last_pong.read().await
    }
}

//! The process-wide set of online identities.
//!
//! An identity is online while at least one connection has registered as it.
//! Those connections form the identity's private room, the destination of
//! relayed call events and personal notifications.
//!
//! Every mutation runs under one async mutex and broadcasts the new
//! `getOnlineUsers` snapshot before releasing it, so clients observe
//! snapshots in mutation order. The snapshot goes out only when the set of
//! identities actually changed.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use linkup_core::types::Identity;

use crate::connection::handle::ConnectionId;
use crate::connection::pool::ConnectionPool;
use crate::message::serializer;
use crate::message::types::OutboundEvent;
use crate::metrics::EngineMetrics;

#[derive(Debug, Default)]
struct PresenceState {
    /// Online identities in first-registration order.
    order: Vec<Identity>,
    /// Identity → registered connections.
    rooms: HashMap<Identity, Vec<ConnectionId>>,
}

impl PresenceState {
    fn snapshot(&self) -> Vec<Identity> {
        self.order.clone()
    }

    fn drop_identity(&mut self, identity: &Identity) -> bool {
        self.rooms.remove(identity);
        let before = self.order.len();
        self.order.retain(|id| id != identity);
        self.order.len() < before
    }
}

/// Registry of online identities, shared by every connection.
#[derive(Debug)]
pub struct PresenceRegistry {
    state: Mutex<PresenceState>,
    /// Every accepted connection; target of snapshot broadcasts.
    pool: Arc<ConnectionPool>,
    metrics: Arc<EngineMetrics>,
}

impl PresenceRegistry {
    /// Creates an empty registry broadcasting through `pool`.
    pub fn new(pool: Arc<ConnectionPool>, metrics: Arc<EngineMetrics>) -> Self {
        Self {
            state: Mutex::new(PresenceState::default()),
            pool,
            metrics,
        }
    }

    /// Joins `conn` to `identity`'s room, putting `identity` online if absent.
    ///
    /// Returns `true` when the online set changed.
    pub async fn register(&self, identity: &Identity, conn: ConnectionId) -> bool {
        let mut state = self.state.lock().await;

        let room = state.rooms.entry(identity.clone()).or_default();
        if !room.contains(&conn) {
            room.push(conn);
        }

        if state.order.contains(identity) {
            debug!(identity = %identity, conn_id = %conn, "Already online");
            return false;
        }

        state.order.push(identity.clone());
        info!(identity = %identity, online = state.order.len(), "User online");
        self.broadcast_snapshot(&state);
        true
    }

    /// Takes `conn` out of `identity`'s room; `identity` goes offline when its
    /// room empties.
    ///
    /// Returns `true` when the online set changed.
    pub async fn release(&self, identity: &Identity, conn: ConnectionId) -> bool {
        let mut state = self.state.lock().await;

        let Some(room) = state.rooms.get_mut(identity) else {
            return false;
        };
        room.retain(|id| *id != conn);
        if !room.is_empty() {
            debug!(identity = %identity, remaining = room.len(), "Connection left room");
            return false;
        }

        let changed = state.drop_identity(identity);
        if changed {
            info!(identity = %identity, online = state.order.len(), "User offline");
            self.broadcast_snapshot(&state);
        }
        changed
    }

    /// Takes `identity` offline along with its whole room. No-op if absent.
    ///
    /// Returns `true` when the online set changed.
    pub async fn remove(&self, identity: &Identity) -> bool {
        let mut state = self.state.lock().await;
        let changed = state.drop_identity(identity);
        if changed {
            info!(identity = %identity, online = state.order.len(), "User removed");
            self.broadcast_snapshot(&state);
        }
        changed
    }

    /// Whether `identity` is online.
    pub async fn is_online(&self, identity: &Identity) -> bool {
        self.state.lock().await.order.contains(identity)
    }

    /// Current online identities in registration order.
    pub async fn online_users(&self) -> Vec<Identity> {
        self.state.lock().await.snapshot()
    }

    /// Number of online identities.
    pub async fn online_count(&self) -> usize {
        self.state.lock().await.order.len()
    }

    /// Connections in `identity`'s room.
    pub async fn connections_of(&self, identity: &Identity) -> Vec<ConnectionId> {
        self.state
            .lock()
            .await
            .rooms
            .get(identity)
            .cloned()
            .unwrap_or_default()
    }

    fn broadcast_snapshot(&self, state: &PresenceState) {
        let event = OutboundEvent::GetOnlineUsers(state.snapshot());
        match serializer::encode(&event) {
            Ok(frame) => {
                let delivered = self.pool.broadcast(&frame);
                self.metrics.broadcast_sent(delivered);
            }
            Err(e) => error!(error = %e, "Failed to encode online snapshot"),
        }
    }
}

//! Connection manager: handshake, per-connection sessions, effect application.
//!
//! The manager is the only component that applies relay effects, and so the
//! only caller of presence-registry mutations.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use linkup_core::config::RealtimeConfig;
use linkup_core::types::Identity;

use crate::message::serializer;
use crate::message::types::{ClientEvent, OutboundEvent};
use crate::message::validator;
use crate::metrics::EngineMetrics;
use crate::presence::PresenceRegistry;
use crate::signaling::{ConnectionState, Effect, SessionEvent, SignalingRelay};

use super::handle::{ConnectionHandle, ConnectionId};
use super::pool::ConnectionPool;

/// Outcome of a handshake.
#[derive(Debug)]
pub enum Handshake {
    /// The credential was valid.
    Accepted {
        /// The live session.
        session: ConnectionSession,
        /// Encoded frames to write to the client.
        outbound: mpsc::Receiver<String>,
    },
    /// The credential was missing or invalid; write `frames`, then close.
    Rejected {
        /// Encoded `authError` frames.
        frames: Vec<String>,
    },
}

/// Manages all WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: Arc<ConnectionPool>,
    /// Presence registry.
    presence: Arc<PresenceRegistry>,
    /// Signaling decisions.
    relay: SignalingRelay,
    /// Metrics.
    metrics: Arc<EngineMetrics>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        pool: Arc<ConnectionPool>,
        presence: Arc<PresenceRegistry>,
        relay: SignalingRelay,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            pool,
            presence,
            relay,
            metrics,
            config,
        }
    }

    /// Authenticates a new connection and, on success, adds it to the pool.
    pub async fn handshake(self: &Arc<Self>, credential: Option<String>) -> Handshake {
        let transition = self
            .relay
            .handle(
                &ConnectionState::Connecting,
                SessionEvent::Handshake { credential },
            )
            .await;

        let ConnectionState::Authenticated { identity } = &transition.state else {
            self.metrics.auth_failed();
            let frames = transition
                .effects
                .iter()
                .filter_map(|effect| match effect {
                    Effect::Reply(event) => encode(event),
                    _ => None,
                })
                .collect();
            return Handshake::Rejected { frames };
        };

        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(identity.clone(), tx));
        self.pool.add(handle.clone());
        self.metrics.connection_opened();

        info!(
            conn_id = %handle.id,
            identity = %identity,
            "WebSocket connection registered"
        );

        Handshake::Accepted {
            session: ConnectionSession {
                manager: self.clone(),
                handle,
                state: transition.state,
            },
            outbound: rx,
        }
    }

    /// Marks every connection dead; their transports close on next check.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            conn.mark_dead();
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    async fn apply(&self, origin: &ConnectionHandle, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Reply(event) => {
                    if matches!(event, OutboundEvent::CallError { .. }) {
                        self.metrics.event_rejected();
                    }
                    if let Some(frame) = encode(&event) {
                        origin.send(frame);
                    }
                }
                Effect::Forward { to, event } => self.forward(origin, &to, &event).await,
                Effect::Register(identity) => {
                    self.presence.register(&identity, origin.id).await;
                }
                Effect::Release(identity) => {
                    self.presence.release(&identity, origin.id).await;
                }
                Effect::Close => origin.mark_dead(),
            }
        }
    }

    async fn forward(&self, origin: &ConnectionHandle, to: &Identity, event: &OutboundEvent) {
        let room: Vec<ConnectionId> = self
            .presence
            .connections_of(to)
            .await
            .into_iter()
            .filter(|id| *id != origin.id)
            .collect();

        let Some(frame) = encode(event) else {
            return;
        };
        let delivered = self.pool.send_to(&room, &frame);
        self.metrics.event_relayed();
        debug!(
            conn_id = %origin.id,
            to = %to,
            event = event.name(),
            delivered,
            "Relayed"
        );
    }
}

/// One authenticated connection driven by its transport.
///
/// Events of one session are handled strictly in order: the transport awaits
/// each call before reading the next frame.
#[derive(Debug)]
pub struct ConnectionSession {
    manager: Arc<ConnectionManager>,
    handle: Arc<ConnectionHandle>,
    state: ConnectionState,
}

impl ConnectionSession {
    /// Connection ID.
    pub fn id(&self) -> ConnectionId {
        self.handle.id
    }

    /// The underlying handle.
    pub fn handle(&self) -> &Arc<ConnectionHandle> {
        &self.handle
    }

    /// Current state.
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Whether the session reached `Closed`.
    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    /// Processes one text frame. Invalid frames are logged and dropped.
    pub async fn handle_text(&mut self, raw: &str) {
        if let Err(e) = validator::validate_inbound(raw, self.manager.config.max_message_bytes) {
            warn!(conn_id = %self.handle.id, error = %e, "Frame rejected");
            self.manager.metrics.event_dropped();
            return;
        }

        match serializer::decode(raw) {
            Ok(event) => self.handle_event(event).await,
            Err(e) => {
                warn!(conn_id = %self.handle.id, error = %e, "Undecodable frame dropped");
                self.manager.metrics.event_dropped();
            }
        }
    }

    /// Processes one decoded client event.
    pub async fn handle_event(&mut self, event: ClientEvent) {
        let manager = &self.manager;
        manager.metrics.event_received();
        debug!(
            conn_id = %self.handle.id,
            state = self.state.name(),
            event = event.name(),
            "Client event"
        );

        let transition = manager
            .relay
            .handle(&self.state, SessionEvent::Inbound(event))
            .await;
        if transition.effects.is_empty() {
            manager.metrics.event_dropped();
        }
        manager.apply(&self.handle, transition.effects).await;
        self.state = transition.state;
    }

    /// Runs the disconnect transition and leaves the pool. Idempotent.
    pub async fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        let manager = &self.manager;

        let transition = manager
            .relay
            .handle(&self.state, SessionEvent::Disconnect)
            .await;
        manager.apply(&self.handle, transition.effects).await;
        self.state = transition.state;

        manager.pool.remove(&self.handle.id);
        self.handle.mark_dead();
        manager.metrics.connection_closed();

        info!(
            conn_id = %self.handle.id,
            identity = %self.handle.identity,
            "WebSocket connection unregistered"
        );
    }
}

fn encode(event: &OutboundEvent) -> Option<String> {
    serializer::encode(event)
        .inspect_err(|e| error!(event = event.name(), error = %e, "Failed to encode event"))
        .ok()
}

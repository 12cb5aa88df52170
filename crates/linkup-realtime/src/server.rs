//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use linkup_auth::jwt::JwtDecoder;
use linkup_core::config::RealtimeConfig;
use linkup_core::error::AppError;
use linkup_service::account::AccountDirectory;

use crate::bridge::EventBridge;
use crate::connection::authenticator::WsAuthenticator;
use crate::connection::heartbeat::HeartbeatConfig;
use crate::connection::manager::ConnectionManager;
use crate::connection::pool::ConnectionPool;
use crate::metrics::EngineMetrics;
use crate::presence::PresenceRegistry;
use crate::signaling::SignalingRelay;

/// Central real-time engine, constructed once at server start.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Presence registry.
    pub presence: Arc<PresenceRegistry>,
    /// Broadcast hooks for the CRUD collaborators.
    pub events: Arc<EventBridge>,
    /// Metrics collector.
    pub metrics: Arc<EngineMetrics>,
    /// Keepalive policy for transports.
    heartbeat: HeartbeatConfig,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(
        config: &RealtimeConfig,
        decoder: Arc<JwtDecoder>,
        directory: Arc<dyn AccountDirectory>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(EngineMetrics::new());
        let pool = Arc::new(ConnectionPool::new());
        let presence = Arc::new(PresenceRegistry::new(pool.clone(), metrics.clone()));
        let relay = SignalingRelay::new(
            presence.clone(),
            directory,
            WsAuthenticator::new(decoder),
        );
        let connections = Arc::new(ConnectionManager::new(
            config.clone(),
            pool.clone(),
            presence.clone(),
            relay,
            metrics.clone(),
        ));
        let events = Arc::new(EventBridge::new(pool, presence.clone(), metrics.clone()));

        info!("Real-time engine initialized");

        Self {
            connections,
            presence,
            events,
            metrics,
            heartbeat: HeartbeatConfig::from(config),
            shutdown_tx,
        }
    }

    /// Keepalive policy transports should follow.
    pub fn heartbeat(&self) -> HeartbeatConfig {
        self.heartbeat
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown of the real-time engine.
    ///
    /// Each transport sees the signal, runs its disconnect transition and
    /// closes.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down real-time engine");

        let _ = self.shutdown_tx.send(());
        self.connections.close_all();

        info!("Real-time engine shut down");
        Ok(())
    }
}

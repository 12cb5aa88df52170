//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Total connections accepted
    connections_total: AtomicU64,
    /// Connections currently open
    connections_active: AtomicU64,
    /// Handshakes refused
    auth_failures: AtomicU64,
    /// Client events decoded
    events_received: AtomicU64,
    /// Events forwarded to a peer
    events_relayed: AtomicU64,
    /// Events refused with a `callError`
    events_rejected: AtomicU64,
    /// Frames or events dropped without a reply
    events_dropped: AtomicU64,
    /// Frames delivered by broadcasts
    broadcasts_sent: AtomicU64,
}

impl EngineMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// A handshake succeeded.
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// An accepted connection closed.
    pub fn connection_closed(&self) {
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// A handshake was refused.
    pub fn auth_failed(&self) {
        self.auth_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// A client event was decoded.
    pub fn event_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    /// An event reached a peer.
    pub fn event_relayed(&self) {
        self.events_relayed.fetch_add(1, Ordering::Relaxed);
    }

    /// An event was refused with an error reply.
    pub fn event_rejected(&self) {
        self.events_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// A frame or event was dropped silently.
    pub fn event_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record frames delivered by one broadcast.
    pub fn broadcast_sent(&self, delivered: usize) {
        self.broadcasts_sent
            .fetch_add(delivered as u64, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            auth_failures: self.auth_failures.load(Ordering::Relaxed),
            events_received: self.events_received.load(Ordering::Relaxed),
            events_relayed: self.events_relayed.load(Ordering::Relaxed),
            events_rejected: self.events_rejected.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            broadcasts_sent: self.broadcasts_sent.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections accepted
    pub connections_total: u64,
    /// Connections currently open
    pub connections_active: u64,
    /// Handshakes refused
    pub auth_failures: u64,
    /// Client events decoded
    pub events_received: u64,
    /// Events forwarded to a peer
    pub events_relayed: u64,
    /// Events refused with a `callError`
    pub events_rejected: u64,
    /// Frames or events dropped without a reply
    pub events_dropped: u64,
    /// Frames delivered by broadcasts
    pub broadcasts_sent: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_never_underflows() {
        let metrics = EngineMetrics::new();
        metrics.connection_opened();
        metrics.connection_closed();
        metrics.connection_closed();
        let snap = metrics.snapshot();
        assert_eq!(snap.connections_total, 1);
        assert_eq!(snap.connections_active, 0);
    }
}

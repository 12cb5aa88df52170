//! Connection pool: every accepted connection, indexed by connection id.

use std::sync::Arc;

use dashmap::DashMap;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe pool of all accepted WebSocket connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle);
    }

    /// Removes a connection from the pool.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.remove(conn_id).map(|(_, handle)| handle)
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// Returns total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns all connection handles.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Sends a frame to the given connections; returns how many accepted it.
    pub fn send_to(&self, conn_ids: &[ConnectionId], frame: &str) -> usize {
        conn_ids
            .iter()
            .filter_map(|id| self.get(id))
            .filter(|handle| handle.send(frame.to_string()))
            .count()
    }

    /// Sends a frame to every connection; returns how many accepted it.
    pub fn broadcast(&self, frame: &str) -> usize {
        self.all_connections()
            .iter()
            .filter(|handle| handle.send(frame.to_string()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkup_core::types::Identity;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_send_to_skips_unknown_ids() {
        let pool = ConnectionPool::new();
        let (tx, mut rx) = mpsc::channel(4);
        let handle = Arc::new(ConnectionHandle::new(Identity::new("a"), tx));
        pool.add(handle.clone());

        let delivered = pool.send_to(&[handle.id, uuid::Uuid::new_v4()], "hi");
        assert_eq!(delivered, 1);
        assert_eq!(rx.recv().await.as_deref(), Some("hi"));

        assert_eq!(pool.broadcast("all"), 1);
        assert!(pool.remove(&handle.id).is_some());
        assert_eq!(pool.broadcast("none"), 0);
    }
}

//! Ping/pong keepalive policy.
//!
//! The transport sends a ping every `ping_interval` and asks
//! [`HeartbeatConfig::is_expired`] before each one; an expired connection
//! takes the normal disconnect path.

use std::time::Duration;

use chrono::Utc;

use linkup_core::config::RealtimeConfig;

use super::handle::ConnectionHandle;

/// Heartbeat configuration
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Silence after which the connection counts as gone
    pub ping_timeout: Duration,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: config.ping_interval(),
            ping_timeout: config.ping_timeout(),
        }
    }
}

impl HeartbeatConfig {
    /// Whether `handle` has been silent for longer than the timeout.
    pub async fn is_expired(&self, handle: &ConnectionHandle) -> bool {
        let elapsed = Utc::now() - handle.last_pong().await;
        match elapsed.to_std() {
            Ok(elapsed) if elapsed > self.ping_timeout => {
                tracing::warn!(
                    conn_id = %handle.id,
                    silent_for = ?elapsed,
                    "Heartbeat timeout"
                );
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkup_core::types::Identity;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_fresh_connection_not_expired() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(Identity::new("a"), tx);
        let config = HeartbeatConfig::from(&RealtimeConfig::default());
        assert!(!config.is_expired(&handle).await);

        let zero = HeartbeatConfig {
            ping_interval: Duration::from_millis(5),
            ping_timeout: Duration::ZERO,
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(zero.is_expired(&handle).await);
        handle.record_pong().await;
        let relaxed = HeartbeatConfig {
            ping_timeout: Duration::from_secs(60),
            ..zero
        };
        assert!(!relaxed.is_expired(&handle).await);
    }
}

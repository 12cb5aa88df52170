//! Response DTOs.

use serde::{Deserialize, Serialize};

use linkup_core::types::Identity;
use linkup_entity::account::Account;
use linkup_realtime::metrics::MetricsSnapshot;

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Account document plus the caller's relation to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// The account document.
    #[serde(flatten)]
    pub account: Account,
    /// Whether the caller follows this account.
    pub is_following: bool,
    /// Whether the caller has blocked this account.
    pub is_blocked: bool,
}

/// Online users snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineUsersResponse {
    /// Identities in first-registration order.
    pub users: Vec<Identity>,
    /// Number of online identities.
    pub count: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Online identities.
    pub online_users: usize,
    /// Realtime engine counters.
    pub metrics: MetricsSnapshot,
}

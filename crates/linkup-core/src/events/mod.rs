//! Domain events emitted by the social-graph and content collaborators.
//!
//! Events are handed to the real-time engine after a successful write and
//! fanned out to connected clients. Delivery is fire-and-forget.

pub mod social;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use social::SocialEvent;

/// Wrapper for domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: SocialEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(payload: SocialEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

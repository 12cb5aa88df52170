//! Domain event → client event mapping.
//!
//! Bridges events from the CRUD collaborators to every connected client.
//! Delivery is fire-and-forget: nothing is buffered for offline clients and
//! nothing is replayed on reconnect.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error};

use linkup_core::events::{DomainEvent, SocialEvent};
use linkup_core::types::Identity;

use crate::connection::pool::ConnectionPool;
use crate::message::serializer;
use crate::message::types::{Notification, OutboundEvent};
use crate::metrics::EngineMetrics;
use crate::presence::PresenceRegistry;

/// Bridges domain events into the realtime system.
#[derive(Debug)]
pub struct EventBridge {
    /// Every accepted connection
    pool: Arc<ConnectionPool>,
    /// Resolves private rooms
    presence: Arc<PresenceRegistry>,
    /// Metrics
    metrics: Arc<EngineMetrics>,
}

impl EventBridge {
    /// Create a new event bridge
    pub fn new(
        pool: Arc<ConnectionPool>,
        presence: Arc<PresenceRegistry>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            pool,
            presence,
            metrics,
        }
    }

    /// Route a domain event to the matching hook.
    pub async fn publish(&self, event: &DomainEvent) {
        debug!(event_id = %event.id, kind = event.payload.name(), "Publishing domain event");
        match &event.payload {
            SocialEvent::PostCreated { document } => self.on_post_created(document),
            SocialEvent::PostUpdated { document } => self.on_post_updated(document),
            SocialEvent::UserFollowed {
                follower,
                followee,
                follower_name,
            } => {
                self.on_user_followed(follower, followee, follower_name)
                    .await
            }
            SocialEvent::UserUnfollowed { follower, followee } => {
                self.on_user_unfollowed(follower, followee)
            }
            SocialEvent::UserBlocked { blocker, blocked } => self.on_user_blocked(blocker, blocked),
            SocialEvent::UserUnblocked { blocker, blocked } => {
                self.on_user_unblocked(blocker, blocked)
            }
            SocialEvent::StoryCreated { document } => self.on_story_created(document),
            SocialEvent::StoryDeleted { story_id, owner } => {
                self.on_story_deleted(story_id, owner)
            }
        }
    }

    /// `newPost` to everyone.
    pub fn on_post_created(&self, post: &impl Serialize) {
        if let Some(doc) = to_document(post) {
            self.broadcast(&OutboundEvent::NewPost(doc));
        }
    }

    /// `postUpdated` to everyone.
    pub fn on_post_updated(&self, post: &impl Serialize) {
        if let Some(doc) = to_document(post) {
            self.broadcast(&OutboundEvent::PostUpdated(doc));
        }
    }

    /// `userFollowed` to everyone, then a `notification` to the followee.
    pub async fn on_user_followed(
        &self,
        follower: &Identity,
        followee: &Identity,
        follower_name: &str,
    ) {
        self.broadcast(&OutboundEvent::UserFollowed {
            follower_id: follower.clone(),
            user_id: followee.clone(),
        });
        self.notify(
            followee,
            Notification {
                kind: "follow".to_string(),
                message: format!("{follower_name} followed you"),
                from_user_id: follower.clone(),
            },
        )
        .await;
    }

    /// `userUnfollowed` to everyone.
    pub fn on_user_unfollowed(&self, follower: &Identity, followee: &Identity) {
        self.broadcast(&OutboundEvent::UserUnfollowed {
            follower_id: follower.clone(),
            user_id: followee.clone(),
        });
    }

    /// `userBlocked` to everyone.
    pub fn on_user_blocked(&self, blocker: &Identity, blocked: &Identity) {
        self.broadcast(&OutboundEvent::UserBlocked {
            blocker_id: blocker.clone(),
            user_id: blocked.clone(),
        });
    }

    /// `userUnblocked` to everyone.
    pub fn on_user_unblocked(&self, blocker: &Identity, blocked: &Identity) {
        self.broadcast(&OutboundEvent::UserUnblocked {
            blocker_id: blocker.clone(),
            user_id: blocked.clone(),
        });
    }

    /// `newStory` to everyone.
    pub fn on_story_created(&self, story: &impl Serialize) {
        if let Some(doc) = to_document(story) {
            self.broadcast(&OutboundEvent::NewStory(doc));
        }
    }

    /// `deleteStory` to everyone.
    pub fn on_story_deleted(&self, story_id: &str, owner: &Identity) {
        self.broadcast(&OutboundEvent::DeleteStory {
            story_id: story_id.to_string(),
            user_id: owner.clone(),
        });
    }

    /// `notification` to `identity`'s private room. Dropped if offline.
    pub async fn notify(&self, identity: &Identity, notification: Notification) {
        let room = self.presence.connections_of(identity).await;
        if room.is_empty() {
            debug!(identity = %identity, "Notification target offline, dropped");
            return;
        }
        if let Some(frame) = encode(&OutboundEvent::Notification(notification)) {
            let delivered = self.pool.send_to(&room, &frame);
            self.metrics.broadcast_sent(delivered);
        }
    }

    fn broadcast(&self, event: &OutboundEvent) {
        if let Some(frame) = encode(event) {
            let delivered = self.pool.broadcast(&frame);
            debug!(event = event.name(), delivered, "Broadcast");
            self.metrics.broadcast_sent(delivered);
        }
    }
}

fn encode(event: &OutboundEvent) -> Option<String> {
    serializer::encode(event)
        .inspect_err(|e| error!(event = event.name(), error = %e, "Failed to encode broadcast"))
        .ok()
}

fn to_document(doc: &impl Serialize) -> Option<serde_json::Value> {
    serde_json::to_value(doc)
        .inspect_err(|e| error!(error = %e, "Failed to serialize document"))
        .ok()
}

//! Social-graph and content events.

use serde::{Deserialize, Serialize};

use crate::types::Identity;

/// Events produced by successful mutations in the CRUD collaborators.
///
/// Document-carrying variants hold the already-serialized document so this
/// crate stays independent of the entity definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SocialEvent {
    /// A post was created.
    PostCreated {
        /// The post document.
        document: serde_json::Value,
    },
    /// A post was liked, unliked or commented on.
    PostUpdated {
        /// The post document after the change.
        document: serde_json::Value,
    },
    /// `follower` started following `followee`.
    UserFollowed {
        /// Who followed.
        follower: Identity,
        /// Who was followed.
        followee: Identity,
        /// Display name of the follower, used in the notification text.
        follower_name: String,
    },
    /// `follower` stopped following `followee`.
    UserUnfollowed {
        /// Who unfollowed.
        follower: Identity,
        /// Who was unfollowed.
        followee: Identity,
    },
    /// `blocker` blocked `blocked`.
    UserBlocked {
        /// Who blocked.
        blocker: Identity,
        /// Who was blocked.
        blocked: Identity,
    },
    /// `blocker` unblocked `blocked`.
    UserUnblocked {
        /// Who unblocked.
        blocker: Identity,
        /// Who was unblocked.
        blocked: Identity,
    },
    /// A story was published.
    StoryCreated {
        /// The story document.
        document: serde_json::Value,
    },
    /// A story was removed.
    StoryDeleted {
        /// Story identifier.
        story_id: String,
        /// Owner of the story.
        owner: Identity,
    },
}

impl SocialEvent {
    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PostCreated { .. } => "post_created",
            Self::PostUpdated { .. } => "post_updated",
            Self::UserFollowed { .. } => "user_followed",
            Self::UserUnfollowed { .. } => "user_unfollowed",
            Self::UserBlocked { .. } => "user_blocked",
            Self::UserUnblocked { .. } => "user_unblocked",
            Self::StoryCreated { .. } => "story_created",
            Self::StoryDeleted { .. } => "story_deleted",
        }
    }
}

//! Inbound and outbound event definitions.
//!
//! Every frame is a JSON text frame `{"event": <name>, "data": <payload>}`.
//! Payload-less events omit `data`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use linkup_core::types::Identity;

/// Events sent by the client to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Self-registration into the presence registry.
    AddUser(Identity),
    /// Call offer.
    CallUser {
        /// Callee.
        to: Identity,
        /// Claimed caller; must equal the connection's identity.
        from: Identity,
        /// Opaque SDP offer.
        #[serde(default)]
        offer: Value,
    },
    /// Call answer.
    AnswerCall {
        /// Original caller.
        to: Identity,
        /// Opaque SDP answer.
        #[serde(default)]
        answer: Value,
    },
    /// ICE candidate exchange.
    IceCandidate {
        /// Peer.
        to: Identity,
        /// Opaque candidate.
        #[serde(default)]
        candidate: Value,
    },
    /// Hang up.
    EndCall {
        /// Peer.
        to: Identity,
    },
    /// Decline an incoming offer.
    RejectCall {
        /// Caller.
        to: Identity,
    },
}

impl ClientEvent {
    /// Wire name, used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddUser(_) => "addUser",
            Self::CallUser { .. } => "callUser",
            Self::AnswerCall { .. } => "answerCall",
            Self::IceCandidate { .. } => "iceCandidate",
            Self::EndCall { .. } => "endCall",
            Self::RejectCall { .. } => "rejectCall",
        }
    }
}

/// Events sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum OutboundEvent {
    /// Credential missing or rejected; the connection closes next.
    AuthError {
        /// Reason.
        message: String,
    },
    /// Full snapshot of online identities.
    GetOnlineUsers(Vec<Identity>),
    /// Incoming call offer.
    CallUser {
        /// Caller.
        from: Identity,
        /// Opaque SDP offer.
        offer: Value,
    },
    /// The callee answered.
    CallAccepted {
        /// Opaque SDP answer.
        answer: Value,
    },
    /// ICE candidate from the peer.
    IceCandidate {
        /// Opaque candidate.
        candidate: Value,
    },
    /// The peer hung up.
    CallEnded,
    /// The callee declined.
    CallRejected,
    /// A call event was refused.
    CallError {
        /// Reason.
        message: String,
    },
    /// A post was created.
    NewPost(Value),
    /// A post changed.
    PostUpdated(Value),
    /// `follower_id` followed `user_id`.
    UserFollowed {
        /// Follower.
        follower_id: Identity,
        /// Followee.
        user_id: Identity,
    },
    /// `follower_id` unfollowed `user_id`.
    UserUnfollowed {
        /// Former follower.
        follower_id: Identity,
        /// Former followee.
        user_id: Identity,
    },
    /// `blocker_id` blocked `user_id`.
    UserBlocked {
        /// Blocker.
        blocker_id: Identity,
        /// Blocked account.
        user_id: Identity,
    },
    /// `blocker_id` unblocked `user_id`.
    UserUnblocked {
        /// Former blocker.
        blocker_id: Identity,
        /// Unblocked account.
        user_id: Identity,
    },
    /// A story was published.
    NewStory(Value),
    /// A story was removed.
    DeleteStory {
        /// Story id.
        story_id: String,
        /// Owner.
        user_id: Identity,
    },
    /// Personal notification.
    Notification(Notification),
}

impl OutboundEvent {
    /// Wire name, used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthError { .. } => "authError",
            Self::GetOnlineUsers(_) => "getOnlineUsers",
            Self::CallUser { .. } => "callUser",
            Self::CallAccepted { .. } => "callAccepted",
            Self::IceCandidate { .. } => "iceCandidate",
            Self::CallEnded => "callEnded",
            Self::CallRejected => "callRejected",
            Self::CallError { .. } => "callError",
            Self::NewPost(_) => "newPost",
            Self::PostUpdated(_) => "postUpdated",
            Self::UserFollowed { .. } => "userFollowed",
            Self::UserUnfollowed { .. } => "userUnfollowed",
            Self::UserBlocked { .. } => "userBlocked",
            Self::UserUnblocked { .. } => "userUnblocked",
            Self::NewStory(_) => "newStory",
            Self::DeleteStory { .. } => "deleteStory",
            Self::Notification(_) => "notification",
        }
    }

    /// Shorthand for a `callError`.
    pub fn call_error(message: impl Into<String>) -> Self {
        Self::CallError {
            message: message.into(),
        }
    }

    /// Shorthand for an `authError`.
    pub fn auth_error(message: impl Into<String>) -> Self {
        Self::AuthError {
            message: message.into(),
        }
    }
}

/// Payload of a `notification` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Category, e.g. `follow`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable text.
    pub message: String,
    /// Who triggered it.
    pub from_user_id: Identity,
}

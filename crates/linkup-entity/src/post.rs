//! Post document pushed with `newPost` / `postUpdated`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use linkup_core::types::Identity;

/// Author summary embedded in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    /// Author identity.
    #[serde(rename = "_id")]
    pub id: Identity,
    /// Author display name.
    pub name: String,
    /// Author avatar URL.
    pub profile_image: String,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Commenter.
    pub user: Identity,
    /// Comment body.
    pub text: String,
    /// When the comment was written.
    pub created_at: DateTime<Utc>,
}

/// A post with its likes and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Caption text.
    pub caption: String,
    /// Hosted image URL.
    pub image_url: String,
    /// Author summary.
    pub user: PostAuthor,
    /// Identities that liked the post.
    #[serde(default)]
    pub likes: Vec<Identity>,
    /// Comments in posting order.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

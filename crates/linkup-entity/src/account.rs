//! Account document.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use linkup_core::types::Identity;

/// Placeholder avatar assigned to accounts without a profile image.
pub const DEFAULT_PROFILE_IMAGE: &str = "https://cdn-icons-png.flaticon.com/512/847/847969.png";

/// A registered account as seen by the relay and the social-graph routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account identity.
    #[serde(rename = "_id", alias = "id")]
    pub id: Identity,
    /// Display name.
    pub name: String,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Avatar URL.
    #[serde(default = "default_profile_image")]
    pub profile_image: String,
    /// Accounts following this one.
    #[serde(default)]
    pub followers: BTreeSet<Identity>,
    /// Accounts this one follows.
    #[serde(default)]
    pub following: BTreeSet<Identity>,
    /// Accounts this one has blocked.
    #[serde(default)]
    pub blocked_users: BTreeSet<Identity>,
}

impl Account {
    /// Create an account with empty relations.
    pub fn new(id: Identity, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            username: None,
            profile_image: default_profile_image(),
            followers: BTreeSet::new(),
            following: BTreeSet::new(),
            blocked_users: BTreeSet::new(),
        }
    }

    /// Whether this account has blocked `other`.
    pub fn has_blocked(&self, other: &Identity) -> bool {
        self.blocked_users.contains(other)
    }

    /// Whether this account follows `other`.
    pub fn is_following(&self, other: &Identity) -> bool {
        self.following.contains(other)
    }
}

fn default_profile_image() -> String {
    DEFAULT_PROFILE_IMAGE.to_string()
}

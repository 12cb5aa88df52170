//! Story document pushed with `newStory`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use linkup_core::types::Identity;

/// Hours a story stays visible.
pub const STORY_LIFETIME_HOURS: i64 = 24;

/// An ephemeral image or video story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Story identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Owner.
    pub user_id: Identity,
    /// Hosted media URL.
    pub url: String,
    /// MIME type, e.g. `image/jpeg` or `video/mp4`.
    pub file_type: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Story {
    /// Create a story published now.
    pub fn new(
        id: impl Into<String>,
        user_id: Identity,
        url: impl Into<String>,
        file_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id,
            url: url.into(),
            file_type: file_type.into(),
            created_at: Utc::now(),
        }
    }

    /// When the story stops being visible.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::hours(STORY_LIFETIME_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_after_a_day() {
        let story = Story::new("s1", Identity::new("u1"), "https://cdn/s1.mp4", "video/mp4");
        assert_eq!(story.expires_at() - story.created_at, Duration::hours(24));
        let json = serde_json::to_value(&story).expect("serialize");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["fileType"], "video/mp4");
    }
}

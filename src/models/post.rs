use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Comment;

/// Subtype payload. Regular posts and news share one collection and one
/// id space; the tag keeps the two shapes apart on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PostContent {
    Post {
        post_text: String,
        img_url: Option<String>,
    },
    News {
        news_title: String,
        news_description: String,
        news_url: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Denormalized like counter; `None` means never liked (counts as 0).
    pub likes: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub content: PostContent,
}

impl Post {
    pub fn new(user_id: Uuid, tags: Vec<String>, content: PostContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            tags,
            comments: Vec::new(),
            likes: None,
            created_at: now,
            updated_at: now,
            content,
        }
    }

    pub fn is_news(&self) -> bool {
        matches!(self.content, PostContent::News { .. })
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub avatar_url: String,
    /// Insertion-ordered set: an id appears at most once.
    #[serde(default)]
    pub liked_posts: Vec<Uuid>,
    /// Insertion-ordered set: an id appears at most once.
    #[serde(default)]
    pub liked_comments: Vec<Uuid>,
    #[serde(default)]
    pub followed_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, username: String, hashed_password: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            hashed_password,
            avatar_url: "/public/images/default-avatar.png".to_string(),
            liked_posts: Vec::new(),
            liked_comments: Vec::new(),
            followed_tags: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

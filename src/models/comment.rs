use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A comment embedded in its owning post; deleted together with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub comment_text: String,
    pub image_url: Option<String>,
    pub likes: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(user_id: Uuid, comment_text: String, image_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            comment_text,
            image_url,
            likes: None,
            created_at: Utc::now(),
        }
    }
}

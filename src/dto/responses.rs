use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Comment, Post, PostContent, User};

/// Populated author projection embedded in feed and comment responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// Feed projection of a post: author populated, comments left out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub user: UserSummary,
    pub tags: Vec<String>,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub content: PostContent,
}

impl PostView {
    pub fn new(post: Post, author: &User) -> Self {
        Self {
            id: post.id,
            user: author.into(),
            tags: post.tags,
            likes: post.likes.unwrap_or(0),
            created_at: post.created_at,
            updated_at: post.updated_at,
            content: post.content,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub user: UserSummary,
    pub comment_text: String,
    pub image_url: Option<String>,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, author: &User) -> Self {
        Self {
            id: comment.id,
            user: author.into(),
            comment_text: comment.comment_text,
            image_url: comment.image_url,
            likes: comment.likes.unwrap_or(0),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub ok: bool,
    pub message: String,
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub avatar_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarResponse {
    pub ok: bool,
    pub message: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub ok: bool,
    pub message: String,
    pub user: Option<UserSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPostResponse {
    pub ok: bool,
    pub message: String,
    pub post_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedNewsResponse {
    pub ok: bool,
    pub message: String,
    pub news_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedCommentResponse {
    pub ok: bool,
    pub message: String,
    pub added_comment: Option<CommentView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsResponse {
    pub ok: bool,
    pub message: String,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub ok: bool,
    pub message: String,
    pub likes: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub ok: bool,
    pub message: String,
    pub posts: Vec<PostView>,
    pub last_page: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub ok: bool,
    pub message: String,
    pub post: Option<PostView>,
}

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::feed::TagParam;

#[derive(Debug, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid e-mail."))]
    pub email: String,
    #[validate(length(min = 4, message = "Username must have min 4 characters."))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must have min 8 characters."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserRequest {
    #[validate(email(message = "Invalid e-mail."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must contain min 8 characters."))]
    pub password: String,
    /// Requested token lifetime in hours; default is one hour.
    pub expire: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAvatarRequest {
    /// Path produced by the upload middleware.
    #[validate(length(min = 1, message = "Avatar path must not be empty."))]
    pub avatar_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchUserByIdRequest {
    pub user_id: String,
}

#[derive(Debug, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 8, message = "Post must contain min 8 characters."))]
    pub post_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Path produced by the upload middleware, when an image was attached.
    pub img_url: Option<String>,
}

#[derive(Debug, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsRequest {
    #[validate(length(min = 1, message = "News title is required."))]
    pub news_title: String,
    #[validate(length(min = 1, message = "News description is required."))]
    pub news_description: String,
    #[validate(url(message = "News url must be a valid url."))]
    pub news_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: String,
    #[validate(length(min = 4, message = "Comment must contain min 4 characters."))]
    pub comment_text: String,
    pub image_url: Option<String>,
}

/// Shared by like-post, check-like-status, fetch-comments-by-post-id and
/// delete-post: a single id field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityIdRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeCommentRequest {
    pub id: String,
    pub post_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPostsByTagRequest {
    pub tag: TagParam,
    #[serde(default)]
    pub page: usize,
    /// The tag feed has no default subtype; absent is a bad request.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPopularPostsRequest {
    pub popular_time: DateTime<Utc>,
    #[serde(default)]
    pub page: usize,
    /// Absent means no subtype restriction.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPostByIdRequest {
    pub id: String,
    /// Absent means no subtype restriction.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPostsByUserRequest {
    pub id: String,
    #[serde(default)]
    pub page: usize,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchLikedPostsRequest {
    pub id: String,
    #[serde(default)]
    pub page: usize,
}

#[derive(Debug, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowTagRequest {
    #[validate(length(min = 1, message = "Tag must not be empty."))]
    pub tag: String,
}

use crate::{
    auth::authenticate,
    dto::{EntityIdRequest, LikeCommentRequest, LikeResponse, MessageResponse},
    errors::ApiError,
    likes::is_liked,
    routes::parse_id,
    states::AppState,
    store::StoreError,
};
use axum::{Json, extract::State, http::HeaderMap};
use tracing::info;

/// POST /comment/like-comment
/// Headers: Authorization: Bearer <token>
/// Body: { "id": "<comment id>", "postId": "<owning post id>" }
pub async fn like_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LikeCommentRequest>,
) -> Result<Json<LikeResponse>, ApiError> {
    let user = authenticate(&headers, &state)?;
    let comment_id = parse_id(&payload.id)?;
    let post_id = parse_id(&payload.post_id)?;

    let outcome = state
        .store
        .toggle_comment_like(user.id, post_id, comment_id)
        .map_err(|e| match e {
            StoreError::PostNotFound => ApiError::NotFound("Post"),
            StoreError::CommentNotFound => ApiError::NotFound("Comment"),
            StoreError::UserNotFound => ApiError::NotAuthorized,
            other => ApiError::Storage(format!("{other:?}")),
        })?;

    info!(
        "Comment {} {} by user {}",
        comment_id,
        outcome.action.as_message(),
        user.id
    );

    Ok(Json(LikeResponse {
        ok: true,
        message: outcome.action.as_message().to_string(),
        likes: outcome.new_count,
    }))
}

/// POST /comment/check-like-status
/// Headers: Authorization: Bearer <token>
/// Body: { "id": "<comment id>" }
pub async fn check_like_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<EntityIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = authenticate(&headers, &state)?;
    let comment_id = parse_id(&payload.id)?;

    let body = if is_liked(&user.liked_comments, comment_id) {
        MessageResponse {
            ok: true,
            message: "LIKED".to_string(),
        }
    } else {
        MessageResponse {
            ok: false,
            message: "NOT LIKED".to_string(),
        }
    };
    Ok(Json(body))
}

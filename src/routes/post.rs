use crate::{
    auth::authenticate,
    dto::{
        AddedCommentResponse, CommentView, CommentsResponse, CreateCommentRequest,
        CreateNewsRequest, CreatePostRequest, CreatedNewsResponse, CreatedPostResponse,
        EntityIdRequest, FeedResponse, FetchLikedPostsRequest, FetchPostByIdRequest,
        FetchPopularPostsRequest, FetchPostsByTagRequest, FetchPostsByUserRequest,
        FollowTagRequest, LikeResponse, MessageResponse, PostResponse, PostView,
    },
    errors::{ApiError, format_validation_errors},
    feed::{self, FeedKind, PostScope, compose_feed_query},
    likes::is_liked,
    models::{Comment, Post, PostContent},
    routes::{bad_request_feed, feed_response, parse_id},
    states::AppState,
    store::StoreError,
};
use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use tracing::info;
use validator::Validate;

/// POST /posts/create-post
/// Headers: Authorization: Bearer <token>
/// Body: { "postText": "...", "tags": ["rust"], "imgUrl": "/public/images/..." }
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<CreatedPostResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| format_validation_errors(&e))?;

    let user = authenticate(&headers, &state)?;

    let tags = payload.tags.iter().map(|tag| feed::hashtag(tag)).collect();
    let post = Post::new(
        user.id,
        tags,
        PostContent::Post {
            post_text: payload.post_text,
            img_url: payload.img_url,
        },
    );
    let post_id = post.id;
    state.store.insert_post(post);

    info!("Post created: {} by user {}", post_id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(CreatedPostResponse {
            ok: true,
            message: "Post created successfully.".to_string(),
            post_id,
        }),
    ))
}

/// POST /posts/create-news
/// Headers: Authorization: Bearer <token>
pub async fn create_news(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateNewsRequest>,
) -> Result<(StatusCode, Json<CreatedNewsResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| format_validation_errors(&e))?;

    let user = authenticate(&headers, &state)?;

    let tags = payload.tags.iter().map(|tag| feed::hashtag(tag)).collect();
    let news = Post::new(
        user.id,
        tags,
        PostContent::News {
            news_title: payload.news_title,
            news_description: payload.news_description,
            news_url: payload.news_url,
        },
    );
    let news_id = news.id;
    state.store.insert_post(news);

    info!("News created: {} by user {}", news_id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(CreatedNewsResponse {
            ok: true,
            message: "News created.".to_string(),
            news_id,
        }),
    ))
}

/// POST /posts/create-comment
/// Headers: Authorization: Bearer <token>
pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<AddedCommentResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| format_validation_errors(&e))?;

    let user = authenticate(&headers, &state)?;
    let post_id = parse_id(&payload.post_id)?;

    let comment = Comment::new(user.id, payload.comment_text, payload.image_url);
    let stored = state
        .store
        .add_comment(post_id, comment)
        .map_err(|_| ApiError::NotFound("Post"))?;

    Ok((
        StatusCode::CREATED,
        Json(AddedCommentResponse {
            ok: true,
            message: "Comment added.".to_string(),
            added_comment: Some(CommentView::new(stored, &user)),
        }),
    ))
}

/// POST /posts/fetch-comments-by-post-id
/// Body: { "id": "..." }
pub async fn fetch_comments_by_post_id(
    State(state): State<AppState>,
    Json(payload): Json<EntityIdRequest>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let post_id = parse_id(&payload.id)?;

    let Some(post) = state.store.post_by_id(post_id) else {
        return Ok(Json(CommentsResponse {
            ok: false,
            message: "Post not found.".to_string(),
            comments: Vec::new(),
        }));
    };

    let comments = post
        .comments
        .into_iter()
        .filter_map(|comment| {
            let author = state.store.user_by_id(comment.user_id)?;
            Some(CommentView::new(comment, &author))
        })
        .collect();

    Ok(Json(CommentsResponse {
        ok: true,
        message: "Comments found.".to_string(),
        comments,
    }))
}

/// POST /posts/like-post
/// Headers: Authorization: Bearer <token>
/// Body: { "id": "..." }
pub async fn like_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<EntityIdRequest>,
) -> Result<Json<LikeResponse>, ApiError> {
    let user = authenticate(&headers, &state)?;
    let post_id = parse_id(&payload.id)?;

    let outcome = state
        .store
        .toggle_post_like(user.id, post_id)
        .map_err(|e| match e {
            StoreError::PostNotFound => ApiError::NotFound("Post"),
            StoreError::UserNotFound => ApiError::NotAuthorized,
            other => ApiError::Storage(format!("{other:?}")),
        })?;

    info!("Post {} {} by user {}", post_id, outcome.action.as_message(), user.id);

    Ok(Json(LikeResponse {
        ok: true,
        message: outcome.action.as_message().to_string(),
        likes: outcome.new_count,
    }))
}

/// POST /posts/check-like-status
/// Headers: Authorization: Bearer <token>
pub async fn check_like_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<EntityIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = authenticate(&headers, &state)?;
    let post_id = parse_id(&payload.id)?;

    let body = if is_liked(&user.liked_posts, post_id) {
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

/// POST /posts/fetch-posts-by-tag
/// Body: { "tag": "rust" | ["rust", "axum"], "page": 0, "type": "posts" | "news" }
pub async fn fetch_posts_by_tag(
    State(state): State<AppState>,
    Json(payload): Json<FetchPostsByTagRequest>,
) -> (StatusCode, Json<FeedResponse>) {
    let Some(scope) = payload
        .kind
        .as_deref()
        .and_then(PostScope::from_kind)
    else {
        return bad_request_feed();
    };

    let query = compose_feed_query(
        FeedKind::Tag {
            tags: payload.tag,
            scope,
        },
        payload.page,
    );
    let (posts, total) = state.store.find_posts(&query);
    feed_response(&state, posts, payload.page, total)
}

/// POST /posts/fetch-popular-posts
/// Body: { "popularTime": "2026-08-18T00:00:00Z", "page": 0, "type": "post" | "news" }
pub async fn fetch_popular_posts(
    State(state): State<AppState>,
    Json(payload): Json<FetchPopularPostsRequest>,
) -> (StatusCode, Json<FeedResponse>) {
    let scope = match payload.kind.as_deref() {
        None => PostScope::Any,
        Some(kind) => match PostScope::from_kind(kind) {
            Some(scope) => scope,
            None => return bad_request_feed(),
        },
    };

    let query = compose_feed_query(
        FeedKind::PopularSince {
            since: payload.popular_time,
            scope,
        },
        payload.page,
    );
    let (posts, total) = state.store.find_posts(&query);
    feed_response(&state, posts, payload.page, total)
}

/// POST /posts/fetch-post-by-id
/// Body: { "id": "...", "type": "post" | "news" }
pub async fn fetch_post_by_id(
    State(state): State<AppState>,
    Json(payload): Json<FetchPostByIdRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let post_id = parse_id(&payload.id)?;
    // Absent `type` means no restriction; an unrecognized one is a 400.
    let scope = match payload.kind.as_deref() {
        None => PostScope::Any,
        Some(kind) => PostScope::from_kind(kind).ok_or(ApiError::BadRequest)?,
    };

    let post = state
        .store
        .post_by_id(post_id)
        .filter(|post| scope.matches(post))
        .and_then(|post| {
            let author = state.store.user_by_id(post.user_id)?;
            Some(PostView::new(post, &author))
        });

    let body = match post {
        Some(post) => PostResponse {
            ok: true,
            message: "Post found.".to_string(),
            post: Some(post),
        },
        None => PostResponse {
            ok: false,
            message: "Post not found.".to_string(),
            post: None,
        },
    };
    Ok(Json(body))
}

/// POST /posts/fetch-posts-by-user-id
/// Body: { "id": "...", "page": 0, "type": "news"? }
pub async fn fetch_posts_by_user_id(
    State(state): State<AppState>,
    Json(payload): Json<FetchPostsByUserRequest>,
) -> Result<(StatusCode, Json<FeedResponse>), ApiError> {
    let user_id = parse_id(&payload.id)?;
    // Anything that is not explicitly news falls back to regular posts.
    let scope = match payload.kind.as_deref() {
        Some("news") => PostScope::News,
        _ => PostScope::Posts,
    };

    let query = compose_feed_query(FeedKind::ByUser { user_id, scope }, payload.page);
    let (posts, total) = state.store.find_posts(&query);
    Ok(feed_response(&state, posts, payload.page, total))
}

/// POST /posts/fetch-liked-posts-by-user-id
/// Body: { "id": "...", "page": 0 }
pub async fn fetch_liked_posts_by_user_id(
    State(state): State<AppState>,
    Json(payload): Json<FetchLikedPostsRequest>,
) -> Result<(StatusCode, Json<FeedResponse>), ApiError> {
    let user_id = parse_id(&payload.id)?;

    match state.store.liked_posts_page(user_id, payload.page) {
        Ok((posts, total)) => Ok(feed_response(&state, posts, payload.page, total)),
        Err(_) => Ok((
            StatusCode::OK,
            Json(FeedResponse {
                ok: false,
                message: "User not found.".to_string(),
                posts: Vec::new(),
                last_page: true,
            }),
        )),
    }
}

/// POST /posts/follow-tag
/// Headers: Authorization: Bearer <token>
/// Body: { "tag": "rust" }
pub async fn follow_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<FollowTagRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| format_validation_errors(&e))?;

    let user = authenticate(&headers, &state)?;
    let followed = state
        .store
        .toggle_followed_tag(user.id, &payload.tag)
        .map_err(|_| ApiError::NotAuthorized)?;

    let hashtag = feed::hashtag(&payload.tag);
    let message = if followed {
        format!("Tag {hashtag} followed")
    } else {
        format!("Tag {hashtag} unfollowed")
    };
    Ok(Json(MessageResponse { ok: true, message }))
}

/// POST /posts/delete-post
/// Headers: Authorization: Bearer <token>
/// Body: { "id": "..." }
pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<EntityIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = authenticate(&headers, &state)?;
    let post_id = parse_id(&payload.id)?;

    let post = state
        .store
        .post_by_id(post_id)
        .ok_or(ApiError::NotFound("Post"))?;

    // Check ownership
    if post.user_id != user.id {
        return Err(ApiError::NotAuthorized);
    }

    state
        .store
        .delete_post(post_id)
        .map_err(|_| ApiError::NotFound("Post"))?;

    info!("Post deleted: {} by user {}", post_id, user.id);

    Ok(Json(MessageResponse {
        ok: true,
        message: "Post deleted.".to_string(),
    }))
}

//! End-to-end tests driving the router in-process.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use newsociality::{AppState, app};
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_app() -> Router {
    app(AppState::new("test-secret".to_string()))
}

async fn send(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Registers a user and returns (token, user id).
async fn register(app: &Router, email: &str, username: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "/auth/create-user",
        None,
        json!({
            "email": email,
            "username": username,
            "password": "password123"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    assert_eq!(body["ok"], json!(true));
    (
        body["token"].as_str().unwrap().to_string(),
        body["userId"].as_str().unwrap().to_string(),
    )
}

async fn create_post(app: &Router, token: &str, text: &str, tags: Value) -> String {
    let (status, body) = send(
        app,
        "/posts/create-post",
        Some(token),
        json!({ "postText": text, "tags": tags }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create-post failed: {body}");
    body["postId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn signup_login_and_credential_failures() {
    let app = test_app();
    let (_, _) = register(&app, "ada@example.com", "adalovelace").await;

    let (status, body) = send(
        &app,
        "/auth/login-user",
        None,
        json!({ "email": "ada@example.com", "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["username"], json!("adalovelace"));
    assert!(body["token"].as_str().is_some());
    assert!(body["avatarUrl"].as_str().is_some());

    let (status, body) = send(
        &app,
        "/auth/login-user",
        None,
        json!({ "email": "ada@example.com", "password": "wrongpassword" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["ok"], json!(false));

    // Duplicate registration
    let (status, body) = send(
        &app,
        "/auth/create-user",
        None,
        json!({
            "email": "ada@example.com",
            "username": "othername",
            "password": "password123"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], json!("E-mail is already registered."));
}

#[tokio::test]
async fn validation_messages_are_collected() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "/auth/create-user",
        None,
        json!({ "email": "not-an-email", "username": "abc", "password": "short" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["ok"], json!(false));

    let messages: Vec<&str> = body["message"]
        .as_array()
        .expect("message should be a list")
        .iter()
        .map(|m| m.as_str().unwrap())
        .collect();
    assert_eq!(messages.len(), 3);
    assert!(messages.contains(&"Invalid e-mail."));
    assert!(messages.contains(&"Username must have min 4 characters."));
    assert!(messages.contains(&"Password must have min 8 characters."));
}

#[tokio::test]
async fn protected_routes_reject_missing_or_bad_tokens() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "/posts/create-post",
        None,
        json!({ "postText": "long enough text", "tags": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!("Not authenticated."));

    let (status, _) = send(
        &app,
        "/posts/create-post",
        Some("garbage.token.here"),
        json!({ "postText": "long enough text", "tags": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn valid_token_for_unknown_user_is_not_authorized() {
    // Same signing secret, different store: the token verifies but the
    // user it names does not exist.
    let app_a = test_app();
    let app_b = test_app();
    let (token, _) = register(&app_a, "ghost@example.com", "ghostuser").await;

    let (status, body) = send(
        &app_b,
        "/posts/create-post",
        Some(&token),
        json!({ "postText": "long enough text", "tags": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!("Not authorized."));
}

#[tokio::test]
async fn tag_feed_accepts_single_tag_and_list() {
    let app = test_app();
    let (token, _) = register(&app, "tagger@example.com", "tagger").await;
    create_post(&app, &token, "a post about rust things", json!(["rust"])).await;

    let (status, body) = send(
        &app,
        "/posts/fetch-posts-by-tag",
        None,
        json!({ "tag": "rust", "type": "posts" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["lastPage"], json!(true));
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["user"]["username"], json!("tagger"));
    assert_eq!(posts[0]["tags"], json!(["#rust"]));
    assert_eq!(posts[0]["kind"], json!("post"));

    // List form matches the union
    let (status, body) = send(
        &app,
        "/posts/fetch-posts-by-tag",
        None,
        json!({ "tag": ["rust", "unused"], "type": "posts" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);

    // Same tag scoped to news is an expected miss
    let (status, body) = send(
        &app,
        "/posts/fetch-posts-by-tag",
        None,
        json!({ "tag": "rust", "type": "news" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(false));
    assert!(body["posts"].as_array().unwrap().is_empty());
    assert_eq!(body["lastPage"], json!(true));

    // Unknown type is a bad request
    let (status, _) = send(
        &app,
        "/posts/fetch-posts-by-tag",
        None,
        json!({ "tag": "rust", "type": "everything" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // So is a missing type, with the same feed-shaped JSON body
    let (status, body) = send(
        &app,
        "/posts/fetch-posts-by-tag",
        None,
        json!({ "tag": "rust" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["message"], json!("Bad request"));
    assert!(body["posts"].as_array().unwrap().is_empty());
    assert_eq!(body["lastPage"], json!(true));
}

#[tokio::test]
async fn like_toggle_round_trip() {
    let app = test_app();
    let (token, _) = register(&app, "liker@example.com", "somebody").await;
    let post_id = create_post(&app, &token, "a likeable piece of text", json!([])).await;

    let (status, body) = send(
        &app,
        "/posts/like-post",
        Some(&token),
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("LIKED"));
    assert_eq!(body["likes"], json!(1));

    let (_, body) = send(
        &app,
        "/posts/check-like-status",
        Some(&token),
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["message"], json!("LIKED"));

    let (_, body) = send(
        &app,
        "/posts/like-post",
        Some(&token),
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(body["message"], json!("DISLIKED"));
    assert_eq!(body["likes"], json!(0));

    let (_, body) = send(
        &app,
        "/posts/check-like-status",
        Some(&token),
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["message"], json!("NOT LIKED"));

    // Liking something that is gone is a 404
    let (status, _) = send(
        &app,
        "/posts/like-post",
        Some(&token),
        json!({ "id": uuid::Uuid::new_v4().to_string() }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_flow_with_likes() {
    let app = test_app();
    let (token, _) = register(&app, "commenter@example.com", "commenter").await;
    let post_id = create_post(&app, &token, "a post worth commenting", json!([])).await;

    let (status, body) = send(
        &app,
        "/posts/create-comment",
        Some(&token),
        json!({ "postId": post_id, "commentText": "well said" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment_id = body["addedComment"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["addedComment"]["user"]["username"], json!("commenter"));

    let (_, body) = send(
        &app,
        "/posts/fetch-comments-by-post-id",
        None,
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);

    let (_, body) = send(
        &app,
        "/comment/like-comment",
        Some(&token),
        json!({ "id": comment_id, "postId": post_id }),
    )
    .await;
    assert_eq!(body["message"], json!("LIKED"));
    assert_eq!(body["likes"], json!(1));

    let (_, body) = send(
        &app,
        "/comment/check-like-status",
        Some(&token),
        json!({ "id": comment_id }),
    )
    .await;
    assert_eq!(body["message"], json!("LIKED"));

    let (_, body) = send(
        &app,
        "/comment/like-comment",
        Some(&token),
        json!({ "id": comment_id, "postId": post_id }),
    )
    .await;
    assert_eq!(body["message"], json!("DISLIKED"));
    assert_eq!(body["likes"], json!(0));
}

#[tokio::test]
async fn popular_feed_separates_news_from_posts() {
    let app = test_app();
    let (token, _) = register(&app, "editor@example.com", "newseditor").await;
    create_post(&app, &token, "a regular post with text", json!([])).await;

    let (status, body) = send(
        &app,
        "/posts/create-news",
        Some(&token),
        json!({
            "newsTitle": "Big Headline",
            "newsDescription": "Something happened",
            "newsUrl": "https://news.example.com/article",
            "tags": ["breaking"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create-news failed: {body}");
    assert!(body["newsId"].as_str().is_some());

    let since = json!("2000-01-01T00:00:00Z");
    let (_, body) = send(
        &app,
        "/posts/fetch-popular-posts",
        None,
        json!({ "popularTime": since, "type": "news" }),
    )
    .await;
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["kind"], json!("news"));
    assert_eq!(posts[0]["newsTitle"], json!("Big Headline"));

    let (_, body) = send(
        &app,
        "/posts/fetch-popular-posts",
        None,
        json!({ "popularTime": since, "type": "post" }),
    )
    .await;
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["kind"], json!("post"));
}

#[tokio::test]
async fn fetch_post_by_id_conventions() {
    let app = test_app();
    let (token, _) = register(&app, "reader@example.com", "postreader").await;
    let post_id = create_post(&app, &token, "text for fetching by id", json!([])).await;

    let (status, body) = send(
        &app,
        "/posts/fetch-post-by-id",
        None,
        json!({ "id": post_id, "type": "post" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["post"]["id"], json!(post_id));

    // Malformed id is a 400
    let (status, _) = send(
        &app,
        "/posts/fetch-post-by-id",
        None,
        json!({ "id": "not-a-uuid", "type": "post" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown id is an expected miss: 200 with ok false
    let (status, body) = send(
        &app,
        "/posts/fetch-post-by-id",
        None,
        json!({ "id": uuid::Uuid::new_v4().to_string(), "type": "post" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(false));
    assert!(body["post"].is_null());

    // Absent type means no subtype restriction
    let (status, body) = send(
        &app,
        "/posts/fetch-post-by-id",
        None,
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));

    // An unrecognized type is a 400
    let (status, body) = send(
        &app,
        "/posts/fetch-post-by-id",
        None,
        json!({ "id": post_id, "type": "everything" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], json!(false));
}

#[tokio::test]
async fn liked_feed_follows_toggles_and_deletions() {
    let app = test_app();
    let (token, user_id) = register(&app, "fan@example.com", "biggestfan").await;
    let post_id = create_post(&app, &token, "text that will be liked", json!([])).await;

    send(&app, "/posts/like-post", Some(&token), json!({ "id": post_id })).await;

    let (_, body) = send(
        &app,
        "/posts/fetch-liked-posts-by-user-id",
        None,
        json!({ "id": user_id }),
    )
    .await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);

    // Deleted posts disappear from the liked feed without erroring
    let (status, _) = send(
        &app,
        "/posts/delete-post",
        Some(&token),
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "/posts/fetch-liked-posts-by-user-id",
        None,
        json!({ "id": user_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(false));
    assert!(body["posts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_post_requires_ownership() {
    let app = test_app();
    let (owner_token, _) = register(&app, "owner@example.com", "theowner").await;
    let (other_token, _) = register(&app, "other@example.com", "theother").await;
    let post_id = create_post(&app, &owner_token, "text belonging to owner", json!([])).await;

    let (status, _) = send(
        &app,
        "/posts/delete-post",
        Some(&other_token),
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "/posts/delete-post",
        Some(&owner_token),
        json!({ "id": post_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn follow_tag_toggles_with_messages() {
    let app = test_app();
    let (token, _) = register(&app, "follower@example.com", "tagfollower").await;

    let (_, body) = send(
        &app,
        "/posts/follow-tag",
        Some(&token),
        json!({ "tag": "rust" }),
    )
    .await;
    assert_eq!(body["message"], json!("Tag #rust followed"));

    let (_, body) = send(
        &app,
        "/posts/follow-tag",
        Some(&token),
        json!({ "tag": "rust" }),
    )
    .await;
    assert_eq!(body["message"], json!("Tag #rust unfollowed"));
}

#[tokio::test]
async fn change_avatar_returns_the_new_path() {
    let app = test_app();
    let (token, user_id) = register(&app, "avatar@example.com", "avatarfan").await;

    let (status, body) = send(
        &app,
        "/auth/change-avatar",
        Some(&token),
        json!({ "avatarUrl": "/public/images/new-avatar.png" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], json!("/public/images/new-avatar.png"));

    let (_, body) = send(
        &app,
        "/auth/fetch-user-by-id",
        None,
        json!({ "userId": user_id }),
    )
    .await;
    assert_eq!(body["user"]["avatarUrl"], json!("/public/images/new-avatar.png"));
}

#[tokio::test]
async fn feeds_paginate_at_forty() {
    let app = test_app();
    let (token, user_id) = register(&app, "prolific@example.com", "prolificposter").await;
    for i in 0..41 {
        create_post(&app, &token, &format!("post number {i} with padding"), json!([])).await;
    }

    let (_, body) = send(
        &app,
        "/posts/fetch-posts-by-user-id",
        None,
        json!({ "id": user_id, "page": 0 }),
    )
    .await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 40);
    assert_eq!(body["lastPage"], json!(false));

    let (_, body) = send(
        &app,
        "/posts/fetch-posts-by-user-id",
        None,
        json!({ "id": user_id, "page": 1 }),
    )
    .await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(body["lastPage"], json!(true));

    // A page past the data is an empty last page, not an error
    let (status, body) = send(
        &app,
        "/posts/fetch-posts-by-user-id",
        None,
        json!({ "id": user_id, "page": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastPage"], json!(true));

    // Even an absurdly large page index answers cleanly
    let (status, body) = send(
        &app,
        "/posts/fetch-posts-by-user-id",
        None,
        json!({ "id": user_id, "page": u64::MAX }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["lastPage"], json!(true));
}

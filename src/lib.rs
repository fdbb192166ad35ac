pub mod auth;
pub mod config;
pub mod dto;
pub mod errors;
pub mod feed;
pub mod likes;
pub mod models;
pub mod pagination;
pub mod rate_limit;
pub mod routes;
pub mod states;
pub mod store;

pub use states::AppState;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the full application router. Kept separate from `main` so the
/// integration tests can drive it in-process.
pub fn app(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Credential endpoints get their own per-IP rate limit
    let credential_routes = Router::new()
        .route("/auth/create-user", post(routes::user::create_user))
        .route("/auth/login-user", post(routes::user::login_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_credentials,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(credential_routes)
        // User routes
        .route("/auth/change-avatar", post(routes::user::change_avatar))
        .route("/auth/fetch-user-by-id", post(routes::user::fetch_user_by_id))
        // Post routes
        .route("/posts/create-post", post(routes::post::create_post))
        .route("/posts/create-news", post(routes::post::create_news))
        .route("/posts/create-comment", post(routes::post::create_comment))
        .route(
            "/posts/fetch-comments-by-post-id",
            post(routes::post::fetch_comments_by_post_id),
        )
        .route("/posts/like-post", post(routes::post::like_post))
        .route(
            "/posts/check-like-status",
            post(routes::post::check_like_status),
        )
        .route(
            "/posts/fetch-posts-by-tag",
            post(routes::post::fetch_posts_by_tag),
        )
        .route(
            "/posts/fetch-popular-posts",
            post(routes::post::fetch_popular_posts),
        )
        .route(
            "/posts/fetch-post-by-id",
            post(routes::post::fetch_post_by_id),
        )
        .route(
            "/posts/fetch-posts-by-user-id",
            post(routes::post::fetch_posts_by_user_id),
        )
        .route(
            "/posts/fetch-liked-posts-by-user-id",
            post(routes::post::fetch_liked_posts_by_user_id),
        )
        .route("/posts/follow-tag", post(routes::post::follow_tag))
        .route("/posts/delete-post", post(routes::post::delete_post))
        // Comment routes
        .route("/comment/like-comment", post(routes::comment::like_comment))
        .route(
            "/comment/check-like-status",
            post(routes::comment::check_like_status),
        )
        // Add state and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(GlobalConcurrencyLimitLayer::new(256))
}

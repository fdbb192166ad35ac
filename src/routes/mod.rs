pub mod comment;
pub mod health;
pub mod post;
pub mod user;

use axum::Json;
use axum::http::StatusCode;
use uuid::Uuid;

use crate::dto::{FeedResponse, PostView};
use crate::errors::ApiError;
use crate::feed::PAGE_SIZE;
use crate::models::Post;
use crate::pagination::is_last_page;
use crate::states::AppState;

/// Request ids arrive as strings; anything that is not a UUID is a 400.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadIdentifier)
}

/// Populates the author summary on each post. Posts whose author no
/// longer resolves are silently dropped from the feed.
pub(crate) fn populate_posts(state: &AppState, posts: Vec<Post>) -> Vec<PostView> {
    posts
        .into_iter()
        .filter_map(|post| {
            let author = state.store.user_by_id(post.user_id)?;
            Some(PostView::new(post, &author))
        })
        .collect()
}

/// Uniform feed answer: an empty window is an expected miss (200 with
/// `ok: false`), never a 404. `ok` and `last_page` reflect the matched
/// window and total, not how many authors still resolve during populate.
pub(crate) fn feed_response(
    state: &AppState,
    posts: Vec<Post>,
    page: usize,
    total: usize,
) -> (StatusCode, Json<FeedResponse>) {
    let found = !posts.is_empty();
    let last_page = is_last_page(page, total, PAGE_SIZE);
    let posts = populate_posts(state, posts);
    let body = if found {
        FeedResponse {
            ok: true,
            message: "Posts found.".to_string(),
            posts,
            last_page,
        }
    } else {
        FeedResponse {
            ok: false,
            message: "No posts found.".to_string(),
            posts,
            last_page,
        }
    };
    (StatusCode::OK, Json(body))
}

/// 400 answer for feed requests with a missing or unrecognized `type`.
pub(crate) fn bad_request_feed() -> (StatusCode, Json<FeedResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(FeedResponse {
            ok: false,
            message: "Bad request".to_string(),
            posts: Vec::new(),
            last_page: true,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostContent;

    fn orphan_post() -> Post {
        Post::new(
            Uuid::new_v4(),
            Vec::new(),
            PostContent::Post {
                post_text: "text whose author is gone".to_string(),
                img_url: None,
            },
        )
    }

    #[test]
    fn last_page_stays_honest_when_authors_are_gone() {
        let state = AppState::new("test-secret".to_string());
        let window: Vec<Post> = (0..PAGE_SIZE).map(|_| orphan_post()).collect();

        // Two more full pages exist beyond this window; every post in
        // the window loses its author during populate.
        let (status, Json(body)) = feed_response(&state, window, 0, PAGE_SIZE * 3);
        assert_eq!(status, StatusCode::OK);
        assert!(body.posts.is_empty());
        assert!(body.ok);
        assert!(!body.last_page);
    }

    #[test]
    fn empty_window_is_a_miss_and_last() {
        let state = AppState::new("test-secret".to_string());
        let (status, Json(body)) = feed_response(&state, Vec::new(), 5, 0);
        assert_eq!(status, StatusCode::OK);
        assert!(!body.ok);
        assert!(body.last_page);
    }
}

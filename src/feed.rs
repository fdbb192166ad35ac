//! Feed query composition: turns request parameters into the filter,
//! sort and window the store executes.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::Post;

/// Fixed window for every paged feed.
pub const PAGE_SIZE: usize = 40;

/// Subtype restriction. `Posts` matches the legacy rule: anything that is
/// not explicitly news counts as a regular post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    Posts,
    News,
    Any,
}

impl PostScope {
    /// Maps the request `type` field; unknown values are rejected upstream.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "posts" | "post" => Some(Self::Posts),
            "news" => Some(Self::News),
            _ => None,
        }
    }

    pub fn matches(self, post: &Post) -> bool {
        match self {
            Self::Posts => !post.is_news(),
            Self::News => post.is_news(),
            Self::Any => true,
        }
    }
}

/// The tag parameter arrives either as a single string or as a list; the
/// list form matches the union of its tags.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagParam {
    One(String),
    Many(Vec<String>),
}

impl TagParam {
    /// Normalizes to the stored `#tag` form.
    pub fn hashtags(&self) -> Vec<String> {
        match self {
            Self::One(tag) => vec![hashtag(tag)],
            Self::Many(tags) => tags.iter().map(|tag| hashtag(tag)).collect(),
        }
    }
}

/// Tags are stored and queried with a leading marker.
pub fn hashtag(tag: &str) -> String {
    if tag.starts_with('#') {
        tag.to_string()
    } else {
        format!("#{tag}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedFilter {
    /// Tag-set intersection with the requested tags.
    TagsAny { tags: Vec<String>, scope: PostScope },
    /// Created at or after the given instant.
    CreatedSince { since: DateTime<Utc>, scope: PostScope },
    /// Authored by the given user.
    ByAuthor { user_id: Uuid, scope: PostScope },
}

impl FeedFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Self::TagsAny { tags, scope } => {
                scope.matches(post) && post.tags.iter().any(|tag| tags.contains(tag))
            }
            Self::CreatedSince { since, scope } => {
                scope.matches(post) && post.created_at >= *since
            }
            Self::ByAuthor { user_id, scope } => scope.matches(post) && post.user_id == *user_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    MostLiked,
}

/// A composed query the store can execute directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub filter: FeedFilter,
    pub sort: SortOrder,
    pub skip: usize,
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub enum FeedKind {
    Tag { tags: TagParam, scope: PostScope },
    PopularSince { since: DateTime<Utc>, scope: PostScope },
    ByUser { user_id: Uuid, scope: PostScope },
}

pub fn compose_feed_query(kind: FeedKind, page: usize) -> FeedQuery {
    let (filter, sort) = match kind {
        FeedKind::Tag { tags, scope } => (
            FeedFilter::TagsAny {
                tags: tags.hashtags(),
                scope,
            },
            SortOrder::NewestFirst,
        ),
        FeedKind::PopularSince { since, scope } => (
            FeedFilter::CreatedSince { since, scope },
            SortOrder::MostLiked,
        ),
        FeedKind::ByUser { user_id, scope } => (
            FeedFilter::ByAuthor { user_id, scope },
            SortOrder::NewestFirst,
        ),
    };
    FeedQuery {
        filter,
        sort,
        skip: page.saturating_mul(PAGE_SIZE),
        limit: PAGE_SIZE,
    }
}

/// The liked-by-user feed is not a direct query: the window is sliced out
/// of the user's liked-id list, then each id is resolved individually.
pub fn liked_window(liked_ids: &[Uuid], page: usize) -> &[Uuid] {
    let start = page.saturating_mul(PAGE_SIZE).min(liked_ids.len());
    let end = start.saturating_add(PAGE_SIZE).min(liked_ids.len());
    &liked_ids[start..end]
}

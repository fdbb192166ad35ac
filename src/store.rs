//! In-process document store backed by `DashMap`.
//!
//! The like toggles are dual writes: the entity counter and the user's
//! liked-id list must change together. Both entries are locked for the
//! whole toggle, always in the same order (users before posts), so
//! concurrent toggles on the same (user, entity) pair serialize instead
//! of racing.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::feed::{self, FeedQuery, SortOrder};
use crate::likes::{ToggleOutcome, toggle_like};
use crate::models::{Comment, Post, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    UserNotFound,
    PostNotFound,
    CommentNotFound,
    EmailTaken,
    UsernameTaken,
}

#[derive(Default)]
pub struct Store {
    users: DashMap<Uuid, User>,
    posts: DashMap<Uuid, Post>,
    email_index: DashMap<String, Uuid>,    // Quick lookup by email
    username_index: DashMap<String, Uuid>, // Uniqueness check on signup
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Inserts a new user, claiming both uniqueness indexes. If the
    /// username turns out to be taken after the email was claimed, the
    /// email claim is released again so no half-registered entry remains.
    pub fn insert_user(&self, user: User) -> Result<(), StoreError> {
        match self.email_index.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(StoreError::EmailTaken),
            Entry::Vacant(entry) => {
                entry.insert(user.id);
            }
        }
        match self.username_index.entry(user.username.clone()) {
            Entry::Occupied(_) => {
                self.email_index.remove(&user.email);
                return Err(StoreError::UsernameTaken);
            }
            Entry::Vacant(entry) => {
                entry.insert(user.id);
            }
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    pub fn user_by_id(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|user| user.clone())
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let id = *self.email_index.get(email)?;
        self.user_by_id(id)
    }

    /// Applies a mutation to the user under its entry lock.
    pub fn update_user<R>(
        &self,
        id: Uuid,
        update: impl FnOnce(&mut User) -> R,
    ) -> Result<R, StoreError> {
        let mut user = self.users.get_mut(&id).ok_or(StoreError::UserNotFound)?;
        Ok(update(&mut user))
    }

    // ------------------------------------------------------------------
    // Posts
    // ------------------------------------------------------------------

    pub fn insert_post(&self, post: Post) {
        self.posts.insert(post.id, post);
    }

    pub fn post_by_id(&self, id: Uuid) -> Option<Post> {
        self.posts.get(&id).map(|post| post.clone())
    }

    /// Deletes a post; its embedded comments go with it.
    pub fn delete_post(&self, id: Uuid) -> Result<(), StoreError> {
        self.posts
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::PostNotFound)
    }

    /// Appends a comment to its post and returns the stored copy.
    pub fn add_comment(&self, post_id: Uuid, comment: Comment) -> Result<Comment, StoreError> {
        let mut post = self
            .posts
            .get_mut(&post_id)
            .ok_or(StoreError::PostNotFound)?;
        post.updated_at = comment.created_at;
        post.comments.push(comment.clone());
        Ok(comment)
    }

    // ------------------------------------------------------------------
    // Feeds
    // ------------------------------------------------------------------

    /// Executes a composed feed query. Returns the window plus the total
    /// number of matching documents, which drives the last-page check.
    pub fn find_posts(&self, query: &FeedQuery) -> (Vec<Post>, usize) {
        let mut matching: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| query.filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        match query.sort {
            SortOrder::NewestFirst => {
                matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            SortOrder::MostLiked => {
                matching.sort_by(|a, b| b.likes.unwrap_or(0).cmp(&a.likes.unwrap_or(0)));
            }
        }

        let total = matching.len();
        let window = matching
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .collect();
        (window, total)
    }

    /// Resolves one page of the user's liked posts, preserving the order
    /// of the liked-id list. Ids that no longer resolve are skipped.
    /// Returns the page plus the total length of the liked list.
    pub fn liked_posts_page(
        &self,
        user_id: Uuid,
        page: usize,
    ) -> Result<(Vec<Post>, usize), StoreError> {
        let liked = self
            .users
            .get(&user_id)
            .ok_or(StoreError::UserNotFound)?
            .liked_posts
            .clone();

        let posts = feed::liked_window(&liked, page)
            .iter()
            .filter_map(|id| self.post_by_id(*id))
            .collect();
        Ok((posts, liked.len()))
    }

    // ------------------------------------------------------------------
    // Like toggles
    // ------------------------------------------------------------------

    /// Toggles the user's like on a post. Counter and membership list are
    /// written under the same lock pair; neither can land without the
    /// other.
    pub fn toggle_post_like(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<ToggleOutcome, StoreError> {
        // Lock order: users before posts.
        let mut user = self
            .users
            .get_mut(&user_id)
            .ok_or(StoreError::UserNotFound)?;
        let mut post = self
            .posts
            .get_mut(&post_id)
            .ok_or(StoreError::PostNotFound)?;

        let outcome = toggle_like(post.likes, &mut user.liked_posts, post_id);
        post.likes = Some(outcome.new_count);
        Ok(outcome)
    }

    /// Same toggle for a comment embedded in its post.
    pub fn toggle_comment_like(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<ToggleOutcome, StoreError> {
        // Lock order: users before posts.
        let mut user = self
            .users
            .get_mut(&user_id)
            .ok_or(StoreError::UserNotFound)?;
        let mut post = self
            .posts
            .get_mut(&post_id)
            .ok_or(StoreError::PostNotFound)?;
        let comment = post
            .comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
            .ok_or(StoreError::CommentNotFound)?;

        let outcome = toggle_like(comment.likes, &mut user.liked_comments, comment_id);
        comment.likes = Some(outcome.new_count);
        Ok(outcome)
    }

    /// Toggles tag membership in the user's followed list. Returns true
    /// when the tag is followed afterwards.
    pub fn toggle_followed_tag(&self, user_id: Uuid, tag: &str) -> Result<bool, StoreError> {
        self.update_user(user_id, |user| {
            match user.followed_tags.iter().position(|followed| followed == tag) {
                Some(index) => {
                    user.followed_tags.remove(index);
                    false
                }
                None => {
                    user.followed_tags.push(tag.to_string());
                    true
                }
            }
        })
    }
}

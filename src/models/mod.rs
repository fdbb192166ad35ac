mod comment;
mod post;
mod user;

pub use comment::Comment;
pub use post::{Post, PostContent};
pub use user::User;

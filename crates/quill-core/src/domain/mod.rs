//! Domain entities - the core business objects.

mod comment;
mod post;
mod user;
mod validation;

pub use comment::{Comment, CommentFields, CommentId, NewComment};
pub use post::{NewPost, Post, PostFields, PostId};
pub use user::{Principal, User};
pub use validation::MAX_SHORT_TEXT_CHARS;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Comment, CommentId, NewComment, NewPost, Post, PostId, User};
use crate::error::RepoError;

/// Post storage.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    /// Posts published at or before `now`, most recent first.
    async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError>;

    /// Posts without a publish date, oldest first.
    async fn list_drafts(&self) -> Result<Vec<Post>, RepoError>;

    /// Store a new post and return it with its assigned id.
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Overwrite an existing post. `RepoError::NotFound` if it is gone.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Delete a post together with all of its comments.
    async fn delete(&self, id: PostId) -> Result<(), RepoError>;
}

/// Comment storage.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepoError>;

    /// Comments on a post, oldest first.
    async fn list_for_post(
        &self,
        post_id: PostId,
        approved_only: bool,
    ) -> Result<Vec<Comment>, RepoError>;

    async fn insert(&self, comment: NewComment) -> Result<Comment, RepoError>;

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError>;

    async fn delete(&self, id: CommentId) -> Result<(), RepoError>;
}

/// User storage, used by login and admin bootstrap.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Store a new user. `RepoError::Constraint` if the username is taken.
    async fn insert(&self, user: User) -> Result<User, RepoError>;
}

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::domain::{
    Comment, CommentFields, CommentId, NewComment, NewPost, Post, PostFields, PostId, Principal,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{CommentRepository, PostRepository, UserRepository};

/// A post together with the comments the viewer is allowed to see.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    /// Username of the author; `None` once the account is gone.
    pub author: Option<String>,
    pub comments: Vec<Comment>,
}

/// Post and comment operations.
///
/// Methods that take a `&Principal` are author-only. Every operation is a
/// single read-modify-write against the store; concurrent writers race and
/// the last one wins.
#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            users,
        }
    }

    pub async fn published_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_published(Utc::now()).await?)
    }

    pub async fn draft_posts(&self, _viewer: &Principal) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_drafts().await?)
    }

    /// Fetch a post by id, draft or not.
    pub async fn post(&self, id: PostId) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// A post plus its author's name and comments. Anonymous viewers only see
    /// approved comments.
    pub async fn post_detail(
        &self,
        id: PostId,
        viewer: Option<&Principal>,
    ) -> Result<PostDetail, DomainError> {
        let post = self.post(id).await?;
        let comments = self
            .comments
            .list_for_post(post.id, viewer.is_none())
            .await?;
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .map(|user| user.username);
        Ok(PostDetail {
            post,
            author,
            comments,
        })
    }

    pub async fn create_post(
        &self,
        author: &Principal,
        fields: PostFields,
    ) -> Result<Post, DomainError> {
        let post = self
            .posts
            .insert(NewPost::new(author.user_id, fields))
            .await?;
        tracing::info!(post_id = post.id, user = %author.username, "Post created");
        Ok(post)
    }

    /// Edit title and text. The original author is kept.
    pub async fn update_post(
        &self,
        editor: &Principal,
        id: PostId,
        fields: PostFields,
    ) -> Result<Post, DomainError> {
        let mut post = self.post(id).await?;
        post.apply(fields);
        let post = self
            .posts
            .update(post)
            .await
            .map_err(|e| not_found_as(e, || DomainError::post_not_found(id)))?;
        tracing::info!(post_id = id, user = %editor.username, "Post updated");
        Ok(post)
    }

    pub async fn publish_post(&self, editor: &Principal, id: PostId) -> Result<Post, DomainError> {
        let mut post = self.post(id).await?;
        post.publish(Utc::now());
        let post = self
            .posts
            .update(post)
            .await
            .map_err(|e| not_found_as(e, || DomainError::post_not_found(id)))?;
        tracing::info!(post_id = id, user = %editor.username, "Post published");
        Ok(post)
    }

    /// Delete a post and, with it, every comment on it.
    pub async fn remove_post(&self, editor: &Principal, id: PostId) -> Result<(), DomainError> {
        self.posts
            .delete(id)
            .await
            .map_err(|e| not_found_as(e, || DomainError::post_not_found(id)))?;
        tracing::info!(post_id = id, user = %editor.username, "Post removed");
        Ok(())
    }

    /// Open to anyone. Fails with `NotFound` before touching comments when the
    /// post does not exist.
    pub async fn add_comment(
        &self,
        post_id: PostId,
        fields: CommentFields,
    ) -> Result<Comment, DomainError> {
        self.post(post_id).await?;
        let comment = self
            .comments
            .insert(NewComment::new(post_id, fields))
            .await
            .map_err(|e| not_found_as(e, || DomainError::post_not_found(post_id)))?;
        tracing::info!(post_id, comment_id = comment.id, "Comment added");
        Ok(comment)
    }

    pub async fn approve_comment(
        &self,
        moderator: &Principal,
        id: CommentId,
    ) -> Result<Comment, DomainError> {
        let mut comment = self.comment(id).await?;
        comment.approve();
        let comment = self
            .comments
            .update(comment)
            .await
            .map_err(|e| not_found_as(e, || DomainError::comment_not_found(id)))?;
        tracing::info!(comment_id = id, user = %moderator.username, "Comment approved");
        Ok(comment)
    }

    /// Delete a comment and return the id of the post it belonged to.
    pub async fn remove_comment(
        &self,
        moderator: &Principal,
        id: CommentId,
    ) -> Result<PostId, DomainError> {
        let post_id = self.comment(id).await?.post_id;
        self.comments
            .delete(id)
            .await
            .map_err(|e| not_found_as(e, || DomainError::comment_not_found(id)))?;
        tracing::info!(comment_id = id, post_id, user = %moderator.username, "Comment removed");
        Ok(post_id)
    }

    async fn comment(&self, id: CommentId) -> Result<Comment, DomainError> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::comment_not_found(id))
    }
}

/// A row that vanished between fetch and write is reported like a missing id.
fn not_found_as(err: RepoError, not_found: impl FnOnce() -> DomainError) -> DomainError {
    match err {
        RepoError::NotFound => not_found(),
        other => other.into(),
    }
}

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, CommentId, NewComment, NewPost, Post, PostId, User};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    last_post_id: PostId,
    last_comment_id: CommentId,
}

/// All three repositories over one set of tables behind an async `RwLock`,
/// so a post delete can take its comments with it in the same write.
///
/// Ids are handed out from 1 like a database sequence. Data is lost on
/// process restart.
#[derive(Default)]
pub struct InMemoryBlogStore {
    tables: RwLock<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|post| post.is_published_at(now))
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            b.published_date
                .cmp(&a.published_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(posts)
    }

    async fn list_drafts(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|post| post.is_draft())
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            a.created_date
                .cmp(&b.created_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(posts)
    }

    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            author_id: post.author_id,
            title: post.title,
            text: post.text,
            created_date: post.created_date,
            published_date: None,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.comments.retain(|_, comment| comment.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn list_for_post(
        &self,
        post_id: PostId,
        approved_only: bool,
    ) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id && (c.is_approved || !approved_only))
            .cloned()
            .collect();
        comments.sort_by(|a, b| {
            a.created_date
                .cmp(&b.created_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(comments)
    }

    /// Rejects comments on a post that does not exist, like the foreign key does.
    async fn insert(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::NotFound);
        }

        tables.last_comment_id += 1;
        let comment = Comment {
            id: tables.last_comment_id,
            post_id: comment.post_id,
            author: comment.author,
            text: comment.text,
            created_date: comment.created_date,
            is_approved: false,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .comments
            .get_mut(&comment.id)
            .ok_or(RepoError::NotFound)?;
        *slot = comment.clone();
        Ok(comment)
    }

    async fn delete(&self, id: CommentId) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "Username {} already exists",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

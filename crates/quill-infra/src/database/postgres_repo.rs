//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use quill_core::domain::{Comment, CommentId, NewComment, NewPost, Post, PostId, User};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }

    async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let now: DateTimeWithTimeZone = now.into();
        let result = PostEntity::find()
            .filter(post::Column::PublishedDate.lte(now))
            .order_by_desc(post::Column::PublishedDate)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_drafts(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::PublishedDate.is_null())
            .order_by_asc(post::Column::CreatedDate)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let model = self.insert_model(post::ActiveModel::from(post)).await?;
        Ok(model.into())
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let model = self.update_model(post::ActiveModel::from(post)).await?;
        Ok(model.into())
    }

    /// Comments go with the post through the `ON DELETE CASCADE` foreign key.
    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        self.delete_model(id).await
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }

    async fn list_for_post(
        &self,
        post_id: PostId,
        approved_only: bool,
    ) -> Result<Vec<Comment>, RepoError> {
        let mut query = CommentEntity::find().filter(comment::Column::PostId.eq(post_id));
        if approved_only {
            query = query.filter(comment::Column::IsApproved.eq(true));
        }

        let result = query
            .order_by_asc(comment::Column::CreatedDate)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let model = self
            .insert_model(comment::ActiveModel::from(comment))
            .await?;
        Ok(model.into())
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let model = self
            .update_model(comment::ActiveModel::from(comment))
            .await?;
        Ok(model.into())
    }

    async fn delete(&self, id: CommentId) -> Result<(), RepoError> {
        self.delete_model(id).await
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let model = self.insert_model(user::ActiveModel::from(user)).await?;
        Ok(model.into())
    }
}

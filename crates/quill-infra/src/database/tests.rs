use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use quill_core::domain::{CommentFields, NewComment, NewPost, PostFields};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository, UserRepository};

use crate::database::entity::{comment, post, user};
use crate::database::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
};

fn post_model(id: i32, published: bool) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id: Uuid::new_v4(),
        title: "Test".to_owned(),
        text: "superText".to_owned(),
        created_date: now.into(),
        published_date: published.then(|| now.into()),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(1, false)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post = repo.find_by_id(1).await.unwrap().unwrap();

    assert_eq!(post.id, 1);
    assert_eq!(post.title, "Test");
    assert!(post.is_draft());
}

#[tokio::test]
async fn test_find_missing_post_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.find_by_id(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_published_keeps_store_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(2, true), post_model(1, true)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let now = Utc::now();
    let posts = repo.list_published(now).await.unwrap();
    assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
    assert!(posts.iter().all(|p| p.is_published_at(now)));
}

#[tokio::test]
async fn test_list_drafts_maps_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(3, false)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let drafts = repo.list_drafts().await.unwrap();
    assert_eq!(drafts.len(), 1);
    assert!(drafts[0].is_draft());
}

#[tokio::test]
async fn test_insert_post_returns_assigned_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(1, false)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let fields = PostFields::parse("Test", "superText").unwrap();

    let post = repo
        .insert(NewPost::new(Uuid::new_v4(), fields))
        .await
        .unwrap();

    assert_eq!(post.id, 1);
    assert_eq!(post.text, "superText");
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(matches!(repo.delete(999).await, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_list_comments_for_anonymous_viewer() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![comment::Model {
            id: 4,
            post_id: 1,
            author: "a".to_owned(),
            text: "Super".to_owned(),
            created_date: now.into(),
            is_approved: true,
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let comments = repo.list_for_post(1, true).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].to_string(), "Super");
    assert!(comments[0].is_approved);
}

#[tokio::test]
async fn test_insert_comment_starts_unapproved() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![comment::Model {
            id: 1,
            post_id: 1,
            author: "a".to_owned(),
            text: "Super".to_owned(),
            created_date: now.into(),
            is_approved: false,
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let fields = CommentFields::parse("a", "Super").unwrap();

    let comment = repo.insert(NewComment::new(1, fields)).await.unwrap();

    assert_eq!(comment.post_id, 1);
    assert!(!comment.is_approved);
}

#[tokio::test]
async fn test_find_user_by_username() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user::Model {
            id,
            username: "admin".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            created_at: Utc::now().into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let user = repo.find_by_username("admin").await.unwrap().unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.principal().username, "admin");
}

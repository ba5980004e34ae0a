//! `BlogService` and `AccountService` over the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use quill_core::domain::{CommentFields, PostFields, Principal};
use quill_core::{BlogService, DomainError};
use quill_core::services::AccountService;
use quill_infra::{Argon2PasswordService, InMemoryBlogStore};

fn service() -> (BlogService, Arc<InMemoryBlogStore>) {
    let store = Arc::new(InMemoryBlogStore::new());
    (BlogService::new(store.clone(), store.clone(), store.clone()), store)
}

fn principal(name: &str) -> Principal {
    Principal {
        user_id: Uuid::new_v4(),
        username: name.to_string(),
    }
}

fn post_fields(title: &str) -> PostFields {
    PostFields::parse(title, "superText").unwrap()
}

fn comment_fields(text: &str) -> CommentFields {
    CommentFields::parse("a", text).unwrap()
}

#[tokio::test]
async fn test_draft_is_hidden_until_published() {
    let (blog, _) = service();
    let admin = principal("admin");

    let post = blog.create_post(&admin, post_fields("Test")).await.unwrap();
    assert_eq!(post.id, 1);
    assert_eq!(post.author_id, admin.user_id);

    assert!(blog.published_posts().await.unwrap().is_empty());
    assert_eq!(blog.draft_posts(&admin).await.unwrap(), vec![post.clone()]);

    blog.publish_post(&admin, post.id).await.unwrap();

    let published = blog.published_posts().await.unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].title, "Test");
    assert!(blog.draft_posts(&admin).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_republish_keeps_post_visible_and_moves_timestamp() {
    let (blog, _) = service();
    let admin = principal("admin");
    let post = blog.create_post(&admin, post_fields("Test")).await.unwrap();

    let first = blog.publish_post(&admin, post.id).await.unwrap();
    let second = blog.publish_post(&admin, post.id).await.unwrap();

    assert!(second.published_date >= first.published_date);
    assert_eq!(blog.published_posts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_keeps_original_author() {
    let (blog, _) = service();
    let author = principal("author");
    let editor = principal("editor");
    let post = blog.create_post(&author, post_fields("Test")).await.unwrap();

    let updated = blog
        .update_post(&editor, post.id, PostFields::parse("Edited", "New body").unwrap())
        .await
        .unwrap();

    assert_eq!(updated.title, "Edited");
    assert_eq!(updated.text, "New body");
    assert_eq!(updated.author_id, author.user_id);
    assert_eq!(updated.created_date, post.created_date);
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let (blog, _) = service();
    let admin = principal("admin");

    assert!(matches!(
        blog.post(999).await,
        Err(DomainError::NotFound { entity_type: "Post", id: 999 })
    ));
    assert!(matches!(
        blog.update_post(&admin, 999, post_fields("x")).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        blog.publish_post(&admin, 999).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        blog.remove_post(&admin, 999).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        blog.add_comment(999, comment_fields("Super")).await,
        Err(DomainError::NotFound { entity_type: "Post", .. })
    ));
    assert!(matches!(
        blog.approve_comment(&admin, 5).await,
        Err(DomainError::NotFound { entity_type: "Comment", id: 5 })
    ));
    assert!(matches!(
        blog.remove_comment(&admin, 5).await,
        Err(DomainError::NotFound { entity_type: "Comment", .. })
    ));
}

#[tokio::test]
async fn test_comment_moderation() {
    let (blog, _) = service();
    let admin = principal("admin");
    let post = blog.create_post(&admin, post_fields("Test")).await.unwrap();

    let comment = blog.add_comment(post.id, comment_fields("Super")).await.unwrap();
    assert!(!comment.is_approved);

    let anonymous = blog.post_detail(post.id, None).await.unwrap();
    assert!(anonymous.comments.is_empty());
    let moderator = blog.post_detail(post.id, Some(&admin)).await.unwrap();
    assert_eq!(moderator.comments.len(), 1);

    let approved = blog.approve_comment(&admin, comment.id).await.unwrap();
    assert!(approved.is_approved);
    assert_eq!(approved.post_id, post.id);

    // Approving again leaves it approved.
    assert!(blog.approve_comment(&admin, comment.id).await.unwrap().is_approved);

    let anonymous = blog.post_detail(post.id, None).await.unwrap();
    assert_eq!(anonymous.comments.len(), 1);

    let parent = blog.remove_comment(&admin, comment.id).await.unwrap();
    assert_eq!(parent, post.id);
    assert!(blog.post_detail(post.id, Some(&admin)).await.unwrap().comments.is_empty());
}

#[tokio::test]
async fn test_remove_post_leaves_no_orphan_comments() {
    let (blog, store) = service();
    let admin = principal("admin");
    let post = blog.create_post(&admin, post_fields("Test")).await.unwrap();
    let other = blog.create_post(&admin, post_fields("Other")).await.unwrap();

    let c1 = blog.add_comment(post.id, comment_fields("one")).await.unwrap();
    let c2 = blog.add_comment(post.id, comment_fields("two")).await.unwrap();
    let c3 = blog.add_comment(other.id, comment_fields("three")).await.unwrap();

    blog.remove_post(&admin, post.id).await.unwrap();

    use quill_core::ports::CommentRepository;
    assert!(store.find_by_id(c1.id).await.unwrap().is_none());
    assert!(store.find_by_id(c2.id).await.unwrap().is_none());
    assert!(store.find_by_id(c3.id).await.unwrap().is_some());
    assert!(matches!(
        blog.approve_comment(&admin, c1.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_authenticate_checks_password() {
    let store = Arc::new(InMemoryBlogStore::new());
    let accounts = AccountService::new(store.clone(), Arc::new(Argon2PasswordService::new()));

    let (user, created) = accounts.ensure_user("admin", "12345678").await.unwrap();
    assert!(created);
    let (again, created) = accounts.ensure_user("admin", "ignored").await.unwrap();
    assert!(!created);
    assert_eq!(again.id, user.id);

    let principal = accounts
        .authenticate("admin", "12345678")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(principal.user_id, user.id);

    assert!(
        accounts
            .authenticate("admin", "wrong")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        accounts
            .authenticate("nobody", "12345678")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_post_detail_names_the_author() {
    let (blog, store) = service();
    let accounts = AccountService::new(store.clone(), Arc::new(Argon2PasswordService::new()));
    let (user, _) = accounts.ensure_user("admin", "12345678").await.unwrap();

    let post = blog
        .create_post(&user.principal(), post_fields("Test"))
        .await
        .unwrap();
    let detail = blog.post_detail(post.id, None).await.unwrap();
    assert_eq!(detail.author.as_deref(), Some("admin"));

    let orphan = blog
        .create_post(&principal("ghost"), post_fields("Orphan"))
        .await
        .unwrap();
    let detail = blog.post_detail(orphan.id, None).await.unwrap();
    assert!(detail.author.is_none());
}

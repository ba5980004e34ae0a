//! Visitor comments and their moderation.

use actix_web::{HttpResponse, web};
use minijinja::context;

use quill_core::domain::{CommentFields, CommentId, Post, PostId};
use quill_core::error::ValidationErrors;
use quill_shared::dto::CommentForm;

use super::{post_url, redirect, render};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /post/{id}/comment/
pub async fn comment_form(
    viewer: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post = state.blog.post(path.into_inner()).await?;
    render_form(
        &state,
        &viewer,
        &post,
        &CommentForm::default(),
        &ValidationErrors::new(),
    )
}

/// POST /post/{id}/comment/
///
/// A missing post is a 404 even when the submitted form is invalid.
pub async fn add_comment(
    viewer: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post = state.blog.post(path.into_inner()).await?;
    let form = form.into_inner();
    match CommentFields::parse(&form.author, &form.text) {
        Ok(fields) => {
            state.blog.add_comment(post.id, fields).await?;
            Ok(redirect(post_url(post.id)))
        }
        Err(errors) => render_form(&state, &viewer, &post, &form, &errors),
    }
}

/// GET /comment/{id}/approve/
pub async fn approve(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<CommentId>,
) -> AppResult<HttpResponse> {
    let comment = state
        .blog
        .approve_comment(&identity, path.into_inner())
        .await?;
    Ok(redirect(post_url(comment.post_id)))
}

/// GET /comment/{id}/remove/
pub async fn remove(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<CommentId>,
) -> AppResult<HttpResponse> {
    let post_id = state
        .blog
        .remove_comment(&identity, path.into_inner())
        .await?;
    Ok(redirect(post_url(post_id)))
}

fn render_form(
    state: &AppState,
    viewer: &OptionalIdentity,
    post: &Post,
    form: &CommentForm,
    errors: &ValidationErrors,
) -> AppResult<HttpResponse> {
    render(
        state,
        "comment_form.html",
        context! { post, form, errors, user => viewer.username() },
    )
}

//! Post views: public list and detail, plus the author-only editor.

use actix_web::{HttpResponse, web};
use minijinja::context;

use quill_core::domain::{PostFields, PostId};
use quill_core::error::ValidationErrors;
use quill_shared::dto::PostForm;

use super::{post_url, redirect, render};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /
pub async fn post_list(
    viewer: OptionalIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let posts = state.blog.published_posts().await?;
    render(
        &state,
        "post_list.html",
        context! { posts, user => viewer.username() },
    )
}

/// GET /drafts/
pub async fn draft_list(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.blog.draft_posts(&identity).await?;
    render(
        &state,
        "post_draft_list.html",
        context! { posts, user => &identity.username },
    )
}

/// GET /post/{id}/
///
/// Drafts are reachable by id as well; only the lists filter on publication.
pub async fn post_detail(
    viewer: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let detail = state
        .blog
        .post_detail(path.into_inner(), viewer.principal())
        .await?;
    render(
        &state,
        "post_detail.html",
        context! {
            post => detail.post,
            author => detail.author,
            comments => detail.comments,
            user => viewer.username(),
        },
    )
}

/// GET /post/new/
pub async fn new_form(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    render_editor(
        &state,
        &identity,
        "New post",
        "/post/new/",
        &PostForm::default(),
        &ValidationErrors::new(),
    )
}

/// POST /post/new/
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    match PostFields::parse(&form.title, &form.text) {
        Ok(fields) => {
            let post = state.blog.create_post(&identity, fields).await?;
            Ok(redirect(post_url(post.id)))
        }
        Err(errors) => render_editor(&state, &identity, "New post", "/post/new/", &form, &errors),
    }
}

/// GET /post/{id}/edit/
pub async fn edit_form(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post = state.blog.post(path.into_inner()).await?;
    let form = PostForm {
        title: post.title,
        text: post.text,
    };
    render_editor(
        &state,
        &identity,
        "Edit post",
        &format!("/post/{}/edit/", post.id),
        &form,
        &ValidationErrors::new(),
    )
}

/// POST /post/{id}/edit/
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let id = state.blog.post(path.into_inner()).await?.id;
    let form = form.into_inner();
    match PostFields::parse(&form.title, &form.text) {
        Ok(fields) => {
            state.blog.update_post(&identity, id, fields).await?;
            Ok(redirect(post_url(id)))
        }
        Err(errors) => render_editor(
            &state,
            &identity,
            "Edit post",
            &format!("/post/{id}/edit/"),
            &form,
            &errors,
        ),
    }
}

/// GET /post/{id}/publish/
pub async fn publish(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post = state.blog.publish_post(&identity, path.into_inner()).await?;
    Ok(redirect(post_url(post.id)))
}

/// GET /post/{id}/remove/
pub async fn remove(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    state.blog.remove_post(&identity, path.into_inner()).await?;
    Ok(redirect("/"))
}

fn render_editor(
    state: &AppState,
    identity: &Identity,
    heading: &str,
    action: &str,
    form: &PostForm,
    errors: &ValidationErrors,
) -> AppResult<HttpResponse> {
    render(
        state,
        "post_edit.html",
        context! { heading, action, form, errors, user => &identity.username },
    )
}

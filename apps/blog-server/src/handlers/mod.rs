//! HTTP handlers and route configuration.

mod accounts;
mod comments;
mod health;
mod posts;


use actix_web::{HttpResponse, http::header, web};
use serde::Serialize;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Cap on a single form body. Post and comment text has no length limit of
/// its own.
pub const MAX_FORM_BYTES: usize = 16 * 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::FormConfig::default()
            .limit(MAX_FORM_BYTES)
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Page not found".to_string()).into()),
    );

    cfg.route("/", web::get().to(posts::post_list))
        .route("/drafts/", web::get().to(posts::draft_list))
        // `/post/new/` must be registered before `/post/{id}/`
        .service(
            web::resource("/post/new/")
                .route(web::get().to(posts::new_form))
                .route(web::post().to(posts::create)),
        )
        .route("/post/{id}/", web::get().to(posts::post_detail))
        .service(
            web::resource("/post/{id}/edit/")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::update)),
        )
        .route("/post/{id}/publish/", web::get().to(posts::publish))
        .route("/post/{id}/remove/", web::get().to(posts::remove))
        .service(
            web::resource("/post/{id}/comment/")
                .route(web::get().to(comments::comment_form))
                .route(web::post().to(comments::add_comment)),
        )
        .route("/comment/{id}/approve/", web::get().to(comments::approve))
        .route("/comment/{id}/remove/", web::get().to(comments::remove))
        .service(
            web::scope("/accounts")
                .service(
                    web::resource("/login/")
                        .route(web::get().to(accounts::login_form))
                        .route(web::post().to(accounts::login)),
                )
                .route("/logout/", web::get().to(accounts::logout)),
        )
        .route("/healthz", web::get().to(health::health_check))
        .default_service(web::to(not_found));
}

async fn not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("Page not found".to_string()))
}

fn render<S: Serialize>(state: &AppState, name: &str, ctx: S) -> AppResult<HttpResponse> {
    let body = state.templates.render(name, ctx)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

fn redirect(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.as_ref()))
        .finish()
}

fn post_url(id: i32) -> String {
    format!("/post/{id}/")
}

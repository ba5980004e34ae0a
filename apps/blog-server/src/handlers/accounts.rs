//! Login and logout.

use actix_web::{HttpResponse, web};
use minijinja::context;

use quill_shared::dto::{LoginForm, LoginQuery};

use super::{redirect, render};
use crate::middleware::auth::{OptionalIdentity, cleared_session_cookie, safe_next, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const LOGIN_FAILED: &str = "Please enter a correct username and password.";

/// GET /accounts/login/
pub async fn login_form(
    viewer: OptionalIdentity,
    state: web::Data<AppState>,
    query: web::Query<LoginQuery>,
) -> AppResult<HttpResponse> {
    render(
        &state,
        "login.html",
        context! {
            next => safe_next(query.next.as_deref()),
            error => None::<&str>,
            user => viewer.username(),
        },
    )
}

/// POST /accounts/login/
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let next = safe_next(form.next.as_deref());

    let Some(principal) = state
        .accounts
        .authenticate(&form.username, &form.password)
        .await?
    else {
        return render(
            &state,
            "login.html",
            context! { next, error => LOGIN_FAILED, user => None::<&str> },
        );
    };

    let token = state
        .tokens
        .generate_token(&principal)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user = %principal.username, "User logged in");

    let mut response = redirect(next);
    response
        .add_cookie(&session_cookie(
            &state.session,
            token,
            state.tokens.expiration_seconds(),
        ))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

/// GET /accounts/logout/
pub async fn logout(
    viewer: OptionalIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    if let Some(user) = viewer.username() {
        tracing::info!(user = %user, "User logged out");
    }

    let mut response = redirect("/");
    response
        .add_cookie(&cleared_session_cookie(&state.session))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

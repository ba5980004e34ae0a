//! Session authentication: the login guard and the session cookie.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, http::header, web};
use std::fmt;
use std::future::{Ready, ready};
use std::ops::Deref;

use quill_core::domain::Principal;
use quill_core::ports::AuthError;

use crate::config::SessionConfig;
use crate::state::AppState;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/accounts/login/";

/// Authenticated operator extractor - the login guard.
///
/// Any handler taking an `Identity` is author-only. Without a valid session
/// the request is redirected to the login page before the handler runs:
/// ```ignore
/// async fn publish(identity: Identity, path: web::Path<PostId>) -> AppResult<HttpResponse> {
///     // only reached when logged in
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(Principal);

impl Identity {
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

impl Deref for Identity {
    type Target = Principal;

    fn deref(&self) -> &Principal {
        &self.0
    }
}

/// Rejection produced by [`Identity`]: a 302 to the login page that brings the
/// visitor back to `next` afterwards.
#[derive(Debug)]
pub struct LoginRequired {
    next: String,
}

impl fmt::Display for LoginRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Login required for {}", self.next)
    }
}

impl actix_web::ResponseError for LoginRequired {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, login_url(&self.next)))
            .finish()
    }
}

/// `/accounts/login/?next=<next>`, with `next` form-encoded.
pub fn login_url(next: &str) -> String {
    match serde_urlencoded::to_string([("next", next)]) {
        Ok(query) => format!("{LOGIN_PATH}?{query}"),
        Err(e) => {
            tracing::warn!("Failed to encode login redirect: {}", e);
            LOGIN_PATH.to_string()
        }
    }
}

/// Only local paths are followed after login; anything else goes home.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

fn authenticate(req: &HttpRequest) -> Result<Principal, AuthError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let cookie = req
        .cookie(&state.session.cookie_name)
        .ok_or(AuthError::MissingSession)?;

    let claims = state.tokens.validate_token(cookie.value())?;
    Ok(claims.into())
}

impl FromRequest for Identity {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match authenticate(req) {
            Ok(principal) => ready(Ok(Identity(principal))),
            Err(e) => {
                let next = req
                    .uri()
                    .path_and_query()
                    .map_or_else(|| req.path(), |pq| pq.as_str());
                tracing::debug!(next = %next, reason = %e, "Login required");
                ready(Err(LoginRequired {
                    next: next.to_string(),
                }))
            }
        }
    }
}

/// Optional identity extractor - public views use it to show operator links.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref().map(Identity::principal)
    }

    pub fn username(&self) -> Option<&str> {
        self.principal().map(|p| p.username.as_str())
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(
            authenticate(req).ok().map(Identity),
        )))
    }
}

/// The cookie carrying a freshly issued session token.
pub fn session_cookie(config: &SessionConfig, token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

/// A cookie that makes the browser drop the session.
pub fn cleared_session_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(config.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_only_allows_local_paths() {
        assert_eq!(safe_next(Some("/post/new/")), "/post/new/");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example/")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
        assert_eq!(safe_next(None), "/");
    }

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(login_url("/drafts/"), "/accounts/login/?next=%2Fdrafts%2F");
        assert_eq!(
            login_url("/post/1/edit/?a=1&b=2"),
            "/accounts/login/?next=%2Fpost%2F1%2Fedit%2F%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn test_session_cookie_flags() {
        let config = SessionConfig::default();
        let cookie = session_cookie(&config, "token".to_string(), 3600);

        assert_eq!(cookie.name(), "quill_session");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(3600)));

        let cleared = cleared_session_cookie(&config);
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(Duration::ZERO));
    }
}

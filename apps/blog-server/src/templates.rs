//! HTML views rendered with minijinja.
//!
//! Template sources are compiled into the binary; every template is
//! HTML-escaped regardless of its name.

use chrono::DateTime;
use minijinja::{AutoEscape, Environment, context};
use serde::Serialize;

use quill_shared::ErrorResponse;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("post_list.html", include_str!("../templates/post_list.html")),
    ("post_detail.html", include_str!("../templates/post_detail.html")),
    ("post_edit.html", include_str!("../templates/post_edit.html")),
    ("post_draft_list.html", include_str!("../templates/post_draft_list.html")),
    ("comment_form.html", include_str!("../templates/comment_form.html")),
    ("login.html", include_str!("../templates/login.html")),
];

const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");

/// The loaded template set.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn load() -> Result<Self, minijinja::Error> {
        let mut env = base_environment();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

/// Standalone error page. It does not depend on the loaded template set, so
/// it can be produced from `ResponseError` without application state.
pub fn render_error_page(problem: &ErrorResponse) -> String {
    fn render(problem: &ErrorResponse) -> Result<String, minijinja::Error> {
        let mut env = base_environment();
        env.add_template("error.html", ERROR_TEMPLATE)?;
        env.get_template("error.html")?
            .render(context! { problem => problem })
    }

    match render(problem) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            format!("{} {}", problem.status, problem.title)
        }
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_filter("datetime", format_datetime);
    env
}

/// `{{ post.created_date|datetime }}` - RFC 3339 in, `2024-01-31 17:05` out.
fn format_datetime(value: String) -> String {
    match DateTime::parse_from_rfc3339(&value) {
        Ok(date) => date.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_load() {
        let templates = Templates::load().unwrap();
        let html = templates
            .render(
                "login.html",
                context! { next => "/drafts/", error => None::<String>, user => None::<String> },
            )
            .unwrap();
        // minijinja escapes '/' inside attribute values as well.
        assert!(html.contains(r#"name="next""#));
        assert!(html.contains("drafts"));
    }

    #[test]
    fn test_output_is_escaped() {
        let templates = Templates::load().unwrap();
        let html = templates
            .render(
                "post_list.html",
                context! {
                    posts => vec![context! {
                        id => 1,
                        title => "<script>alert(1)</script>",
                        text => "body",
                        published_date => "2024-01-31T17:05:00Z",
                    }],
                    user => None::<String>,
                },
            )
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("2024-01-31 17:05"));
    }

    #[test]
    fn test_error_page() {
        let html = render_error_page(&ErrorResponse::not_found("Post with id 999 not found"));
        assert!(html.contains("404"));
        assert!(html.contains("Post with id 999 not found"));
    }
}

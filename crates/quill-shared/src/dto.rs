//! Form payloads bound from `application/x-www-form-urlencoded` bodies.
//!
//! Every field defaults to empty so that a missing field reaches validation
//! and is reported on the form instead of failing extraction.

use serde::{Deserialize, Serialize};

/// Title and text of a post, as typed into the post form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub text: String,
}

/// A visitor comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub author: String,
    pub text: String,
}

/// Login credentials. `next` round-trips through a hidden input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// `?next=` on the login page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

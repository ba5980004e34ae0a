use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::PostId;
use super::validation::{MAX_SHORT_TEXT_CHARS, required, required_bounded};
use crate::error::ValidationErrors;

pub type CommentId = i32;

/// Comment entity - a visitor's reply attached to one post.
///
/// The author is a free-text name, not a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
    pub is_approved: bool,
}

impl Comment {
    /// One-way moderation flag.
    pub fn approve(&mut self) {
        self.is_approved = true;
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A comment that has not been stored yet. Always starts unapproved.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: PostId,
    pub author: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
}

impl NewComment {
    pub fn new(post_id: PostId, fields: CommentFields) -> Self {
        Self {
            post_id,
            author: fields.author,
            text: fields.text,
            created_date: Utc::now(),
        }
    }
}

/// Validated comment form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFields {
    author: String,
    text: String,
}

impl CommentFields {
    pub fn parse(author: &str, text: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let author = required_bounded(&mut errors, "author", author, MAX_SHORT_TEXT_CHARS);
        let text = required(&mut errors, "text", text);
        errors.into_result(Self { author, text })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

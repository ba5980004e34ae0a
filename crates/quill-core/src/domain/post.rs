use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{MAX_SHORT_TEXT_CHARS, required, required_bounded};
use crate::error::ValidationErrors;

pub type PostId = i32;

/// Post entity - a blog post, either a draft or published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
    /// `None` while the post is a draft.
    pub published_date: Option<DateTime<Utc>>,
}

impl Post {
    /// A post is published once its publish timestamp is at or before `now`.
    pub fn is_published_at(&self, now: DateTime<Utc>) -> bool {
        self.published_date.is_some_and(|date| date <= now)
    }

    pub fn is_draft(&self) -> bool {
        self.published_date.is_none()
    }

    /// Stamp the post as published at `now`. Calling it again moves the
    /// timestamp forward; nothing ever clears it.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.published_date = Some(now);
    }

    /// Replace title and text. Author and timestamps are left alone.
    pub fn apply(&mut self, fields: PostFields) {
        self.title = fields.title;
        self.text = fields.text;
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A post that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
}

impl NewPost {
    pub fn new(author_id: Uuid, fields: PostFields) -> Self {
        Self {
            author_id,
            title: fields.title,
            text: fields.text,
            created_date: Utc::now(),
        }
    }
}

/// Validated, user-editable post fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFields {
    title: String,
    text: String,
}

impl PostFields {
    /// Validate raw form input. Both fields are trimmed; the title must fit in
    /// 200 characters.
    pub fn parse(title: &str, text: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = required_bounded(&mut errors, "title", title, MAX_SHORT_TEXT_CHARS);
        let text = required(&mut errors, "text", text);
        errors.into_result(Self { title, text })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn draft() -> Post {
        Post {
            id: 1,
            author_id: Uuid::new_v4(),
            title: "Test".to_string(),
            text: "superText".to_string(),
            created_date: Utc::now(),
            published_date: None,
        }
    }

    #[test]
    fn test_post_displays_as_title() {
        assert_eq!(draft().to_string(), "Test");
    }

    #[test]
    fn test_publish_sets_timestamp_not_after_now() {
        let mut post = draft();
        assert!(post.is_draft());

        let now = Utc::now();
        post.publish(now);

        assert!(!post.is_draft());
        assert!(post.is_published_at(now));
        assert!(post.published_date.unwrap() <= Utc::now());
    }

    #[test]
    fn test_future_publish_date_is_not_published_yet() {
        let mut post = draft();
        let now = Utc::now();
        post.publish(now + Duration::hours(1));

        assert!(!post.is_draft());
        assert!(!post.is_published_at(now));
    }

    #[test]
    fn test_apply_keeps_author_and_dates() {
        let mut post = draft();
        let before = post.clone();
        post.apply(PostFields::parse("New title", "New text").unwrap());

        assert_eq!(post.title, "New title");
        assert_eq!(post.text, "New text");
        assert_eq!(post.author_id, before.author_id);
        assert_eq!(post.created_date, before.created_date);
    }

    #[test]
    fn test_parse_reports_each_field() {
        let errors = PostFields::parse("", " ").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.get("title").is_some());
        assert!(errors.get("text").is_some());

        let errors = PostFields::parse(&"x".repeat(201), "body").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("title").unwrap().contains("at most 200"));
    }
}

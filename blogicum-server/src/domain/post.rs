use chrono::{DateTime, Utc};

use super::error::DomainError;

const TITLE_MAX_CHARS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryRef {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LocationRef {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) is_published: bool,
}

/// A post as read back from the store, joined with its author, category and
/// location, and annotated with the number of comments it has.
#[derive(Debug, Clone)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) author_id: i64,
    pub(crate) author_username: String,
    pub(crate) category: Option<CategoryRef>,
    pub(crate) location: Option<LocationRef>,
    pub(crate) comment_count: i64,
    pub(crate) created_at: DateTime<Utc>,
}

impl Post {
    pub(crate) fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }

    /// Location is only shown while it is published.
    pub(crate) fn visible_location(&self) -> Option<&LocationRef> {
        self.location.as_ref().filter(|location| location.is_published)
    }
}

/// Submitted fields of the create and edit forms. Carries no author: the
/// author is always the session user.
#[derive(Debug, Clone)]
pub(crate) struct PostForm {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: Option<DateTime<Utc>>,
    pub(crate) is_published: bool,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

impl PostForm {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if let Some(category_id) = self.category_id {
            validate_positive_i64("category_id", category_id)?;
        }
        if let Some(location_id) = self.location_id {
            validate_positive_i64("location_id", location_id)?;
        }

        Ok(Self {
            title: normalize_title(&self.title)?,
            text: normalize_text(&self.text)?,
            ..self
        })
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX_CHARS {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..256 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::Validation {
            field: "text",
            message: "must not be empty",
        });
    }
    Ok(text.to_string())
}

use chrono::{DateTime, Utc};

use super::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) author_username: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl Comment {
    pub(crate) fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CommentForm {
    pub(crate) text: String,
}

impl CommentForm {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation {
                field: "text",
                message: "must not be empty",
            });
        }
        Ok(Self {
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentForm, DomainError};

    #[test]
    fn comment_form_rejects_blank_text() {
        let err = CommentForm {
            text: " \n ".to_string(),
        }
        .validate()
        .expect_err("blank text must be rejected");
        assert!(matches!(err, DomainError::Validation { field: "text", .. }));
    }

    #[test]
    fn comment_form_trims_text() {
        let form = CommentForm {
            text: "  nice post  ".to_string(),
        }
        .validate()
        .expect("must validate");
        assert_eq!(form.text, "nice post");
    }
}

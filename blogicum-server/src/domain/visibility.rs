use chrono::{DateTime, Utc};

use super::post::Post;

/// Describes which posts a page lists.
///
/// `PostQuery::visible(now)` is the public feed: posts whose `pub_date` is not
/// in the future, which are published themselves, and whose category is
/// published. Narrowing methods add conjunctions on top, so the same base
/// query serves the index, category and profile pages. Results are ordered by
/// `pub_date` descending with `id` descending as the tie-break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PostQuery {
    visible_at: Option<DateTime<Utc>>,
    category_id: Option<i64>,
    author_id: Option<i64>,
}

impl PostQuery {
    pub(crate) fn visible(now: DateTime<Utc>) -> Self {
        Self {
            visible_at: Some(now),
            ..Self::default()
        }
    }

    /// Every post of one author, published or not. Used when an author looks
    /// at their own profile.
    pub(crate) fn authored_by(author_id: i64) -> Self {
        Self {
            author_id: Some(author_id),
            ..Self::default()
        }
    }

    pub(crate) fn in_category(self, category_id: i64) -> Self {
        Self {
            category_id: Some(category_id),
            ..self
        }
    }

    pub(crate) fn by_author(self, author_id: i64) -> Self {
        Self {
            author_id: Some(author_id),
            ..self
        }
    }

    pub(crate) fn visible_at(&self) -> Option<DateTime<Utc>> {
        self.visible_at
    }

    pub(crate) fn category_id(&self) -> Option<i64> {
        self.category_id
    }

    pub(crate) fn author_id(&self) -> Option<i64> {
        self.author_id
    }

    /// In-memory form of the same predicate the repository pushes into SQL.
    pub(crate) fn matches(&self, post: &Post) -> bool {
        if let Some(now) = self.visible_at
            && !is_publicly_visible(post, now)
        {
            return false;
        }
        if let Some(category_id) = self.category_id
            && post.category.as_ref().map(|c| c.id) != Some(category_id)
        {
            return false;
        }
        if let Some(author_id) = self.author_id
            && post.author_id != author_id
        {
            return false;
        }
        true
    }
}

pub(crate) fn is_publicly_visible(post: &Post, now: DateTime<Utc>) -> bool {
    post.pub_date <= now
        && post.is_published
        && post.category.as_ref().is_some_and(|c| c.is_published)
}

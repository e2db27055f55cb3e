use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::pagination::PageWindow;
use crate::domain::post::Post;
use crate::domain::visibility::PostQuery;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) author_id: i64,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pagination {
    pub(crate) limit: i64,
    pub(crate) offset: i64,
}

impl From<PageWindow> for Pagination {
    fn from(window: PageWindow) -> Self {
        Self {
            limit: window.limit,
            offset: window.offset,
        }
    }
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    /// Fetches a post regardless of its visibility.
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post_owned(&self, post_id: i64, owner_id: i64) -> Result<bool, DomainError>;
    async fn list_posts(
        &self,
        query: PostQuery,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError>;
    async fn count_posts(&self, query: PostQuery) -> Result<i64, DomainError>;
}

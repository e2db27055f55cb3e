use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::category_repository::CategoryRepository;
use crate::domain::category::Category;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CategoryRow {
    id: i64,
    title: String,
    description: String,
    slug: String,
    is_published: bool,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT
            id,
            title,
            description,
            slug,
            is_published,
            created_at
            FROM categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(row.map(|r| Category {
            id: r.id,
            title: r.title,
            description: r.description,
            slug: r.slug,
            is_published: r.is_published,
            created_at: r.created_at,
        }))
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{CategoryRef, LocationRef, Post};
use crate::domain::visibility::PostQuery;

// One row per post: comments are joined and collapsed with GROUP BY, so a post
// without comments still appears once with a count of zero.
const SELECT_POSTS: &str = r#"
    SELECT
        p.id,
        p.title,
        p.text,
        p.pub_date,
        p.is_published,
        p.created_at,
        p.author_id,
        u.username AS author_username,
        c.id AS category_id,
        c.title AS category_title,
        c.slug AS category_slug,
        c.is_published AS category_is_published,
        l.id AS location_id,
        l.name AS location_name,
        l.is_published AS location_is_published,
        COUNT(cm.id) AS comment_count
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN locations l ON l.id = p.location_id
    LEFT JOIN comments cm ON cm.post_id = p.id
"#;

const GROUP_POSTS: &str = " GROUP BY p.id, u.id, c.id, l.id";

const ORDER_POSTS: &str = " ORDER BY p.pub_date DESC, p.id DESC";

const COUNT_POSTS: &str = r#"
    SELECT COUNT(*)
    FROM posts p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    title: String,
    text: String,
    pub_date: DateTime<Utc>,
    is_published: bool,
    created_at: DateTime<Utc>,
    author_id: i64,
    author_username: String,
    category_id: Option<i64>,
    category_title: Option<String>,
    category_slug: Option<String>,
    category_is_published: Option<bool>,
    location_id: Option<i64>,
    location_name: Option<String>,
    location_is_published: Option<bool>,
    comment_count: i64,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO posts (title, text, pub_date, is_published, author_id, category_id, location_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.title)
        .bind(input.text)
        .bind(input.pub_date)
        .bind(input.is_published)
        .bind(input.author_id)
        .bind(input.category_id)
        .bind(input.location_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        self.get_post(id)
            .await?
            .ok_or_else(|| DomainError::Unexpected(format!("post {id} vanished after insert")))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_POSTS);
        builder.push(" WHERE p.id = ").push_bind(id);
        builder.push(GROUP_POSTS);

        let row = builder
            .build_query_as::<PostRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(row.map(map_row_to_post))
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE posts
            SET title = $3,
                text = $4,
                pub_date = $5,
                is_published = $6,
                category_id = $7,
                location_id = $8
            WHERE id = $1 AND author_id = $2
            RETURNING id
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.text)
        .bind(patch.pub_date)
        .bind(patch.is_published)
        .bind(patch.category_id)
        .bind(patch.location_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        match updated {
            Some(id) => self.get_post(id).await,
            None => Ok(None),
        }
    }

    async fn delete_post_owned(&self, post_id: i64, owner_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1 AND author_id = $2
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(
        &self,
        query: PostQuery,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError> {
        let rows = list_query(query, pagination)
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(rows.into_iter().map(map_row_to_post).collect())
    }

    async fn count_posts(&self, query: PostQuery) -> Result<i64, DomainError> {
        count_query(query)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)
    }
}

fn list_query(query: PostQuery, pagination: Pagination) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(SELECT_POSTS);
    push_filters(&mut builder, query);
    builder.push(GROUP_POSTS);
    builder.push(ORDER_POSTS);
    builder.push(" LIMIT ").push_bind(pagination.limit);
    builder.push(" OFFSET ").push_bind(pagination.offset);
    builder
}

fn count_query(query: PostQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(COUNT_POSTS);
    push_filters(&mut builder, query);
    builder
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: PostQuery) {
    builder.push(" WHERE TRUE");
    if let Some(now) = query.visible_at() {
        builder
            .push(" AND p.pub_date <= ")
            .push_bind(now)
            .push(" AND p.is_published AND c.is_published IS TRUE");
    }
    if let Some(category_id) = query.category_id() {
        builder.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(author_id) = query.author_id() {
        builder.push(" AND p.author_id = ").push_bind(author_id);
    }
}

fn map_row_to_post(row: PostRow) -> Post {
    let category = match (
        row.category_id,
        row.category_title,
        row.category_slug,
        row.category_is_published,
    ) {
        (Some(id), Some(title), Some(slug), Some(is_published)) => Some(CategoryRef {
            id,
            title,
            slug,
            is_published,
        }),
        _ => None,
    };
    let location = match (row.location_id, row.location_name, row.location_is_published) {
        (Some(id), Some(name), Some(is_published)) => Some(LocationRef {
            id,
            name,
            is_published,
        }),
        _ => None,
    };

    Post {
        id: row.id,
        title: row.title,
        text: row.text,
        pub_date: row.pub_date,
        is_published: row.is_published,
        author_id: row.author_id,
        author_username: row.author_username,
        category,
        location,
        comment_count: row.comment_count,
        created_at: row.created_at,
    }
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return match db_err.constraint() {
            Some("posts_category_id_fkey") => DomainError::Validation {
                field: "category_id",
                message: "does not exist",
            },
            Some("posts_location_id_fkey") => DomainError::Validation {
                field: "location_id",
                message: "does not exist",
            },
            _ => DomainError::NotFound("author".to_string()),
        };
    }
    DomainError::Unexpected(err.to_string())
}

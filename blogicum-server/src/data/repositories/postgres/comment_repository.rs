use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

const SELECT_COMMENTS: &str = r#"
    SELECT
        cm.id,
        cm.text,
        cm.post_id,
        cm.author_id,
        u.username AS author_username,
        cm.created_at
    FROM comments cm
    JOIN users u ON u.id = cm.author_id
"#;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, comment_id: i64) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!("{SELECT_COMMENTS} WHERE cm.id = $1"))
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_comment_db_error)?;

        Ok(row.map(Comment::from))
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    text: String,
    post_id: i64,
    author_id: i64,
    author_username: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            post_id: row.post_id,
            author_id: row.author_id,
            author_username: row.author_username,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO comments (text, post_id, author_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(input.text)
        .bind(input.post_id)
        .bind(input.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        self.fetch_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Unexpected(format!("comment {id} vanished after insert")))
    }

    async fn get_comment(
        &self,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "{SELECT_COMMENTS} WHERE cm.id = $1 AND cm.post_id = $2"
        ))
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        Ok(row.map(Comment::from))
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "{SELECT_COMMENTS} WHERE cm.post_id = $1 ORDER BY cm.created_at, cm.id"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn update_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE comments
            SET text = $3
            WHERE id = $1 AND author_id = $2
            RETURNING id
            "#,
        )
        .bind(comment_id)
        .bind(owner_id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        match updated {
            Some(id) => self.fetch_by_id(id).await,
            None => Ok(None),
        }
    }

    async fn delete_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $1 AND author_id = $2
            "#,
        )
        .bind(comment_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_comment_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        let resource = match db_err.constraint() {
            Some("comments_post_id_fkey") => "post",
            _ => "author",
        };
        return DomainError::NotFound(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}

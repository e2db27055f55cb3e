use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ResourcePath, reject_after_guard, see_other};
use crate::application::authorship::Access;
use crate::domain::comment::{Comment, CommentForm};
use crate::domain::user::Actor;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::LoginRequired;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CommentFormDto {
    pub(crate) text: String,
}

impl From<CommentFormDto> for CommentForm {
    fn from(dto: CommentFormDto) -> Self {
        Self { text: dto.text }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) post_id: i64,
    pub(crate) author: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            post_id: comment.post_id,
            author: comment.author_username,
            created_at: comment.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/posts/{post_id}/comment",
    tag = "comments",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    request_body = CommentFormDto,
    responses(
        (status = 303, description = "Comment added, redirecting to the post"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Post not found or not visible"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn add_comment(
    State(state): State<AppState>,
    LoginRequired(actor): LoginRequired,
    ResourcePath(post_id): ResourcePath<i64>,
    payload: Result<Json<CommentFormDto>, JsonRejection>,
) -> AppResult<Response> {
    let Json(dto) = payload?;

    let outcome = state
        .blog_service
        .add_comment(&actor, post_id, dto.into(), Utc::now())
        .await?;

    Ok(see_other(outcome.destination()))
}

#[utoipa::path(
    get,
    path = "/posts/{post_id}/edit_comment/{comment_id}",
    tag = "comments",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Current comment for the edit form", body = CommentDto),
        (status = 303, description = "Not the author, redirecting to the post"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_comment_form(
    State(state): State<AppState>,
    LoginRequired(actor): LoginRequired,
    ResourcePath((post_id, comment_id)): ResourcePath<(i64, i64)>,
) -> AppResult<Response> {
    guarded_comment(&state, &actor, post_id, comment_id).await
}

#[utoipa::path(
    post,
    path = "/posts/{post_id}/edit_comment/{comment_id}",
    tag = "comments",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    request_body = CommentFormDto,
    responses(
        (status = 303, description = "Saved, or not the author; redirecting to the post"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_comment(
    State(state): State<AppState>,
    LoginRequired(actor): LoginRequired,
    ResourcePath((post_id, comment_id)): ResourcePath<(i64, i64)>,
    payload: Result<Json<CommentFormDto>, JsonRejection>,
) -> AppResult<Response> {
    let dto = match payload {
        Ok(Json(dto)) => dto,
        Err(rejection) => {
            let access = state
                .blog_service
                .guard_comment(&actor, post_id, comment_id)
                .await?;
            return reject_after_guard(access, rejection);
        }
    };

    let outcome = state
        .blog_service
        .edit_comment(&actor, post_id, comment_id, dto.into())
        .await?;

    Ok(see_other(outcome.destination()))
}

#[utoipa::path(
    get,
    path = "/posts/{post_id}/delete_comment/{comment_id}",
    tag = "comments",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment awaiting delete confirmation", body = CommentDto),
        (status = 303, description = "Not the author, redirecting to the post"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment_form(
    State(state): State<AppState>,
    LoginRequired(actor): LoginRequired,
    ResourcePath((post_id, comment_id)): ResourcePath<(i64, i64)>,
) -> AppResult<Response> {
    guarded_comment(&state, &actor, post_id, comment_id).await
}

#[utoipa::path(
    post,
    path = "/posts/{post_id}/delete_comment/{comment_id}",
    tag = "comments",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 303, description = "Deleted, or not the author; redirecting to the post"),
        (status = 404, description = "Comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    LoginRequired(actor): LoginRequired,
    ResourcePath((post_id, comment_id)): ResourcePath<(i64, i64)>,
) -> AppResult<Response> {
    let outcome = state
        .blog_service
        .delete_comment(&actor, post_id, comment_id)
        .await?;

    Ok(see_other(outcome.destination()))
}

async fn guarded_comment(
    state: &AppState,
    actor: &Actor,
    post_id: i64,
    comment_id: i64,
) -> AppResult<Response> {
    match state
        .blog_service
        .guard_comment(actor, post_id, comment_id)
        .await?
    {
        Access::Granted(comment) => Ok(Json(CommentDto::from(comment)).into_response()),
        Access::Redirect(destination) => Ok(see_other(&destination)),
    }
}

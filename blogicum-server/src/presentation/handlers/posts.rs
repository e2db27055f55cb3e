use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::comments::CommentDto;
use super::{ResourcePath, reject_after_guard, see_other};
use crate::application::authorship::Access;
use crate::application::blog_service::PostDetail;
use crate::domain::pagination::Page;
use crate::domain::post::{Post, PostForm};
use crate::domain::user::Actor;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::{LoginRequired, Viewer};

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct PostFormDto {
    pub(crate) title: String,
    pub(crate) text: String,
    /// Defaults to the time of creation; an edit keeps the current value.
    pub(crate) pub_date: Option<DateTime<Utc>>,
    #[serde(default = "published_by_default")]
    pub(crate) is_published: bool,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

fn published_by_default() -> bool {
    true
}

impl From<PostFormDto> for PostForm {
    fn from(dto: PostFormDto) -> Self {
        Self {
            title: dto.title,
            text: dto.text,
            pub_date: dto.pub_date,
            is_published: dto.is_published,
            category_id: dto.category_id,
            location_id: dto.location_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategorySummaryDto {
    pub(crate) title: String,
    pub(crate) slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) author: String,
    pub(crate) category: Option<CategorySummaryDto>,
    pub(crate) location: Option<String>,
    pub(crate) comment_count: i64,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        let location = post.visible_location().map(|location| location.name.clone());
        Self {
            id: post.id,
            title: post.title,
            text: post.text,
            pub_date: post.pub_date,
            is_published: post.is_published,
            author: post.author_username,
            category: post.category.map(|category| CategorySummaryDto {
                title: category.title,
                slug: category.slug,
            }),
            location,
            comment_count: post.comment_count,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PageMetaDto {
    pub(crate) number: u32,
    pub(crate) num_pages: u32,
    pub(crate) total: i64,
    pub(crate) has_next: bool,
    pub(crate) has_previous: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostPageDto {
    pub(crate) posts: Vec<PostDto>,
    pub(crate) page: PageMetaDto,
}

impl From<Page<Post>> for PostPageDto {
    fn from(page: Page<Post>) -> Self {
        let meta = PageMetaDto {
            number: page.number,
            num_pages: page.num_pages,
            total: page.total,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
        };
        Self {
            posts: page.map(PostDto::from).items,
            page: meta,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDetailDto {
    pub(crate) post: PostDto,
    pub(crate) comments: Vec<CommentDto>,
}

impl From<PostDetail> for PostDetailDto {
    fn from(detail: PostDetail) -> Self {
        Self {
            post: detail.post.into(),
            comments: detail.comments.into_iter().map(CommentDto::from).collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/posts/{post_id}",
    tag = "posts",
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post with its comments", body = PostDetailDto),
        (status = 404, description = "Post not found or not visible"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn post_detail(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    ResourcePath(post_id): ResourcePath<i64>,
) -> AppResult<Json<PostDetailDto>> {
    let detail = state
        .blog_service
        .post_detail(post_id, viewer.as_ref(), Utc::now())
        .await?;

    Ok(Json(detail.into()))
}

#[utoipa::path(
    post,
    path = "/posts/create",
    tag = "posts",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    request_body = PostFormDto,
    responses(
        (status = 303, description = "Created, redirecting to the author's profile"),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    LoginRequired(actor): LoginRequired,
    payload: Result<Json<PostFormDto>, JsonRejection>,
) -> AppResult<Response> {
    let Json(dto) = payload?;

    let outcome = state
        .blog_service
        .create_post(&actor, dto.into(), Utc::now())
        .await?;

    Ok(see_other(outcome.destination()))
}

#[utoipa::path(
    get,
    path = "/posts/{post_id}/edit",
    tag = "posts",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Current post for the edit form", body = PostDto),
        (status = 303, description = "Not the author, redirecting to the post"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_post_form(
    State(state): State<AppState>,
    LoginRequired(actor): LoginRequired,
    ResourcePath(post_id): ResourcePath<i64>,
) -> AppResult<Response> {
    guarded_post(&state, &actor, post_id).await
}

#[utoipa::path(
    post,
    path = "/posts/{post_id}/edit",
    tag = "posts",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    request_body = PostFormDto,
    responses(
        (status = 303, description = "Saved, or not the author; redirecting to the post"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_post(
    State(state): State<AppState>,
    LoginRequired(actor): LoginRequired,
    ResourcePath(post_id): ResourcePath<i64>,
    payload: Result<Json<PostFormDto>, JsonRejection>,
) -> AppResult<Response> {
    let dto = match payload {
        Ok(Json(dto)) => dto,
        Err(rejection) => {
            let access = state.blog_service.guard_post(&actor, post_id).await?;
            return reject_after_guard(access, rejection);
        }
    };

    let outcome = state
        .blog_service
        .edit_post(&actor, post_id, dto.into())
        .await?;

    Ok(see_other(outcome.destination()))
}

#[utoipa::path(
    get,
    path = "/posts/{post_id}/delete",
    tag = "posts",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post awaiting delete confirmation", body = PostDto),
        (status = 303, description = "Not the author, redirecting to the post"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post_form(
    State(state): State<AppState>,
    LoginRequired(actor): LoginRequired,
    ResourcePath(post_id): ResourcePath<i64>,
) -> AppResult<Response> {
    guarded_post(&state, &actor, post_id).await
}

#[utoipa::path(
    post,
    path = "/posts/{post_id}/delete",
    tag = "posts",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 303, description = "Deleted and redirecting to the profile, or not the author and redirecting to the post"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    LoginRequired(actor): LoginRequired,
    ResourcePath(post_id): ResourcePath<i64>,
) -> AppResult<Response> {
    let outcome = state.blog_service.delete_post(&actor, post_id).await?;
    Ok(see_other(outcome.destination()))
}

async fn guarded_post(state: &AppState, actor: &Actor, post_id: i64) -> AppResult<Response> {
    match state.blog_service.guard_post(actor, post_id).await? {
        Access::Granted(post) => Ok(Json(PostDto::from(post)).into_response()),
        Access::Redirect(destination) => Ok(see_other(&destination)),
    }
}
